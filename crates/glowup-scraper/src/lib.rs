pub mod error;
pub mod extract;
pub mod filter;
pub mod generative;
pub mod http;
pub mod normalize;
pub mod pipeline;
pub(crate) mod rate_limit;
pub mod search;
pub mod storefront;
pub mod youtube;

pub use error::ScraperError;
pub use extract::{extract, find_email, NameStrategy, NAME_STRATEGIES};
pub use filter::{Blacklist, Rejection, RelevanceFilter};
pub use generative::{needs_generative, GeminiClient};
pub use http::HttpSettings;
pub use normalize::normalize;
pub use pipeline::{harvest, Harvest};
pub use search::{creator_query, ApifySearchClient};
pub use storefront::{discover_leads, storefront_query, StoreLead};
pub use youtube::{Channel, Region, SubscriberRange, YouTubeClient, SEARCH_QUOTA_COST};
