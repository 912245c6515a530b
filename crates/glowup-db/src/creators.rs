//! Database operations for the `creators` table.
//!
//! `email` is the identity key: unique, lower-cased and trimmed. Rows are
//! created and renamed only through [`merge_contact`], move to `sent` only
//! through [`mark_creator_sent`], and disappear only through
//! [`delete_creators_by_email`].

use chrono::{DateTime, Utc};
use glowup_core::{
    normalize_email, plan_merge, CreatorStatus, ExtractedContact, MergeOutcome, MergePlan,
    Platform, StoredIdentity,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `creators` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorRow {
    pub id: i64,
    pub public_id: Uuid,
    pub platform: String,
    pub category: String,
    pub display_name: String,
    pub email: String,
    pub profile_url: String,
    pub subscriber_count: i64,
    pub description: String,
    pub collected_at: DateTime<Utc>,
    pub status: String,
}

impl CreatorRow {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == CreatorStatus::Pending.as_str()
    }
}

/// Optional narrowing for [`list_creators`]. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatorFilter {
    pub platform: Option<Platform>,
    pub status: Option<CreatorStatus>,
}

const CREATOR_COLUMNS: &str = "id, public_id, platform, category, display_name, email, \
     profile_url, subscriber_count, description, collected_at, status";

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merges one extracted contact into the store.
///
/// Runs in a single transaction: the row for the email is locked, the merge
/// is planned, then at most one write happens. An insert that loses a race
/// against a concurrent writer reports [`MergeOutcome::SkippedDuplicate`].
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails, or
/// [`DbError::StoreInconsistency`] if the locked row vanishes before the
/// name update.
pub async fn merge_contact(
    pool: &PgPool,
    contact: &ExtractedContact,
) -> Result<MergeOutcome, DbError> {
    let email = normalize_email(&contact.email);
    let mut tx = pool.begin().await?;

    let stored = sqlx::query_scalar::<_, String>(
        "SELECT display_name FROM creators WHERE email = $1 FOR UPDATE",
    )
    .bind(&email)
    .fetch_optional(&mut *tx)
    .await?
    .map(|display_name| StoredIdentity { display_name });

    let plan = plan_merge(stored.as_ref(), contact);

    let outcome = match &plan {
        MergePlan::Insert => {
            let inserted = sqlx::query(
                "INSERT INTO creators \
                     (platform, category, display_name, email, profile_url, \
                      subscriber_count, description, status, collected_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', NOW()) \
                 ON CONFLICT (email) DO NOTHING",
            )
            .bind(contact.source_platform.as_str())
            .bind(&contact.category)
            .bind(&contact.display_name)
            .bind(&email)
            .bind(&contact.source_url)
            .bind(contact.subscriber_count.max(0))
            .bind(&contact.raw_snippet)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted == 0 {
                MergeOutcome::SkippedDuplicate
            } else {
                MergeOutcome::Inserted
            }
        }
        MergePlan::Skip => MergeOutcome::SkippedDuplicate,
        MergePlan::UpdateName {
            display_name,
            description,
        } => {
            let updated = sqlx::query(
                "UPDATE creators SET display_name = $1, description = $2 WHERE email = $3",
            )
            .bind(display_name)
            .bind(description)
            .bind(&email)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated != 1 {
                tracing::error!(%email, updated, "locked creator row changed during merge");
                return Err(DbError::StoreInconsistency(format!(
                    "name update for {email} touched {updated} rows"
                )));
            }
            MergeOutcome::UpdatedName
        }
    };

    tx.commit().await?;
    tracing::debug!(%email, ?outcome, "merged contact");
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the creator with `email` (case-insensitive), or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_creator_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CreatorRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "SELECT {CREATOR_COLUMNS} FROM creators WHERE email = $1"
    ))
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns creators matching `filter`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_creators(
    pool: &PgPool,
    filter: CreatorFilter,
) -> Result<Vec<CreatorRow>, DbError> {
    let rows = sqlx::query_as::<_, CreatorRow>(&format!(
        "SELECT {CREATOR_COLUMNS} FROM creators \
         WHERE ($1::text IS NULL OR platform = $1) \
           AND ($2::text IS NULL OR status = $2) \
         ORDER BY collected_at DESC, id DESC"
    ))
    .bind(filter.platform.map(Platform::as_str))
    .bind(filter.status.map(CreatorStatus::as_str))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Moves a `pending` creator to `sent`.
///
/// Returns `false` when no pending creator has that email (already sent or
/// deleted). Never moves a row back to `pending`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_creator_sent(pool: &PgPool, email: &str) -> Result<bool, DbError> {
    let updated = sqlx::query(
        "UPDATE creators SET status = 'sent' WHERE email = $1 AND status = 'pending'",
    )
    .bind(normalize_email(email))
    .execute(pool)
    .await?
    .rows_affected();

    Ok(updated == 1)
}

/// Deletes every creator whose email is in `emails`. Returns the count removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_creators_by_email(pool: &PgPool, emails: &[String]) -> Result<u64, DbError> {
    if emails.is_empty() {
        return Ok(0);
    }
    let emails: Vec<String> = emails.iter().map(|e| normalize_email(e)).collect();

    let deleted = sqlx::query("DELETE FROM creators WHERE email = ANY($1)")
        .bind(&emails)
        .execute(pool)
        .await?
        .rows_affected();

    tracing::info!(requested = emails.len(), deleted, "deleted creators");
    Ok(deleted)
}
