//! Database operations for the `brand_leads` table (storefront outreach).

use chrono::{DateTime, Utc};
use glowup_core::normalize_email;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `brand_leads` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandLeadRow {
    pub id: i64,
    pub email: String,
    pub keyword: String,
    pub discovered_at: DateTime<Utc>,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub send_count: i32,
    pub template_used: Option<String>,
}

const LEAD_COLUMNS: &str =
    "id, email, keyword, discovered_at, last_sent_at, send_count, template_used";

/// Inserts a lead unless one with the same email exists. Returns `true` if a
/// row was created.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_brand_lead(pool: &PgPool, email: &str, keyword: &str) -> Result<bool, DbError> {
    let inserted = sqlx::query(
        "INSERT INTO brand_leads (email, keyword) VALUES ($1, $2) \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(normalize_email(email))
    .bind(keyword.trim())
    .execute(pool)
    .await?
    .rows_affected();

    Ok(inserted == 1)
}

/// Returns every lead, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brand_leads(pool: &PgPool) -> Result<Vec<BrandLeadRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandLeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM brand_leads ORDER BY discovered_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Leads never mailed, oldest first, at most `limit` when given.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unsent_brand_leads(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<BrandLeadRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandLeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM brand_leads \
         WHERE send_count = 0 \
         ORDER BY discovered_at, id \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Records one successful send. Returns `false` if no lead has that email.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn record_brand_send(pool: &PgPool, email: &str, template: &str) -> Result<bool, DbError> {
    let updated = sqlx::query(
        "UPDATE brand_leads \
         SET send_count = send_count + 1, last_sent_at = NOW(), template_used = $2 \
         WHERE email = $1",
    )
    .bind(normalize_email(email))
    .bind(template)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(updated == 1)
}

/// Deletes every lead whose email is in `emails`. Returns the count removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_brand_leads_by_email(
    pool: &PgPool,
    emails: &[String],
) -> Result<u64, DbError> {
    if emails.is_empty() {
        return Ok(0);
    }
    let emails: Vec<String> = emails.iter().map(|e| normalize_email(e)).collect();

    let deleted = sqlx::query("DELETE FROM brand_leads WHERE email = ANY($1)")
        .bind(&emails)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted)
}
