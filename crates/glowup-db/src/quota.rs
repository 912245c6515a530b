//! Persistent usage ledger for external API calls (single `quota_usage` row).

use chrono::{DateTime, Utc};
use glowup_core::{Clock, QuotaCounters, QuotaPolicy, SystemClock};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, sqlx::FromRow)]
struct QuotaRow {
    external_search_calls: i64,
    generative_calls: i64,
    last_reset_at: DateTime<Utc>,
}

impl From<QuotaRow> for QuotaCounters {
    fn from(row: QuotaRow) -> Self {
        Self {
            external_search_calls: row.external_search_calls,
            generative_calls: row.generative_calls,
            last_reset_at: row.last_reset_at,
        }
    }
}

/// Charges and reads the usage counters, applying the daily rollover.
pub struct QuotaLedger<C: Clock = SystemClock> {
    pool: PgPool,
    policy: QuotaPolicy,
    clock: C,
}

impl QuotaLedger<SystemClock> {
    #[must_use]
    pub fn new(pool: PgPool, policy: QuotaPolicy) -> Self {
        Self::with_clock(pool, policy, SystemClock)
    }
}

impl<C: Clock> QuotaLedger<C> {
    #[must_use]
    pub fn with_clock(pool: PgPool, policy: QuotaPolicy, clock: C) -> Self {
        Self {
            pool,
            policy,
            clock,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Adds the given charges and returns the counters after the write.
    ///
    /// The search counter resets first if the last reset predates the current
    /// window. The row is locked for the duration, so concurrent charges are
    /// serialized.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::StoreInconsistency`] if the ledger row is missing,
    /// or [`DbError::Sqlx`] if a statement fails.
    pub async fn charge_and_read(
        &self,
        search_calls: u32,
        generative_calls: u32,
    ) -> Result<QuotaCounters, DbError> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await?;

        let Some(row) = sqlx::query_as::<_, QuotaRow>(
            "SELECT external_search_calls, generative_calls, last_reset_at \
             FROM quota_usage WHERE id = 1 FOR UPDATE",
        )
        .fetch_optional(&mut *tx)
        .await?
        else {
            tracing::error!("quota_usage row is missing; run migrations");
            return Err(DbError::StoreInconsistency(
                "quota_usage row id = 1 is missing".to_owned(),
            ));
        };

        let current = QuotaCounters::from(row);
        let next = current.charge(
            &self.policy,
            now,
            i64::from(search_calls),
            i64::from(generative_calls),
        );

        if next != current {
            sqlx::query(
                "UPDATE quota_usage \
                 SET external_search_calls = $1, generative_calls = $2, last_reset_at = $3 \
                 WHERE id = 1",
            )
            .bind(next.external_search_calls)
            .bind(next.generative_calls)
            .bind(next.last_reset_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        if next.last_reset_at != current.last_reset_at {
            tracing::info!(reset_at = %next.last_reset_at, "search quota window rolled over");
        }
        Ok(next)
    }

    /// Current counters, rollover applied, nothing charged.
    ///
    /// # Errors
    ///
    /// See [`Self::charge_and_read`].
    pub async fn read(&self) -> Result<QuotaCounters, DbError> {
        self.charge_and_read(0, 0).await
    }
}
