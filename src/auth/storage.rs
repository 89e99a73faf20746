//! Postgres implementation of the user store.
//!
//! Queries are plain sqlx statements wrapped in `db.query` spans. Token
//! uniqueness rides on the unique constraint over `users.access_token`;
//! game-id assignment and recovery-code consumption are single conditional
//! UPDATEs so they stay race-free without explicit locking.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::models::{AuditEntry, Ban, User};
use super::store::{TokenWrite, UserStore};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by(&self, column: &'static str, value: &str) -> Result<Option<User>> {
        // `column` is one of three compile-time constants, never user input.
        let query = format!(
            "SELECT id, email, name, password_hash, access_token, two_factor_secret, \
             recovery_codes, ban_reason, game_id, last_login_ip, last_login_at \
             FROM users WHERE {column} = $1"
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .with_context(|| format!("failed to lookup user by {column}"))?;

        Ok(row.as_ref().map(user_from_row))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_by("email", email).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        self.find_by("name", name).await
    }

    async fn find_by_access_token(&self, token: &str) -> Result<Option<User>> {
        self.find_by("access_token", token).await
    }

    async fn set_access_token(&self, user_id: Uuid, token: &str) -> Result<TokenWrite> {
        let query = "UPDATE users SET access_token = $2 WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(TokenWrite::Stored),
            Err(err) if is_unique_violation(&err) => Ok(TokenWrite::Collision),
            Err(err) => Err(err).context("failed to store access token"),
        }
    }

    async fn clear_access_token(&self, token: &str) -> Result<Option<Uuid>> {
        // Idempotent: zero matched rows is a successful no-op.
        let query = "UPDATE users SET access_token = NULL WHERE access_token = $1 RETURNING id";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to clear access token")?;

        Ok(row.map(|row| row.get("id")))
    }

    async fn assign_game_id(&self, user_id: Uuid, game_id: Uuid) -> Result<Uuid> {
        // COALESCE keeps an existing id; the write happens at most once.
        let query = "UPDATE users SET game_id = COALESCE(game_id, $2) WHERE id = $1 \
                     RETURNING game_id";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(user_id)
            .bind(game_id)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .context("failed to assign game id")?;

        Ok(row.get("game_id"))
    }

    async fn replace_recovery_code(
        &self,
        user_id: Uuid,
        used: &str,
        replacement: &str,
    ) -> Result<bool> {
        // Single statement: the presence check and the swap cannot be split
        // by a concurrent consumer of the same code.
        let query = "UPDATE users SET recovery_codes = array_replace(recovery_codes, $2, $3) \
                     WHERE id = $1 AND $2 = ANY(recovery_codes) RETURNING id";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(user_id)
            .bind(used)
            .bind(replacement)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to replace recovery code")?;

        Ok(row.is_some())
    }

    async fn update_last_login(
        &self,
        user_id: Uuid,
        ip: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let query = "UPDATE users SET last_login_ip = $2, last_login_at = $3 WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(ip)
            .bind(at)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to update last login")?;
        Ok(())
    }

    async fn record_audit(&self, entry: AuditEntry) -> Result<()> {
        let data =
            serde_json::to_string(&entry.data).context("failed to serialize audit data")?;
        let query = "INSERT INTO audit_log (user_id, action, target_id, data, created_at) \
                     VALUES ($1, $2, $3, $4::jsonb, $5)";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(entry.user_id)
            .bind(entry.action.as_str())
            .bind(entry.target_id)
            .bind(data)
            .bind(entry.timestamp)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert audit entry")?;
        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        access_token: row.get("access_token"),
        two_factor_secret: row.get("two_factor_secret"),
        recovery_codes: row.get("recovery_codes"),
        ban: row
            .get::<Option<String>, _>("ban_reason")
            .map(|reason| Ban { reason }),
        game_id: row.get("game_id"),
        last_login_ip: row.get("last_login_ip"),
        last_login_at: row.get("last_login_at"),
    }
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
