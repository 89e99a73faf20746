//! In-memory user store for unit tests.
//!
//! Mirrors the Postgres store's atomicity contract under a single mutex and
//! adds two failure knobs: forced token collisions (to exercise the issue
//! retry loop) and failing audit writes.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::credentials::hash_password;
use super::models::{AuditEntry, User};
use super::store::{TokenWrite, UserStore};

#[derive(Default)]
pub(crate) struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    audit: Mutex<Vec<AuditEntry>>,
    forced_collisions: AtomicUsize,
    fail_audit: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_user(&self, user: User) {
        self.users
            .lock()
            .expect("users lock")
            .insert(user.id, user);
    }

    pub(crate) fn user(&self, id: Uuid) -> Option<User> {
        self.users.lock().expect("users lock").get(&id).cloned()
    }

    pub(crate) fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.lock().expect("audit lock").clone()
    }

    /// Make the next `count` token writes report a collision.
    pub(crate) fn force_token_collisions(&self, count: usize) {
        self.forced_collisions.store(count, Ordering::SeqCst);
    }

    pub(crate) fn fail_audit_writes(&self) {
        self.fail_audit.store(true, Ordering::SeqCst);
    }

    fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .lock()
            .expect("users lock")
            .values()
            .find(|user| predicate(user))
            .cloned()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.find(|user| user.email == email))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.find(|user| user.name == name))
    }

    async fn find_by_access_token(&self, token: &str) -> Result<Option<User>> {
        Ok(self.find(|user| user.access_token.as_deref() == Some(token)))
    }

    async fn set_access_token(&self, user_id: Uuid, token: &str) -> Result<TokenWrite> {
        if self
            .forced_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            })
            .is_ok()
        {
            return Ok(TokenWrite::Collision);
        }

        let mut users = self.users.lock().expect("users lock");
        let collision = users
            .values()
            .any(|user| user.id != user_id && user.access_token.as_deref() == Some(token));
        if collision {
            return Ok(TokenWrite::Collision);
        }
        let user = users.get_mut(&user_id).ok_or_else(|| anyhow!("no user"))?;
        user.access_token = Some(token.to_string());
        Ok(TokenWrite::Stored)
    }

    async fn clear_access_token(&self, token: &str) -> Result<Option<Uuid>> {
        let mut users = self.users.lock().expect("users lock");
        for user in users.values_mut() {
            if user.access_token.as_deref() == Some(token) {
                user.access_token = None;
                return Ok(Some(user.id));
            }
        }
        Ok(None)
    }

    async fn assign_game_id(&self, user_id: Uuid, game_id: Uuid) -> Result<Uuid> {
        let mut users = self.users.lock().expect("users lock");
        let user = users.get_mut(&user_id).ok_or_else(|| anyhow!("no user"))?;
        Ok(*user.game_id.get_or_insert(game_id))
    }

    async fn replace_recovery_code(
        &self,
        user_id: Uuid,
        used: &str,
        replacement: &str,
    ) -> Result<bool> {
        let mut users = self.users.lock().expect("users lock");
        let user = users.get_mut(&user_id).ok_or_else(|| anyhow!("no user"))?;
        match user.recovery_codes.iter().position(|code| code == used) {
            Some(idx) => {
                user.recovery_codes[idx] = replacement.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_last_login(
        &self,
        user_id: Uuid,
        ip: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut users = self.users.lock().expect("users lock");
        let user = users.get_mut(&user_id).ok_or_else(|| anyhow!("no user"))?;
        user.last_login_ip = ip.map(ToString::to_string);
        user.last_login_at = Some(at);
        Ok(())
    }

    async fn record_audit(&self, entry: AuditEntry) -> Result<()> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(anyhow!("audit sink unavailable"));
        }
        self.audit.lock().expect("audit lock").push(entry);
        Ok(())
    }
}

/// Build a user with a real Argon2id hash of `password`.
pub(crate) fn user_fixture(email: &str, name: &str, password: &str) -> Result<User> {
    Ok(User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: name.to_string(),
        password_hash: hash_password(password)?,
        access_token: None,
        two_factor_secret: None,
        recovery_codes: Vec::new(),
        ban: None,
        game_id: None,
        last_login_ip: None,
        last_login_at: None,
    })
}
