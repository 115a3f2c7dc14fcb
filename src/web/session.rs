//! Token-keyed session registry and the request extractor.

use super::{AppState, blocking};
use super::error::ApiError;
use crate::errors::AppError;
use crate::models::session::SessionContext;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use log::{debug, info};
use rand::{Rng, distributions::Alphanumeric};
use serde::Deserialize;

const TOKEN_LENGTH: usize = 32;

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[derive(Debug, Clone)]
struct LiveSession {
    context: SessionContext,
    expires_at: DateTime<Utc>,
}

impl LiveSession {
    fn expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Live sessions. A session only exists here after a successful login, and
/// stops resolving once its lifetime has passed.
pub struct SessionRegistry {
    sessions: DashMap<String, LiveSession>,
    ttl: TimeDelta,
}

impl SessionRegistry {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Store `context` under a fresh token and return the token.
    pub fn create(&self, context: SessionContext) -> String {
        self.create_at(context, Utc::now())
    }

    fn create_at(&self, context: SessionContext, now: DateTime<Utc>) -> String {
        self.clear_expired(now);

        let live = LiveSession {
            context,
            expires_at: now + self.ttl,
        };
        loop {
            let token = generate_token();
            if let Entry::Vacant(slot) = self.sessions.entry(token.clone()) {
                slot.insert(live);
                return token;
            }
        }
    }

    pub fn get(&self, token: &str) -> Option<SessionContext> {
        self.get_at(token, Utc::now())
    }

    fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionContext> {
        let live = self.sessions.get(token).map(|s| s.value().clone())?;
        if live.expired(now) {
            self.sessions.remove(token);
            return None;
        }
        Some(live.context)
    }

    /// Swap in the next state of an existing session. The expiry is kept.
    pub fn replace(&self, token: &str, context: SessionContext) -> bool {
        match self.sessions.get_mut(token) {
            Some(mut slot) => {
                slot.context = context;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, token: &str) -> Option<SessionContext> {
        self.sessions.remove(token).map(|(_, s)| s.context)
    }

    /// Drop every session logged in as `identity`. Returns how many went.
    pub fn revoke(&self, identity: &str) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.context.identity != identity);
        let revoked = before.saturating_sub(self.sessions.len());
        if revoked > 0 {
            info!("Revoked {revoked} session(s) of {identity}");
        }
        revoked
    }

    fn clear_expired(&self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.expired(now));
        let cleared = before.saturating_sub(self.sessions.len());
        if cleared > 0 {
            debug!(
                "Cleared {cleared} expired session(s), {} live",
                self.sessions.len()
            );
        }
    }
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// The caller's session, from `Authorization: Bearer <token>` or `?token=`.
pub struct Session {
    pub token: String,
    pub context: SessionContext,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let language = state.core.default_language();
        let rejected = || ApiError::new(AppError::NotLoggedIn, language);

        let from_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|x| x.to_str().ok())
            .and_then(|x| x.strip_prefix("Bearer "))
            .map(|x| x.trim().to_string());

        let token = match from_header {
            Some(t) => t,
            None => Query::<TokenQuery>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|Query(q)| q.token)
                .ok_or_else(rejected)?,
        };

        let context = state.sessions.get(&token).ok_or_else(rejected)?;

        // the account may have been disabled or removed since login
        let core = state.core.clone();
        let identity = context.identity.clone();
        let active = blocking(move || core.account_active(&identity))
            .await
            .map_err(|e| ApiError::new(e, context.language))?;
        if !active {
            state.sessions.revoke(&context.identity);
            return Err(rejected());
        }

        Ok(Self { token, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::Language;
    use crate::models::user::Role;

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(TimeDelta::hours(1))
    }

    fn user(name: &str) -> SessionContext {
        SessionContext::new(Language::En).logged_in(name, Role::User)
    }

    #[test]
    fn registry_lifecycle() {
        let reg = registry();
        let ctx = user("alice");
        let token = reg.create(ctx.clone());

        assert_eq!(reg.get(&token), Some(ctx.clone()));
        assert!(reg.replace(&token, ctx.with_language(Language::ZhTw)));
        assert_eq!(reg.get(&token).map(|s| s.language), Some(Language::ZhTw));

        assert!(reg.remove(&token).is_some());
        assert!(reg.get(&token).is_none());
        assert!(!reg.replace(&token, ctx));
    }

    #[test]
    fn sessions_expire_after_ttl() {
        let reg = registry();
        let t0 = Utc::now();
        let token = reg.create_at(user("alice"), t0);

        assert!(reg.get_at(&token, t0 + TimeDelta::minutes(59)).is_some());
        assert!(reg.get_at(&token, t0 + TimeDelta::hours(1)).is_none());
        // the expired entry is gone for good
        assert!(reg.get_at(&token, t0).is_none());
    }

    #[test]
    fn creating_a_session_sweeps_expired_ones() {
        let reg = registry();
        let t0 = Utc::now();
        reg.create_at(user("alice"), t0);
        reg.create_at(user("bob"), t0);
        assert_eq!(reg.sessions.len(), 2);

        reg.create_at(user("carol"), t0 + TimeDelta::hours(2));
        assert_eq!(reg.sessions.len(), 1);
    }

    #[test]
    fn revoke_drops_every_session_of_an_identity() {
        let reg = registry();
        let a1 = reg.create(user("alice"));
        let a2 = reg.create(user("alice"));
        let b = reg.create(user("bob"));

        assert_eq!(reg.revoke("alice"), 2);
        assert!(reg.get(&a1).is_none());
        assert!(reg.get(&a2).is_none());
        assert!(reg.get(&b).is_some());
        assert_eq!(reg.revoke("alice"), 0);
    }
}
