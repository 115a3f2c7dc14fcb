//! Auth gate.

use super::credentials::Credentials;
use super::password::SecretHasher;
use crate::errors::{AppResult, AuthError};
use crate::models::language::Language;
use crate::models::session::SessionContext;
use crate::models::user::{Role, UserMap};
use log::{error, info, warn};

/// Check `account`/`secret` against the user map.
///
/// The secret is verified before the enabled flag, so only someone who knows
/// the password learns that an account is disabled.
pub fn authenticate(users: &UserMap, account: &str, secret: &str) -> Result<Role, AuthError> {
    let record = users
        .get(account.trim())
        .ok_or(AuthError::UnknownAccount)?;

    if !SecretHasher::verify(&record.credential, secret) {
        return Err(AuthError::BadSecret);
    }

    if !record.enabled {
        return Err(AuthError::Disabled);
    }

    if !SecretHasher::is_hashed(&record.credential) {
        warn!("Account {} still has a plaintext credential", account.trim());
    }

    Ok(record.role)
}

/// LOGGED_OUT → LOGGED_IN(role). On failure `session` is left as it was.
pub fn login(
    credentials: &Credentials,
    session: &SessionContext,
    account: &str,
    secret: &str,
) -> AppResult<SessionContext> {
    let users = credentials.load_users().inspect_err(|e| {
        error!("Cannot read credential sheet during login: {e}");
    })?;

    let account = account.trim();
    match authenticate(&users, account, secret) {
        Ok(role) => {
            info!("Login ok: {account} ({})", role.to_db_str());
            Ok(session.logged_in(account, role))
        }
        Err(e) => {
            info!("Login refused for {account}: {e}");
            Err(e.into())
        }
    }
}

/// Unconditional reset.
pub fn logout(session: &SessionContext, default_language: Language) -> SessionContext {
    if session.logged_in {
        info!("Logout: {}", session.identity);
    }
    SessionContext::logged_out(default_language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRecord;

    fn users() -> UserMap {
        let mut m = UserMap::new();
        m.insert(
            "alice".into(),
            UserRecord {
                credential: "pw1".into(),
                role: Role::User,
                enabled: true,
            },
        );
        m.insert(
            "carol".into(),
            UserRecord {
                credential: "pw3".into(),
                role: Role::Admin,
                enabled: false,
            },
        );
        m
    }

    #[test]
    fn outcomes() {
        let u = users();
        assert_eq!(authenticate(&u, "alice", "pw1"), Ok(Role::User));
        assert_eq!(authenticate(&u, "alice", "wrong"), Err(AuthError::BadSecret));
        assert_eq!(authenticate(&u, "bob", "pw1"), Err(AuthError::UnknownAccount));
        assert_eq!(authenticate(&u, "carol", "pw3"), Err(AuthError::Disabled));
        assert_eq!(authenticate(&u, "carol", "nope"), Err(AuthError::BadSecret));
    }

    #[test]
    fn empty_map_refuses_everyone() {
        assert_eq!(
            authenticate(&UserMap::new(), "alice", "pw1"),
            Err(AuthError::UnknownAccount)
        );
    }
}
