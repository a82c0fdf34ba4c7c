use std::net::IpAddr;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use subtle::ConstantTimeEq;

use crate::{
    config::AuthConfig,
    error::{AppError, Result},
};

pub mod lockout;
pub mod session;

use lockout::LoginLockout;
pub use session::{AdminSession, SessionStore};

/// The configured admin secret.
enum AdminSecret {
    /// Argon2 PHC string.
    Hashed(String),
    Plain(String),
    /// No secret configured: every privileged request is refused.
    Unset,
}

pub struct AuthService {
    session_store: SessionStore,
    secret: AdminSecret,
    session_duration: Duration,
    lockout: LoginLockout,
}

impl AuthService {
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Self {
        let secret = match (&config.admin_password_hash, &config.admin_password) {
            (Some(hash), _) if !hash.is_empty() => AdminSecret::Hashed(hash.clone()),
            (_, Some(password)) if !password.is_empty() => AdminSecret::Plain(password.clone()),
            _ => AdminSecret::Unset,
        };

        Self {
            session_store: SessionStore::new(pool),
            secret,
            session_duration: Duration::hours(config.session_duration_hours),
            lockout: LoginLockout::new(
                config.max_failed_attempts,
                Duration::minutes(config.lockout_minutes),
            ),
        }
    }

    /// Argon2 is CPU-bound, so both hashing helpers run on the blocking pool.
    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hash)
                .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

            let argon2 = Argon2::default();

            Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?
    }

    /// Hash a password using Argon2, for `auth.admin_password_hash`.
    pub async fn hash_password(password: &str) -> Result<String> {
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::default();

            let password_hash = argon2
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

            Ok(password_hash.to_string())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn secret_matches(&self, candidate: &str) -> Result<bool> {
        match &self.secret {
            AdminSecret::Hashed(hash) => Self::verify_password(candidate, hash).await,
            AdminSecret::Plain(expected) => {
                Ok(bool::from(candidate.as_bytes().ct_eq(expected.as_bytes())))
            }
            AdminSecret::Unset => Ok(false),
        }
    }

    /// Checks the admin secret presented by `client`. Each check holds a
    /// lockout attempt; only a match gives it back.
    pub async fn check_admin_password(&self, client: IpAddr, candidate: &str) -> Result<()> {
        if let Err(retry_after) = self.lockout.try_begin(client).await {
            tracing::warn!("Admin credential check refused for locked-out client {}", client);
            return Err(AppError::TooManyRequests(retry_after));
        }

        if self.secret_matches(candidate).await? {
            self.lockout.clear(client).await;
            return Ok(());
        }

        tracing::warn!("Rejected admin credential from {}", client);
        Err(AppError::Unauthorized)
    }

    /// Exchanges the admin secret for a session token.
    pub async fn login(&self, client: IpAddr, password: &str) -> Result<(AdminSession, String)> {
        self.check_admin_password(client, password).await?;

        let token = generate_token();
        let expires_at = Utc::now() + self.session_duration;
        let session = self.session_store.create(&token, expires_at).await?;

        tracing::info!("Issued admin session {} to {}", session.id, client);
        Ok((session, token))
    }

    pub async fn validate_session(&self, token: &str) -> Result<Option<AdminSession>> {
        self.session_store.find_by_token(token).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<bool> {
        self.session_store.delete_by_token(token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.cleanup_expired().await
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn config(hash: Option<String>, plain: Option<&str>) -> AuthConfig {
        AuthConfig {
            admin_password_hash: hash,
            admin_password: plain.map(str::to_string),
            session_duration_hours: 1,
            max_failed_attempts: 2,
            lockout_minutes: 10,
        }
    }

    async fn service(config: &AuthConfig) -> AuthService {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        AuthService::new(pool, config)
    }

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[tokio::test]
    async fn test_password_hashing() {
        let hash = AuthService::hash_password("my_secure_password").await.unwrap();

        assert!(AuthService::verify_password("my_secure_password", &hash).await.unwrap());
        assert!(!AuthService::verify_password("wrong_password", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashed_secret_takes_precedence() {
        let hash = AuthService::hash_password("from-hash").await.unwrap();
        let auth = service(&config(Some(hash), Some("from-plain"))).await;

        assert!(auth.check_admin_password(CLIENT, "from-hash").await.is_ok());
        assert!(matches!(
            auth.check_admin_password(CLIENT, "from-plain").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn unset_secret_refuses_everything() {
        let auth = service(&config(None, Some(""))).await;
        assert!(matches!(
            auth.check_admin_password(CLIENT, "").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn repeated_failures_lock_out_even_correct_secret() {
        let auth = service(&config(None, Some("s3cret"))).await;

        for _ in 0..2 {
            assert!(matches!(
                auth.check_admin_password(CLIENT, "guess").await,
                Err(AppError::Unauthorized)
            ));
        }
        assert!(matches!(
            auth.check_admin_password(CLIENT, "s3cret").await,
            Err(AppError::TooManyRequests(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_wrong_guesses_stop_at_limit() {
        let hash = AuthService::hash_password("s3cret").await.unwrap();
        let mut config = config(Some(hash), None);
        config.max_failed_attempts = 3;
        let auth = std::sync::Arc::new(service(&config).await);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let auth = std::sync::Arc::clone(&auth);
                tokio::spawn(async move {
                    auth.check_admin_password(CLIENT, &format!("guess-{i}")).await
                })
            })
            .collect();

        let (mut rejected, mut locked) = (0, 0);
        for handle in handles {
            match handle.await.unwrap() {
                Err(AppError::Unauthorized) => rejected += 1,
                Err(AppError::TooManyRequests(_)) => locked += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(rejected, 3);
        assert_eq!(locked, 13);

        assert!(matches!(
            auth.check_admin_password(CLIENT, "s3cret").await,
            Err(AppError::TooManyRequests(_))
        ));
    }

    #[tokio::test]
    async fn login_issues_token_that_validates_until_logout() {
        let auth = service(&config(None, Some("s3cret"))).await;

        let (session, token) = auth.login(CLIENT, "s3cret").await.unwrap();
        assert_eq!(token.len(), 64);
        assert!(session.expires_at > Utc::now());

        let found = auth.validate_session(&token).await.unwrap();
        assert_eq!(found.map(|s| s.id), Some(session.id));

        assert!(auth.invalidate_session(&token).await.unwrap());
        assert!(auth.validate_session(&token).await.unwrap().is_none());
        assert_eq!(auth.cleanup_expired_sessions().await.unwrap(), 0);
    }
}
