//! Bearer-token verification and user provisioning.
//!
//! Sign-in happens at an external identity provider. Requests carry the
//! provider's HS256 JWT; this service checks it and maps the subject onto an
//! application [`User`], creating one on first sight.

use db::models::user::{CreateUser, User};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const USERNAME_SUFFIX_LEN: usize = 5;
const PROVISION_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("could not provision user after repeated conflicts")]
    ProvisioningConflict,
}

impl From<jsonwebtoken::errors::Error> for IdentityError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => IdentityError::Expired,
            _ => IdentityError::InvalidToken(err.to_string()),
        }
    }
}

/// Claims read from the provider's access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Clone)]
pub struct IdentityService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityService {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaims, IdentityError> {
        let data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)?;
        if data.claims.sub.trim().is_empty() {
            return Err(IdentityError::InvalidToken("empty subject".to_string()));
        }
        Ok(data.claims)
    }

    /// Verify `token` and return the matching application user
    pub async fn authenticate(&self, pool: &SqlitePool, token: &str) -> Result<User, IdentityError> {
        let claims = self.verify(token)?;
        Self::resolve_user(pool, &claims).await
    }

    /// Find the user for these claims: by subject, then by e-mail (re-linking
    /// the subject), otherwise provision a new account.
    ///
    /// Concurrent first requests for one subject race on the insert; the loser
    /// sees a unique violation and picks up the winner's row on the next pass.
    pub async fn resolve_user(
        pool: &SqlitePool,
        claims: &IdentityClaims,
    ) -> Result<User, IdentityError> {
        let email = claims.email.as_deref().filter(|e| !e.trim().is_empty());
        let base = base_username(&claims.sub, email);

        for attempt in 1..=PROVISION_ATTEMPTS {
            if let Some(user) = Self::find_existing(pool, &claims.sub, email).await? {
                return Ok(user);
            }

            let username = Self::available_username(pool, &base).await?;
            let created = User::create(
                pool,
                &CreateUser {
                    auth_id: claims.sub.clone(),
                    username,
                    email: email.map(str::to_string),
                },
                Uuid::new_v4(),
            )
            .await;

            match created {
                Ok(user) => {
                    info!(user_id = %user.id, username = %user.username, "Provisioned user on first sign-in");
                    return Ok(user);
                }
                Err(err) if is_unique_violation(&err) => {
                    debug!(attempt, error = %err, "User insert conflicted, retrying lookup");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(sub = %claims.sub, "Gave up provisioning user after repeated conflicts");
        Err(IdentityError::ProvisioningConflict)
    }

    async fn find_existing(
        pool: &SqlitePool,
        sub: &str,
        email: Option<&str>,
    ) -> Result<Option<User>, IdentityError> {
        if let Some(user) = User::find_by_auth_id(pool, sub).await? {
            return Ok(Some(user));
        }

        if let Some(email) = email {
            if let Some(existing) = User::find_by_email(pool, email).await? {
                let user = User::link_auth_id(pool, existing.id, sub).await?;
                info!(user_id = %user.id, "Linked existing user to new identity subject");
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    async fn available_username(pool: &SqlitePool, base: &str) -> Result<String, IdentityError> {
        if User::find_by_username(pool, base).await?.is_none() {
            return Ok(base.to_string());
        }
        let candidate = format!("{base}_{}", random_suffix());
        debug!(base, candidate = %candidate, "Username taken, using suffixed variant");
        Ok(candidate)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// E-mail local part, or `user_` plus the first eight characters of the subject
fn base_username(sub: &str, email: Option<&str>) -> String {
    email
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("user_{}", sub.chars().take(8).collect::<String>()))
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(USERNAME_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
