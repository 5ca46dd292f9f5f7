use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{default_ttl, parse_ttl, Claims, TokenIssuer};
use crate::config::AuthConfig;
use crate::db::{CredentialStore, PublicUser};
use crate::error::{AuthError, DatabaseError};
use crate::Result;

/// A successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: PublicUser,
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> Self {
        let ttl = resolve_ttl(&config.jwt_expires_in);
        Self {
            store,
            tokens: TokenIssuer::new(&config.jwt_secret, ttl),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn token_ttl(&self) -> Duration {
        self.tokens.ttl()
    }

    /// Creates an account. Does not log the user in.
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        require_credentials(email, password)?;

        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken.into());
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;

        // A concurrent registration can pass the lookup above; the store decides.
        match self.store.create(email, &password_hash).await {
            Ok(user) => {
                info!("Registered user {}", user.id);
                Ok(())
            }
            Err(DatabaseError::Duplicate) => Err(AuthError::EmailTaken.into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
        require_credentials(email, password)?;

        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AuthError::WrongPassword.into());
        }

        let (token, expires_at) = self.tokens.issue(&user)?;
        debug!("Issued token for user {} expiring at {}", user.id, expires_at);

        Ok(Session {
            token,
            expires_at,
            user: PublicUser::from(&user),
        })
    }

    /// Checks signature and expiry of a token issued by this service.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.decode(token).map_err(|e| {
            debug!("Rejected token: {}", e);
            AuthError::InvalidToken.into()
        })
    }
}

fn require_credentials(email: &str, password: &str) -> Result<()> {
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidInput("email and password are required".into()).into());
    }
    Ok(())
}

fn resolve_ttl(configured: &str) -> Duration {
    parse_ttl(configured).unwrap_or_else(|| {
        warn!(
            "Invalid token lifetime {:?}, falling back to {} days",
            configured,
            default_ttl().num_days()
        );
        default_ttl()
    })
}
