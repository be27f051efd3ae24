//! Scoped token issuer implementation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::{Claims, Role, TokenScope};
use crate::errors::{DomainError, TokenError};

use super::config::TokenIssuerConfig;

/// A freshly signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub scope: TokenScope,
    pub expires_at: DateTime<Utc>,
}

/// Claims that survived signature and window checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedToken {
    pub subject: String,
    pub scope: TokenScope,
    pub role: Option<Role>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies scoped HS256 tokens
pub struct TokenIssuer {
    config: TokenIssuerConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: TokenIssuerConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn config(&self) -> &TokenIssuerConfig {
        &self.config
    }

    /// Signs a token for `subject` with the given scope, role and lifetime
    pub fn issue_scoped(
        &self,
        subject: &str,
        scope: TokenScope,
        role: Option<Role>,
        ttl: Duration,
    ) -> Result<IssuedToken, DomainError> {
        let claims = Claims::new(
            subject,
            scope,
            role,
            ttl,
            self.config.issuer.as_str(),
            self.config.audience.as_str(),
        );
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        Ok(IssuedToken {
            token,
            scope,
            expires_at: claims.expires_at(),
        })
    }

    /// Token handed out after a successful OTP verification
    pub fn issue_pending_password(&self, subject: &str) -> Result<IssuedToken, DomainError> {
        self.issue_scoped(
            subject,
            TokenScope::OtpVerifiedPendingPassword,
            None,
            self.config.pending_password_ttl,
        )
    }

    pub fn issue_session(&self, subject: &str) -> Result<IssuedToken, DomainError> {
        self.issue_scoped(
            subject,
            TokenScope::Session,
            Some(Role::Citizen),
            self.config.session_ttl,
        )
    }

    /// Officer and admin tokens
    pub fn issue_role_access(&self, subject: &str, role: Role) -> Result<IssuedToken, DomainError> {
        self.issue_scoped(
            subject,
            TokenScope::RoleAccess,
            Some(role),
            self.config.role_access_ttl,
        )
    }

    /// Checks signature, issuer, audience and validity window
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, DomainError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let err = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::InvalidIssuer
                    | ErrorKind::InvalidAudience
                    | ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims,
                    _ => TokenError::InvalidTokenFormat,
                };
                DomainError::Token(err)
            })?;

        let claims = token_data.claims;
        Ok(VerifiedToken {
            expires_at: claims.expires_at(),
            subject: claims.sub,
            scope: claims.scope,
            role: claims.role,
        })
    }

    /// Verifies `token` and requires `scope`, plus one of `allowed_roles`
    /// when that list is non-empty
    pub fn authorize(
        &self,
        token: &str,
        scope: TokenScope,
        allowed_roles: &[Role],
    ) -> Result<VerifiedToken, DomainError> {
        let verified = self.verify(token)?;

        if verified.scope != scope {
            return Err(TokenError::ScopeMismatch {
                expected: scope.to_string(),
                actual: verified.scope.to_string(),
            }
            .into());
        }

        if !allowed_roles.is_empty() {
            let permitted = verified
                .role
                .map(|role| allowed_roles.contains(&role))
                .unwrap_or(false);
            if !permitted {
                return Err(TokenError::InsufficientPermissions.into());
            }
        }

        Ok(verified)
    }
}
