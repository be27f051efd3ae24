//! Bearer-token authorization middleware.
//!
//! `JwtAuth` pulls the token from the Authorization header, checks it with
//! the `TokenIssuer` held in `AppState` against a required scope and role
//! set, and injects an `AuthContext` into the request extensions.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use pv_core::domain::entities::{Role, TokenScope};
use pv_core::errors::{DomainError, TokenError};
use pv_core::services::token::VerifiedToken;

use crate::app::AppState;
use crate::handlers::ApiError;

/// Caller identity taken from a verified token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
    pub scope: TokenScope,
    pub role: Option<Role>,
}

impl From<VerifiedToken> for AuthContext {
    fn from(token: VerifiedToken) -> Self {
        Self {
            subject: token.subject,
            scope: token.scope,
            role: token.role,
        }
    }
}

/// Middleware factory requiring a token of `scope` held by one of `roles`
#[derive(Clone)]
pub struct JwtAuth {
    scope: TokenScope,
    roles: Arc<[Role]>,
}

impl JwtAuth {
    pub fn new(scope: TokenScope, roles: &[Role]) -> Self {
        Self {
            scope,
            roles: Arc::from(roles),
        }
    }

    /// Role-access token held by an officer or admin
    pub fn officer() -> Self {
        Self::new(TokenScope::RoleAccess, &[Role::Officer, Role::Admin])
    }

    /// Role-access token held by an admin
    pub fn admin() -> Self {
        Self::new(TokenScope::RoleAccess, &[Role::Admin])
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            scope: self.scope,
            roles: self.roles.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    scope: TokenScope,
    roles: Arc<[Role]>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let scope = self.scope;
        let roles = self.roles.clone();

        Box::pin(async move {
            let token = extract_bearer_token(&req)
                .ok_or_else(|| ApiError(DomainError::Token(TokenError::InvalidTokenFormat)))?;

            let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                ApiError(DomainError::internal("application state not configured"))
            })?;

            let verified = state
                .services
                .tokens
                .authorize(&token, scope, &roles)
                .map_err(|e| {
                    tracing::warn!(
                        path = %req.path(),
                        code = e.error_code(),
                        "Rejected bearer token"
                    );
                    ApiError(e)
                })?;

            req.extensions_mut().insert(AuthContext::from(verified));
            service.call(req).await
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result: Result<Self, Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(DomainError::Token(TokenError::InvalidTokenFormat)).into());

        ready(result)
    }
}
