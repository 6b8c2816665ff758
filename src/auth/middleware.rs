use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::auth::{policy, TokenService};
use crate::error::AppError;
use crate::models::{Role, UserView};

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Routes under the gate that must stay reachable without a session.
const PUBLIC_PATHS: &[&str] = &["/api/auth/register", "/api/auth/login"];

/// Resolves the request's bearer token to a live user.
///
/// A missing header and an undecodable token produce identical 401 bodies,
/// so a caller cannot probe which part of their credentials was wrong.
pub async fn authenticate(req: &ServiceRequest) -> Result<UserView, Error> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.into()))?;

    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::InternalServerError("TokenService not configured".into()))?;
    let claims = tokens
        .verify(token)
        .map_err(|_| AppError::Unauthorized(NOT_AUTHORIZED.into()))?;

    let pool = req
        .app_data::<web::Data<PgPool>>()
        .ok_or_else(|| AppError::InternalServerError("Database pool not configured".into()))?;

    let user = sqlx::query_as::<_, UserView>(
        "SELECT id, name, email, role, is_active, created_at FROM users WHERE id = $1",
    )
    .bind(claims.sub)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(AppError::from)?
    .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is deactivated".into()).into());
    }

    Ok(user)
}

/// Session gate for the `/api` scope.
///
/// Lets the register and login routes through untouched and requires a valid
/// bearer token for everything else. The user behind the token is loaded
/// fresh from the database on every request, so deactivated or deleted
/// accounts lose access immediately, not when their token expires.
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    // Rc because the handle is cloned into the authentication future.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if PUBLIC_PATHS.contains(&req.path()) {
            return Box::pin(self.service.call(req));
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let user = authenticate(&req).await?;
            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

/// Role check for scopes inside the authenticated area, such as `/admin`.
///
/// Relies on [`AuthGate`] having already resolved the user into request
/// extensions; a missing user is treated as unauthenticated, not forbidden.
pub struct RoleGuard {
    allowed: &'static [Role],
}

impl RoleGuard {
    /// Guard that admits administrators only.
    pub fn admin() -> RoleGuard {
        RoleGuard {
            allowed: &[Role::Admin],
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RoleGuardMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleGuardMiddleware {
            service,
            allowed: self.allowed,
        }))
    }
}

pub struct RoleGuardMiddleware<S> {
    service: S,
    allowed: &'static [Role],
}

impl<S, B> Service<ServiceRequest> for RoleGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The extensions borrow has to end before `req` moves on.
        let decision = {
            let extensions = req.extensions();
            match extensions.get::<UserView>() {
                Some(user) => policy::require_role(user, self.allowed),
                None => Err(AppError::Unauthorized(NOT_AUTHORIZED.into())),
            }
        };

        match decision {
            Ok(()) => Box::pin(self.service.call(req)),
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}
