use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use service::auth::domain::{AuthUser, Identity, LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::TokenService;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

#[derive(Serialize)]
pub struct UserOutput {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<AuthUser> for UserOutput {
    fn from(u: AuthUser) -> Self {
        Self { id: u.id, username: u.username, email: u.email }
    }
}

#[derive(Serialize)]
pub struct AuthOutput {
    pub message: String,
    pub token: String,
    pub user: UserOutput,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user: UserOutput,
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: Some(state.auth.jwt_secret.clone()),
            password_algorithm: "argon2".into(),
        },
    )
}

#[utoipa::path(post, path = "/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthOutput>), JsonApiError> {
    let svc = auth_service(&state);
    match svc.register(input).await {
        Ok(session) => {
            let token = session.token.ok_or_else(|| {
                JsonApiError::internal("token generation failed", None)
            })?;
            Ok((
                StatusCode::CREATED,
                Json(AuthOutput {
                    message: "User registered successfully".into(),
                    token,
                    user: session.user.into(),
                }),
            ))
        }
        Err(AuthError::Validation(msg)) => Err(JsonApiError::new(StatusCode::BAD_REQUEST, msg, None)),
        Err(AuthError::Conflict) => Err(JsonApiError::new(
            StatusCode::CONFLICT,
            "User already exists with that email or username",
            None,
        )),
        Err(e) => {
            error!(code = e.code(), err = %e, "register failed");
            Err(JsonApiError::internal("Error registering user", Some(e.to_string())))
        }
    }
}

#[utoipa::path(post, path = "/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<AuthOutput>, JsonApiError> {
    let svc = auth_service(&state);
    match svc.login(input).await {
        Ok(session) => {
            let token = session.token.ok_or_else(|| {
                JsonApiError::internal("token generation failed", None)
            })?;
            Ok(Json(AuthOutput {
                message: "Login successful".into(),
                token,
                user: session.user.into(),
            }))
        }
        Err(AuthError::Validation(msg)) => Err(JsonApiError::new(StatusCode::BAD_REQUEST, msg, None)),
        Err(AuthError::Unauthorized) => Err(JsonApiError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid email or password",
            None,
        )),
        Err(e) => {
            error!(code = e.code(), err = %e, "login failed");
            Err(JsonApiError::internal("Error logging in", Some(e.to_string())))
        }
    }
}

#[utoipa::path(get, path = "/me", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized"), (status = 404, description = "Not Found")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<MeOutput>, JsonApiError> {
    let svc = auth_service(&state);
    match svc.me(identity.user_id).await {
        Ok(user) => Ok(Json(MeOutput { user: user.into() })),
        Err(AuthError::NotFound) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, "User not found", None))
        }
        Err(e) => {
            error!(code = e.code(), err = %e, "me lookup failed");
            Err(JsonApiError::internal("Error fetching user", Some(e.to_string())))
        }
    }
}

/// Request gate for protected routes: expects `Authorization: Bearer <token>`,
/// verifies it, and injects the decoded identity into request extensions.
/// Performs no database access.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned);

    let Some(token) = token else {
        return Err(JsonApiError::new(
            StatusCode::UNAUTHORIZED,
            "No token, authorization denied",
            None,
        ));
    };

    match TokenService::new(state.auth.jwt_secret.clone()).verify(&token) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %req.uri().path(), err = %e, "token validation failed");
            Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Token is not valid", None))
        }
    }
}
