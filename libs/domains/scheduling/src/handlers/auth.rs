use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
    },
};
use serde_json::json;

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{LoginForm, RegisterUser, TokenResponse, User};
use crate::policy;
use crate::service::UserService;

pub const TAG: &str = "auth";

/// State for the unauthenticated routes: account lookup plus the token issuer.
#[derive(Clone)]
pub struct AuthState {
    pub users: UserService,
    pub jwt: JwtAuth,
}

pub(crate) fn router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/jwt/login", post(login))
        .with_state(state)
}

/// Create an account
///
/// New accounts are active, unverified and never superusers.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = TAG,
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> SchedulingResult<impl IntoResponse> {
    let user = state.users.register(input).await?;

    AuditEvent::new(
        Some(user.id),
        "user.register",
        format!("user:{}", user.id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .log();

    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/auth/jwt/login",
    tag = TAG,
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 400, description = "Incorrect email or password, or inactive account"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> SchedulingResult<Json<TokenResponse>> {
    let user = match state.users.authenticate(&form.username, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            AuditEvent::new(None, "auth.login", "auth:login", AuditOutcome::Failure)
                .with_headers(&headers)
                .with_details(json!({ "email": form.username }))
                .log();
            return Err(e);
        }
    };

    let token = state
        .jwt
        .create_access_token(&user.id.to_string(), &user.email, &policy::roles_for(&user))
        .map_err(|e| SchedulingError::Internal(format!("Failed to issue token: {}", e)))?;

    AuditEvent::new(
        Some(user.id),
        "auth.login",
        format!("user:{}", user.id),
        AuditOutcome::Success,
    )
    .with_headers(&headers)
    .log();

    Ok(Json(TokenResponse::bearer(token)))
}
