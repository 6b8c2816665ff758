use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    hash_password, verify_password, AuthResponse, CurrentUser, LoginRequest, RegisterRequest,
    TokenService,
};
use crate::error::AppError;
use crate::models::{Role, User, UserProfile};

/// Register a new user
///
/// Creates an account and returns an authentication token alongside the new
/// profile. Emails are stored lowercased so lookups stay case-insensitive
/// regardless of how the client typed them. The duplicate pre-check keeps
/// the common failure a clean 400; the UNIQUE constraint still backstops
/// concurrent registrations, surfacing as 409.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let name = register_data.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::ValidationError("Please provide your name".into()));
    }
    let email = register_data.email.trim().to_lowercase();

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool.get_ref())
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    // Hash here, once; the database never sees plaintext.
    let password_hash = hash_password(&register_data.password)?;

    let user = sqlx::query_as::<_, UserProfile>(
        "INSERT INTO users (id, name, email, password_hash, role, is_active)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         RETURNING id, name, email, role",
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(Role::default())
    .fetch_one(pool.get_ref())
    .await?;

    let token = tokens.issue(user.id)?;

    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. Unknown email
/// and wrong password return identical responses. Deactivated accounts may
/// still log in; the authentication gate rejects their token on the next
/// request.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let email = login_data.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, role, is_active, created_at
         FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserProfile::from(user),
    }))
}

/// Returns the authenticated user's profile.
#[get("/me")]
pub async fn me(current: CurrentUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(UserProfile::from(current.0)))
}
