use crate::core::{AppError, AppState};
use crate::dtos::LoginResponse;
use crate::entities::User;
use crate::repositories::UserStore;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "Admin";

/// Parametri di firma e validazione dei token
#[derive(Debug, Clone)]
pub struct JwtOptions {
    pub issuer: String,
    pub audience: String,
    pub secret_key: String,
}

impl JwtOptions {
    pub fn access_token_lifetime() -> Duration {
        Duration::hours(1)
    }

    pub fn refresh_token_extra_lifetime() -> Duration {
        Duration::hours(1)
    }
}

// struct che codifica il contenuto del token jwt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub nbf: i64, // Not valid before
    pub iat: i64, // Issued at time of the token
    pub exp: i64, // Expiry time of the token
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.iter().any(|r| r == role)
    }
}

/// Issues the credentials handed out after a successful login
pub trait TokenIssuer {
    /// Builds access + refresh credentials for `user` and persists the refresh
    /// credential onto the user record
    async fn create_token(&self, user: &mut User) -> Result<LoginResponse, AppError>;
}

/// Token issuer backed by HS512 JWTs and the identity store
pub struct JwtProvider<'a, S> {
    users: &'a S,
    options: &'a JwtOptions,
}

impl<'a, S: UserStore> JwtProvider<'a, S> {
    pub fn new(users: &'a S, options: &'a JwtOptions) -> Self {
        Self { users, options }
    }

    /// Signs an access token valid for one hour from `now`
    #[instrument(skip(self, user, roles), fields(username = %user.username))]
    pub fn encode_jwt(
        &self,
        user: &User,
        roles: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
        debug!("Encoding JWT token for user");
        let expires = now + JwtOptions::access_token_lifetime();
        let claims = Claims {
            email: user.email.clone(),
            name: user.username.clone(),
            role: roles,
            iss: self.options.issuer.clone(),
            aud: self.options.audience.clone(),
            nbf: now.timestamp(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(self.options.secret_key.as_bytes()),
        )
        .inspect_err(|e| error!("Failed to encode JWT token: {:?}", e))?;

        info!("JWT token encoded successfully");
        Ok((token, expires))
    }
}

impl<S: UserStore> TokenIssuer for JwtProvider<'_, S> {
    async fn create_token(&self, user: &mut User) -> Result<LoginResponse, AppError> {
        let roles = self.users.roles_of(&user.id).await?;
        let (token, expires) = self.encode_jwt(user, roles, Utc::now())?;

        let refresh_token = Uuid::new_v4().to_string();
        let refresh_token_expires = expires + JwtOptions::refresh_token_extra_lifetime();

        user.credentials.refresh_token = Some(refresh_token.clone());
        user.credentials.refresh_token_expires = Some(refresh_token_expires);
        self.users.update(user).await?;
        debug!("Refresh token stored for user {}", user.username);

        Ok(LoginResponse {
            token,
            refresh_token,
            refresh_token_expires,
        })
    }
}

#[instrument(skip(jwt_token, options))]
pub fn decode_jwt(
    jwt_token: &str,
    options: &JwtOptions,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    debug!("Decoding JWT token");
    let mut validation = Validation::new(Algorithm::HS512);
    validation.set_issuer(&[options.issuer.as_str()]);
    validation.set_audience(&[options.audience.as_str()]);
    validation.validate_nbf = true;

    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(options.secret_key.as_bytes()),
        &validation,
    )
    .inspect(|data| info!("JWT token decoded successfully for user: {}", data.claims.name))
    .inspect_err(|e| warn!("Failed to decode JWT token: {:?}", e))
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Invalid authorization header")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::unauthorized(
                "Please add the JWT token to the header",
            ));
        }
    };

    let mut header = auth_header.split_whitespace();
    let token = match (header.next(), header.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => {
            warn!("Authorization header is not a bearer token");
            return Err(AppError::unauthorized("Expected a bearer token"));
        }
    };

    let token_data = decode_jwt(token, &state.jwt)
        .map_err(|_| AppError::unauthorized("Unable to decode token"))?;

    info!("User authenticated: {}", token_data.claims.name);
    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

/// Helper function per verificare che l'utente autenticato abbia il ruolo richiesto
#[instrument(skip(claims), fields(username = %claims.name))]
pub fn require_role(claims: &Claims, role: &str) -> Result<(), AppError> {
    if !claims.has_role(role) {
        warn!("User {} lacks role {}", claims.name, role);
        return Err(AppError::forbidden("Insufficient role")
            .with_details(format!("This action requires the {} role", role)));
    }
    debug!("Role check passed");
    Ok(())
}
