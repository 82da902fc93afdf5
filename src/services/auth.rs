//! Auth services - Endpoint di login

use super::envelope;
use crate::core::{AppError, AppState, JwtProvider};
use crate::features::auth::{LoginCommand, LoginHandler, SignInManager};
use crate::pipeline::Pipeline;
use axum::{
    extract::{Json, State},
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

#[instrument(skip(state, body), fields(identifier = %body.email_or_username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginCommand>,
) -> Result<Response, AppError> {
    let tokens = JwtProvider::new(&state.user, &state.jwt);
    let sign_in = SignInManager::new(&state.user, &state.lockout);
    let handler = LoginHandler::new(&state.user, sign_in, &tokens);

    let result = Pipeline::new().send(&handler, body).await?;
    Ok(envelope(result))
}
