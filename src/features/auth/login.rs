//! Login - Comando e handler di autenticazione

use super::sign_in::{SignInManager, SignInResult};
use crate::core::{ApiResult, AppError, FailureKind, TokenIssuer};
use crate::dtos::LoginResponse;
use crate::pipeline::{DeriveValidator, Handler, LogRecord, Loggable, Request, Validator};
use crate::repositories::UserStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

#[derive(Serialize, Deserialize, Clone, Validate)]
pub struct LoginCommand {
    #[validate(length(min = 3, message = "Username or email must be at least 3 characters long."))]
    pub email_or_username: String,
    #[validate(length(min = 1, message = "Password must be at least 1 character long."))]
    pub password: String,
}

impl Loggable for LoginCommand {
    fn log_repr(&self) -> String {
        LogRecord::new("LoginCommand")
            .field("email_or_username", &self.email_or_username)
            .masked("password")
            .finish()
    }
}

impl Request for LoginCommand {
    type Data = LoginResponse;
    const NAME: &'static str = "LoginCommand";

    fn validators() -> Vec<Box<dyn Validator<Self>>> {
        vec![Box::new(DeriveValidator)]
    }
}

pub struct LoginHandler<'a, S, T> {
    users: &'a S,
    sign_in: SignInManager<'a, S>,
    tokens: &'a T,
}

impl<'a, S: UserStore, T: TokenIssuer> LoginHandler<'a, S, T> {
    pub fn new(users: &'a S, sign_in: SignInManager<'a, S>, tokens: &'a T) -> Self {
        Self {
            users,
            sign_in,
            tokens,
        }
    }
}

/// Whole minutes left on a lockout, rounded up
fn remaining_minutes(lockout_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (lockout_end - now).num_milliseconds().max(0);
    (millis + 59_999) / 60_000
}

impl<S: UserStore, T: TokenIssuer> Handler<LoginCommand> for LoginHandler<'_, S, T> {
    async fn handle(&self, request: LoginCommand) -> Result<ApiResult<LoginResponse>, AppError> {
        self.handle_at(request, Utc::now()).await
    }
}

impl<S: UserStore, T: TokenIssuer> LoginHandler<'_, S, T> {
    /// `now` is both the instant of the lockout check and the base of the
    /// remaining minutes, so a locked outcome always reports at least 1 minute
    async fn handle_at(
        &self,
        request: LoginCommand,
        now: DateTime<Utc>,
    ) -> Result<ApiResult<LoginResponse>, AppError> {
        info!("Login attempt started for {}", request.email_or_username);

        let Some(mut user) = self
            .users
            .find_by_username_or_email(&request.email_or_username)
            .await?
        else {
            warn!("User not found: {}", request.email_or_username);
            return Ok(ApiResult::failure(FailureKind::NotFound, "User not found."));
        };

        let outcome = self
            .sign_in
            .check_password_sign_in_at(&mut user, &request.password, true, now)
            .await?;

        match outcome {
            SignInResult::LockedOut => {
                let Some(lockout_end) = user.credentials.lockout_end else {
                    error!("User account lockout end is not defined: {}", request.email_or_username);
                    return Ok(ApiResult::failure(
                        FailureKind::Internal,
                        "An error occurred. Please contact support.",
                    ));
                };
                let minutes = remaining_minutes(lockout_end, now);
                warn!(
                    "User account is locked: {}, lockout time remaining: {} minutes",
                    request.email_or_username, minutes
                );
                Ok(ApiResult::failure(
                    FailureKind::Client,
                    format!(
                        "Your account is locked for {} minutes due to {} failed login attempts.",
                        minutes,
                        self.sign_in.policy().max_failed_attempts
                    ),
                ))
            }
            SignInResult::NotAllowed => {
                warn!("Login not allowed for user {}: Email not confirmed.", request.email_or_username);
                Ok(ApiResult::failure(FailureKind::Client, "Your email is not confirmed."))
            }
            SignInResult::Failed => {
                warn!("Incorrect password for user {}", request.email_or_username);
                Ok(ApiResult::failure(
                    FailureKind::Client,
                    "Invalid username/email or password.",
                ))
            }
            SignInResult::Succeeded => {
                let response = self.tokens.create_token(&mut user).await?;
                info!("Login successful for {}", request.email_or_username);
                Ok(ApiResult::succeed(response))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JwtOptions, JwtProvider};
    use crate::entities::{CredentialState, User};
    use crate::features::auth::LockoutPolicy;
    use crate::pipeline::Pipeline;
    use crate::repositories::fakes::FakeUserStore;
    use chrono::Duration;
    use uuid::Uuid;

    fn options() -> JwtOptions {
        JwtOptions {
            issuer: "tests".to_string(),
            audience: "tests-clients".to_string(),
            secret_key: "ilmiobellissimosegretochevaassolutamentecambiato".to_string(),
        }
    }

    fn alice() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            credentials: CredentialState {
                password_hash: bcrypt::hash("Secret123!", 4).unwrap(),
                lockout_enabled: true,
                ..Default::default()
            },
        }
    }

    fn login(identifier: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email_or_username: identifier.to_string(),
            password: password.to_string(),
        }
    }

    async fn run(store: &FakeUserStore, command: LoginCommand) -> ApiResult<LoginResponse> {
        let policy = LockoutPolicy::default();
        let options = options();
        let tokens = JwtProvider::new(store, &options);
        let handler = LoginHandler::new(store, SignInManager::new(store, &policy), &tokens);
        Pipeline::new().send(&handler, command).await.unwrap()
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_not_found() {
        let store = FakeUserStore::with_user(alice(), Vec::new());

        let result = run(&store, login("nobody", "Secret123!")).await;

        assert!(result.is_failure_of(FailureKind::NotFound));
        assert_eq!(result.error_messages, vec!["User not found.".to_string()]);
    }

    #[tokio::test]
    async fn test_login_by_email_persists_refresh_token() {
        let user = alice();
        let store = FakeUserStore::with_user(user.clone(), vec!["Admin".to_string()]);

        let result = run(&store, login("alice@example.com", "Secret123!")).await;

        assert!(result.is_successful);
        let response = result.data.unwrap();
        assert!(!response.token.is_empty());
        let stored = store.stored(&user.id).unwrap();
        assert_eq!(stored.credentials.refresh_token, Some(response.refresh_token));
        assert_eq!(stored.credentials.refresh_token_expires, Some(response.refresh_token_expires));
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic_client_failure() {
        let store = FakeUserStore::with_user(alice(), Vec::new());

        let result = run(&store, login("alice", "nope")).await;

        assert!(result.is_failure_of(FailureKind::Client));
        assert_eq!(
            result.error_messages,
            vec!["Invalid username/email or password.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_locked_user_gets_minutes_rounded_up() {
        let mut user = alice();
        user.credentials.lockout_end = Some(Utc::now() + Duration::seconds(4 * 60 + 30));
        let store = FakeUserStore::with_user(user, Vec::new());

        let result = run(&store, login("alice", "Secret123!")).await;

        assert!(result.is_failure_of(FailureKind::Client));
        assert_eq!(
            result.error_messages,
            vec!["Your account is locked for 5 minutes due to 3 failed login attempts.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_third_failure_reports_lockout() {
        let store = FakeUserStore::with_user(alice(), Vec::new());

        run(&store, login("alice", "bad")).await;
        run(&store, login("alice", "bad")).await;
        let third = run(&store, login("alice", "bad")).await;

        assert!(third.is_failure_of(FailureKind::Client));
        assert_eq!(
            third.error_messages,
            vec!["Your account is locked for 5 minutes due to 3 failed login attempts.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_short_identifier_fails_validation() {
        let store = FakeUserStore::default();
        let policy = LockoutPolicy::default();
        let options = options();
        let tokens = JwtProvider::new(&store, &options);
        let handler = LoginHandler::new(&store, SignInManager::new(&store, &policy), &tokens);

        let err = Pipeline::new().send(&handler, login("al", "")).await.unwrap_err();

        let fields: Vec<_> = err.errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["email_or_username", "password"]);
    }

    #[tokio::test]
    async fn test_lockout_ending_right_after_check_reports_one_minute() {
        let now = Utc::now();
        let mut user = alice();
        user.credentials.lockout_end = Some(now + Duration::milliseconds(1));
        let store = FakeUserStore::with_user(user, Vec::new());
        let policy = LockoutPolicy::default();
        let options = options();
        let tokens = JwtProvider::new(&store, &options);
        let handler = LoginHandler::new(&store, SignInManager::new(&store, &policy), &tokens);

        let result = handler
            .handle_at(login("alice", "Secret123!"), now)
            .await
            .unwrap();

        assert_eq!(
            result.error_messages,
            vec!["Your account is locked for 1 minutes due to 3 failed login attempts.".to_string()]
        );
    }

    #[test]
    fn test_remaining_minutes_rounds_up() {
        let now = Utc::now();
        assert_eq!(remaining_minutes(now + Duration::seconds(90), now), 2);
        assert_eq!(remaining_minutes(now + Duration::seconds(60), now), 1);
        assert_eq!(remaining_minutes(now + Duration::seconds(1), now), 1);
        assert_eq!(remaining_minutes(now - Duration::seconds(5), now), 0);
    }
}
