//! Sign-in manager - Verifica password con politica di blocco dell'account

use crate::entities::User;
use crate::repositories::UserStore;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    pub max_failed_attempts: i32,
    pub lockout_duration: Duration,
    pub require_confirmed_email: bool,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            lockout_duration: Duration::minutes(5),
            require_confirmed_email: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInResult {
    Succeeded,
    LockedOut,
    NotAllowed,
    Failed,
}

pub struct SignInManager<'a, S> {
    users: &'a S,
    policy: &'a LockoutPolicy,
}

impl<'a, S: UserStore> SignInManager<'a, S> {
    pub fn new(users: &'a S, policy: &'a LockoutPolicy) -> Self {
        Self { users, policy }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        self.policy
    }

    pub async fn check_password_sign_in(
        &self,
        user: &mut User,
        password: &str,
        lockout_on_failure: bool,
    ) -> Result<SignInResult, sqlx::Error> {
        self.check_password_sign_in_at(user, password, lockout_on_failure, Utc::now())
            .await
    }

    /// Checks are applied in order: confirmed email, active lockout, password.
    /// Any change to the credential state is persisted before returning.
    pub async fn check_password_sign_in_at(
        &self,
        user: &mut User,
        password: &str,
        lockout_on_failure: bool,
        now: DateTime<Utc>,
    ) -> Result<SignInResult, sqlx::Error> {
        if self.policy.require_confirmed_email && !user.credentials.email_confirmed {
            warn!("User {} cannot sign in without a confirmed email", user.username);
            return Ok(SignInResult::NotAllowed);
        }

        if user.is_locked_out(now) {
            debug!("User {} is locked out", user.username);
            return Ok(SignInResult::LockedOut);
        }

        if user.verify_password(password) {
            let credentials = &mut user.credentials;
            if credentials.access_failed_count != 0 || credentials.lockout_end.is_some() {
                credentials.access_failed_count = 0;
                credentials.lockout_end = None;
                self.users.update(user).await?;
            }
            return Ok(SignInResult::Succeeded);
        }

        if !lockout_on_failure {
            return Ok(SignInResult::Failed);
        }

        let credentials = &mut user.credentials;
        credentials.access_failed_count += 1;
        let locked = credentials.lockout_enabled
            && credentials.access_failed_count >= self.policy.max_failed_attempts;
        if locked {
            credentials.lockout_end = Some(now + self.policy.lockout_duration);
            credentials.access_failed_count = 0;
            info!(
                "User {} locked out after {} failed attempts",
                user.username, self.policy.max_failed_attempts
            );
        }
        self.users.update(user).await?;

        Ok(if locked {
            SignInResult::LockedOut
        } else {
            SignInResult::Failed
        })
    }
}
