use chrono::Utc;
use uuid::Uuid;

use super::BoardService;
use crate::domain::{Actor, Role, User};
use crate::error::{DomainError, RepoError};
use crate::ports::PasswordService;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const TEMPORARY_PASSWORD_LEN: usize = 10;
const MAX_NAME_LEN: usize = 120;

impl BoardService {
    /// Self-service registration. New accounts always get the `user` role.
    pub async fn register(
        &self,
        email: &str,
        name: Option<&str>,
        password: &str,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        self.create_user(email, name, password, Role::User, passwords)
            .await
    }

    /// Create an account on behalf of an admin.
    ///
    /// Returns the new user and its generated temporary password.
    pub async fn create_account(
        &self,
        actor: &Actor,
        email: &str,
        name: Option<&str>,
        role: Role,
        passwords: &dyn PasswordService,
    ) -> Result<(User, String), DomainError> {
        actor.require_admin()?;

        let temporary = passwords.generate_temporary(TEMPORARY_PASSWORD_LEN);
        let user = self
            .create_user(email, name, &temporary, role, passwords)
            .await?;

        tracing::info!(user_id = %user.id, role = %role, admin_id = %actor.user_id, "Account created");
        Ok((user, temporary))
    }

    /// Check credentials, enforcing the lockout policy.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        let email = normalize_email(email);
        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let now = Utc::now();
        if let Some(until) = user.locked_until.filter(|until| *until > now) {
            return Err(DomainError::AccountLocked { until });
        }

        let valid = passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            let locked = user.record_failed_login(now, &self.policy.lockout);
            self.users
                .record_login(user.id, user.failed_attempts, user.locked_until, now)
                .await?;

            tracing::warn!(user_id = %user.id, attempts = user.failed_attempts, "Failed login");
            return Err(match locked {
                Some(until) => DomainError::AccountLocked { until },
                None => DomainError::Unauthorized,
            });
        }

        if user.failed_attempts > 0 || user.locked_until.is_some() {
            user.record_successful_login(now);
            self.users
                .record_login(user.id, user.failed_attempts, user.locked_until, now)
                .await?;
        }

        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password: &str,
        role: Role,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => email.split('@').next().unwrap_or_default().to_string(),
        };
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "Name must be at most {MAX_NAME_LEN} characters"
            )));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".into()));
        }

        let password_hash = passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        self.users
            .save(User::new(email, name, password_hash, role))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => DomainError::Duplicate("Email already registered".into()),
                other => other.into(),
            })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
