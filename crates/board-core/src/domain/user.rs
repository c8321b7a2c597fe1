use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// User entity - represents a user in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    /// Net voting activity: upvotes cast minus downvotes cast.
    pub points: i32,
    pub failed_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, name: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            role,
            points: 0,
            failed_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Count a failed login. Returns the lock expiry if this attempt locked the account.
    pub fn record_failed_login(
        &mut self,
        now: DateTime<Utc>,
        policy: &LockoutPolicy,
    ) -> Option<DateTime<Utc>> {
        self.failed_attempts += 1;
        self.updated_at = now;

        if self.failed_attempts >= policy.max_attempts {
            let until = now + policy.lock_duration;
            self.locked_until = Some(until);
            Some(until)
        } else {
            None
        }
    }

    pub fn record_successful_login(&mut self, now: DateTime<Utc>) {
        self.failed_attempts = 0;
        self.locked_until = None;
        self.updated_at = now;
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// Brute-force protection for logins.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    pub max_attempts: i32,
    pub lock_duration: TimeDelta,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lock_duration: TimeDelta::minutes(5),
        }
    }
}

/// The authenticated caller on whose behalf a board operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "student@example.com".into(),
            "Student".into(),
            "hash".into(),
            Role::User,
        )
    }

    #[test]
    fn test_lock_after_max_attempts() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let mut user = user();

        assert_eq!(user.record_failed_login(now, &policy), None);
        assert_eq!(user.record_failed_login(now, &policy), None);
        let until = user.record_failed_login(now, &policy).unwrap();

        assert_eq!(until, now + TimeDelta::minutes(5));
        assert!(user.is_locked(now));
        assert!(!user.is_locked(until + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_successful_login_resets_lockout() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let mut user = user();
        for _ in 0..3 {
            user.record_failed_login(now, &policy);
        }

        user.record_successful_login(now);

        assert_eq!(user.failed_attempts, 0);
        assert!(user.locked_until.is_none());
    }

    #[test]
    fn test_require_admin() {
        let id = Uuid::new_v4();
        assert!(Actor::new(id, Role::Admin).require_admin().is_ok());
        assert!(matches!(
            Actor::new(id, Role::User).require_admin(),
            Err(DomainError::Forbidden)
        ));
    }
}
