//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use chrono::TimeDelta;

use board_core::BoardPolicy;
use board_core::domain::{LockoutPolicy, ReportPolicy};
use board_infra::JwtConfig;
use board_infra::database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use board_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the board on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub policy: BoardPolicy,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    pub environment: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let mut db = DatabaseConfig::new(url);
                db.max_connections =
                    parsed(&lookup, "DB_MAX_CONNECTIONS").unwrap_or(db.max_connections);
                db.min_connections =
                    parsed(&lookup, "DB_MIN_CONNECTIONS").unwrap_or(db.min_connections);
                db
            });

        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").unwrap_or(jwt_defaults.secret),
            expiration_hours: parsed(&lookup, "JWT_EXPIRATION_HOURS")
                .unwrap_or(jwt_defaults.expiration_hours),
            issuer: lookup("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        let lockout_defaults = LockoutPolicy::default();
        let policy = BoardPolicy {
            reports: ReportPolicy::new(
                parsed(&lookup, "REPORT_THRESHOLD").unwrap_or(ReportPolicy::DEFAULT_THRESHOLD),
            ),
            lockout: LockoutPolicy {
                max_attempts: parsed::<i32, _>(&lookup, "LOCKOUT_MAX_ATTEMPTS")
                    .unwrap_or(lockout_defaults.max_attempts)
                    .max(1),
                lock_duration: lock_duration(&lookup).unwrap_or(lockout_defaults.lock_duration),
            },
        };

        #[cfg(feature = "rate-limit")]
        let rate_limit = {
            let defaults = RateLimitConfig::default();
            RateLimitConfig {
                max_requests: parsed(&lookup, "RATE_LIMIT_MAX_REQUESTS")
                    .unwrap_or(defaults.max_requests),
                window: parsed(&lookup, "RATE_LIMIT_WINDOW_SECS")
                    .map(std::time::Duration::from_secs)
                    .unwrap_or(defaults.window),
            }
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(8080),
            database,
            jwt,
            policy,
            #[cfg(feature = "rate-limit")]
            rate_limit,
            environment: lookup("RUST_ENV").unwrap_or_else(|| "development".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

/// Lockout length in minutes, at least one minute.
fn lock_duration<L>(lookup: &L) -> Option<TimeDelta>
where
    L: Fn(&str) -> Option<String>,
{
    let minutes: i64 = parsed(lookup, "LOCKOUT_MINUTES")?;
    if minutes < 1 {
        tracing::warn!(minutes, "LOCKOUT_MINUTES must be at least 1, using 1");
    }

    let duration = TimeDelta::try_minutes(minutes.max(1));
    if duration.is_none() {
        tracing::warn!(minutes, "LOCKOUT_MINUTES is out of range, using the default");
    }
    duration
}

fn parsed<T, L>(lookup: &L, key: &str) -> Option<T>
where
    T: FromStr,
    L: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert_eq!(config.policy.reports.threshold, 3);
        assert_eq!(config.policy.lockout.max_attempts, 3);
        assert_eq!(config.policy.lockout.lock_duration, TimeDelta::minutes(5));
        assert!(config.jwt.uses_default_secret());
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/board"),
            ("DB_MAX_CONNECTIONS", "50"),
            ("REPORT_THRESHOLD", "5"),
            ("LOCKOUT_MINUTES", "15"),
            ("JWT_SECRET", "s3cret"),
            ("RUST_ENV", "production"),
        ]);

        assert_eq!(config.port, 9000);
        let db = config.database.as_ref().unwrap();
        assert_eq!(db.url, "postgres://localhost/board");
        assert_eq!(db.max_connections, 50);
        assert_eq!(config.policy.reports.threshold, 5);
        assert_eq!(config.policy.lockout.lock_duration, TimeDelta::minutes(15));
        assert!(!config.jwt.uses_default_secret());
        assert!(config.is_production());
    }

    #[test]
    fn test_lockout_minutes_are_bounded() {
        let negative = config(&[("LOCKOUT_MINUTES", "-5")]);
        assert_eq!(negative.policy.lockout.lock_duration, TimeDelta::minutes(1));

        let huge = config(&[("LOCKOUT_MINUTES", "9223372036854775807")]);
        assert_eq!(huge.policy.lockout.lock_duration, TimeDelta::minutes(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[("PORT", "eighty"), ("REPORT_THRESHOLD", "0")]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.policy.reports.threshold, 1);
    }
}
