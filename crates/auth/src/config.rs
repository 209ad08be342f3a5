use crate::background::session_cleanup::DEFAULT_SWEEP_INTERVAL;
use crate::jwt::JwtConfig;
use crate::session::DEFAULT_MAX_SESSIONS_PER_USER;

/// Auth subsystem configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Maximum concurrent active sessions per user before LRU eviction.
    pub max_sessions_per_user: i64,
    /// Interval between expired-session cleanup sweeps, in seconds.
    pub sweep_interval_secs: u64,
    /// Redis URL for the session cache.
    pub redis_url: String,
}

impl AuthConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `MAX_SESSIONS_PER_USER`     | `5`                        |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `1800`                   |
    /// | `REDIS_URL`                 | `redis://127.0.0.1:6379`   |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but not parseable, or if `JWT_SECRET`
    /// is missing.
    pub fn from_env() -> Self {
        let max_sessions_per_user: i64 = std::env::var("MAX_SESSIONS_PER_USER")
            .unwrap_or_else(|_| DEFAULT_MAX_SESSIONS_PER_USER.to_string())
            .parse()
            .expect("MAX_SESSIONS_PER_USER must be a valid i64");

        let sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL.as_secs().to_string())
            .parse()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64");

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());

        Self {
            jwt: JwtConfig::from_env(),
            max_sessions_per_user,
            sweep_interval_secs,
            redis_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_falls_back_to_the_shared_defaults() {
        std::env::set_var("JWT_SECRET", "config-test-secret");
        std::env::remove_var("MAX_SESSIONS_PER_USER");
        std::env::remove_var("SESSION_SWEEP_INTERVAL_SECS");
        std::env::remove_var("REDIS_URL");

        let config = AuthConfig::from_env();
        assert_eq!(config.max_sessions_per_user, DEFAULT_MAX_SESSIONS_PER_USER);
        assert_eq!(config.sweep_interval_secs, DEFAULT_SWEEP_INTERVAL.as_secs());
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
    }
}
