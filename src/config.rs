use std::time::Duration;

/// Engine-wide configuration, read from environment variables with
/// sensible defaults.
///
/// Values are resolved once at startup via [`EngineConfig::from_env`];
/// [`EngineConfig::default`] supplies the fallbacks used both when an
/// env var is unset and in tests.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Address the HTTP/WebSocket server binds to.
    pub bind_addr: String,
    /// How long a player has to answer before their turn expires.
    pub turn_timeout: Duration,
    /// How often the background task scans for idle rooms.
    pub cleanup_interval: Duration,
    /// How long a `Waiting`/`Finished` room may sit idle before eviction.
    pub idle_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            turn_timeout: Duration::from_secs(30),
            cleanup_interval: Duration::from_secs(60),
            idle_grace: Duration::from_secs(5 * 60),
        }
    }
}

impl EngineConfig {
    /// Builds a config from environment variables, falling back to
    /// [`EngineConfig::default`] for any value that is unset or unparsable.
    ///
    /// Recognised variables:
    /// - `BIND_ADDR`
    /// - `TURN_TIMEOUT_SECS`
    /// - `CLEANUP_INTERVAL_SECS`
    /// - `IDLE_GRACE_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let turn_timeout = std::env::var("TURN_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.turn_timeout);

        let cleanup_interval = std::env::var("CLEANUP_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cleanup_interval);

        let idle_grace = std::env::var("IDLE_GRACE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.idle_grace);

        Self {
            bind_addr,
            turn_timeout,
            cleanup_interval,
            idle_grace,
        }
    }
}
