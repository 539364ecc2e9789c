use chrono::Duration;
use std::env;

/// A config of [`Context`].
#[derive(Clone, Debug)]
pub struct Config {
    /// 3600 seconds by default.
    pub access_token_expire_time: Duration,
    /// 10 seconds by default.
    pub metadata_timeout: std::time::Duration,
    /// 3000 by default.
    pub listen_port: u16,
}

impl Config {
    pub fn new() -> Self {
        let access_token_expire_time = Duration::seconds(
            env::var("JWT_ACCESS_TOKEN_EXPIRE_SECONDS")
                .ok()
                .and_then(|val| val.parse::<i64>().ok())
                .unwrap_or(3600),
        );

        let metadata_timeout = std::time::Duration::from_secs(
            env::var("METADATA_TIMEOUT_SECONDS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(10),
        );

        let listen_port = env::var("LISTEN_PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(3000);

        Self {
            access_token_expire_time,
            metadata_timeout,
            listen_port,
        }
    }
}
