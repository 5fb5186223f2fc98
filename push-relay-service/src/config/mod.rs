/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listening port (PORT, default 3000)
    pub port: u16,
    /// JSON-encoded Firebase service account blob (FIREBASE_SERVICE_ACCOUNT).
    /// Absent or unparseable credentials put the relay in degraded mode.
    pub service_account: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            service_account: std::env::var("FIREBASE_SERVICE_ACCOUNT")
                .ok()
                .filter(|blob| !blob.trim().is_empty()),
        }
    }
}
