use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external catalog service.
    pub catalog_base_url: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    /// What a repeat grant does to the stored quantity: "accumulate" or
    /// "overwrite". Parsed at wiring time.
    pub grant_policy: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            catalog_base_url: required_env("CATALOG_SERVICE_URL"),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            grant_policy: env::var("GRANT_POLICY").unwrap_or_else(|_| "accumulate".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
