use std::env;
use std::path::PathBuf;

use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_dir: Option<PathBuf>,
    pub log_level: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let config = Config {
            api_url: env::var("RENTAL_API_URL")
                .unwrap_or(DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            session_dir: env::var("RENTAL_SESSION_DIR").ok().map(PathBuf::from),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or("info".to_string())
                .to_string(),
            environment: env::var("APP_ENV")
                .unwrap_or("development".to_string())
                .to_string(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_url.is_empty() {
            return Err(anyhow::anyhow!("RENTAL_API_URL is empty"));
        }

        let url = Url::parse(&self.api_url)
            .map_err(|e| anyhow::anyhow!("RENTAL_API_URL is not a valid url: {}", e))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(anyhow::anyhow!(
                    "RENTAL_API_URL must use http or https, got '{}'",
                    other
                ))
            }
        }

        if self.is_production() && url.scheme() != "https" {
            return Err(anyhow::anyhow!("RENTAL_API_URL must use https in production"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_dir: None,
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}
