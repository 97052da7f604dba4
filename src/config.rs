use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub viewers: ViewersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(alias = "apikey", rename = "api_key")]
    #[serde(default)]
    pub api_key: String,
    #[serde(alias = "baseurl", rename = "base_url")]
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(alias = "imagebaseurl", rename = "image_base_url")]
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Seconds a fetched query stays fresh. 0 disables caching.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewersConfig {
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl Default for ViewersConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

fn default_port() -> String {
    "8097".to_string()
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_idle_timeout() -> u64 {
    3600
}

pub const API_KEY_ENV: &str = "TMDB_API_KEY";

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let mut config = Self::from_yaml(path, &content)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.tmdb.api_key = key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tmdb.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("No api key configured (set tmdb.api_key or {})", API_KEY_ENV)]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("test.yaml", "tmdb:\n  api_key: abc\n").unwrap();
        assert_eq!(config.listen.port, "8097");
        assert!(config.listen.address.is_none());
        assert_eq!(config.tmdb.api_key, "abc");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.image_base_url, "https://image.tmdb.org/t/p");
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.viewers.idle_timeout_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "9000"
appdir: ./public
tmdb:
  apikey: xyz
  language: ko-KR
  timeout_secs: 10
cache:
  ttl_secs: 0
viewers:
  idle_timeout_secs: 60
"#;
        let config = Config::from_yaml("test.yaml", yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "9000");
        assert_eq!(config.appdir.as_deref(), Some("./public"));
        assert_eq!(config.tmdb.api_key, "xyz");
        assert_eq!(config.tmdb.language.as_deref(), Some("ko-KR"));
        assert_eq!(config.tmdb.timeout_secs, Some(10));
        assert_eq!(config.cache.ttl_secs, 0);
        assert_eq!(config.viewers.idle_timeout_secs, 60);
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::from_yaml("test.yaml", "listen:\n  port: \"1\"\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("bad.yaml", "tmdb: [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(..)));
    }
}
