use std::num::NonZeroUsize;

use serde::Deserialize;
use url::Url;

fn default_base_url() -> Url {
    Url::parse("https://thesimpsonsapi.com/api/").expect("constant URL")
}

fn default_page_size() -> NonZeroUsize {
    NonZeroUsize::new(20).unwrap_or(NonZeroUsize::MIN)
}

fn default_timeout_secs() -> u64 {
    30
}

/// Client configuration, loaded from YAML or defaulted.
#[derive(Deserialize, Clone)]
pub struct Config {
    /// API base; resource paths are joined onto it, so it must end in `/`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Client-side display page size, independent of the server page size.
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,
    /// The remote API offers no SLA; a hung request would otherwise stall the
    /// loading state forever.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.cannot_be_a_base() {
            return Err(format!("base_url {} cannot be a base", self.base_url));
        }
        if !self.base_url.path().ends_with('/') {
            return Err(format!(
                "base_url {} must end with a trailing slash",
                self.base_url
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be positive".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn default_page_size_is_twenty() {
        assert_eq!(Config::default().page_size.get(), 20);
    }

    #[test]
    fn base_url_without_trailing_slash_is_rejected() {
        let config = Config {
            base_url: "https://thesimpsonsapi.com/api".parse().unwrap(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
