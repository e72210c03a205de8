use std::env;

use serde::{Deserialize, Serialize};

fn default_libre_endpoint() -> String {
    "https://libretranslate.com/translate".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

/// Credentials and endpoints for the built-in backends. API keys are
/// read from the environment so they stay out of config files.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub yandex_api_key: String,
    #[serde(default = "default_libre_endpoint")]
    pub libre_endpoint: String,
    #[serde(default)]
    pub libre_api_key: String,
    /// Per-request timeout applied to every backend call.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl ProvidersConfig {
    pub fn new() -> Self {
        let yandex_api_key = env::var("YANDEX_API_KEY").unwrap_or_default();

        let libre_endpoint =
            env::var("LIBRETRANSLATE_URL").unwrap_or_else(|_| default_libre_endpoint());

        let libre_api_key = env::var("LIBRETRANSLATE_API_KEY").unwrap_or_default();

        Self {
            yandex_api_key,
            libre_endpoint,
            libre_api_key,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            yandex_api_key: String::new(),
            libre_endpoint: default_libre_endpoint(),
            libre_api_key: String::new(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}
