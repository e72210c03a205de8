use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Language, TranslateError, Translation, TranslationProvider};

pub const NAME: &str = "LibreTranslate";

const LIMIT: usize = 5000;

const LANGUAGES: &[Language] = &[
    Language { code: "auto", name: "Detect language" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "cs", name: "Czech" },
    Language { code: "da", name: "Danish" },
    Language { code: "de", name: "German" },
    Language { code: "el", name: "Greek" },
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fa", name: "Persian" },
    Language { code: "fi", name: "Finnish" },
    Language { code: "fr", name: "French" },
    Language { code: "ga", name: "Irish" },
    Language { code: "he", name: "Hebrew" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "hu", name: "Hungarian" },
    Language { code: "id", name: "Indonesian" },
    Language { code: "it", name: "Italian" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "pl", name: "Polish" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "ru", name: "Russian" },
    Language { code: "sk", name: "Slovak" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "uk", name: "Ukrainian" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "zh", name: "Chinese" },
];

#[derive(Serialize)]
struct ApiRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    api_key: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

/// Self-hostable backend; the endpoint is configurable so a local
/// instance works the same as the public one.
pub struct LibreTranslate {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl LibreTranslate {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn limit(&self) -> usize {
        LIMIT
    }

    fn languages(&self) -> &'static [Language] {
        LANGUAGES
    }

    fn pairs(&self, _source: &str) -> Vec<Language> {
        LANGUAGES
            .iter()
            .copied()
            .filter(|l| l.code != "auto")
            .collect()
    }

    fn default_source(&self) -> &'static str {
        "auto"
    }

    fn default_target(&self) -> &'static str {
        "en"
    }

    async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<Translation, TranslateError> {
        self.validate_input(text)?;

        let request = ApiRequest {
            q: text,
            source,
            target,
            api_key: &self.api_key,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();

        if status == 403 {
            return Err(TranslateError::Authentication);
        }

        if status == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !status.is_success() {
            // The service reports its own failures as `{"error": "..."}`.
            if let Ok(body) = response.json::<ApiError>().await {
                return Err(TranslateError::Api(body.error));
            }
            return Err(TranslateError::Http {
                provider: NAME,
                status: status.as_u16(),
            });
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

        Ok(Translation {
            text: body.translated_text,
            from: source.to_string(),
            to: target.to_string(),
            provider: NAME,
            detected_source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_field_is_camel_case() {
        let body: ApiResponse =
            serde_json::from_str(r#"{"translatedText": "hola"}"#).unwrap();

        assert_eq!(body.translated_text, "hola");
    }

    #[test]
    fn empty_api_key_is_not_sent() {
        let request = ApiRequest {
            q: "hi",
            source: "en",
            target: "es",
            api_key: "",
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("api_key").is_none());

        let keyed = ApiRequest {
            api_key: "secret",
            ..request
        };
        let value = serde_json::to_value(&keyed).unwrap();
        assert_eq!(value["api_key"], "secret");
    }

    #[test]
    fn detection_entry_is_not_a_target() {
        let provider = LibreTranslate::new(
            "http://localhost:5000/translate".to_string(),
            String::new(),
            Duration::from_secs(5),
        );

        assert!(provider.pairs("auto").iter().all(|l| l.code != "auto"));
    }
}
