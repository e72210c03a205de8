use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Language, TranslateError, Translation, TranslationProvider};

pub const NAME: &str = "Yandex";

const ENDPOINT: &str = "https://translate.yandex.net/api/v1.5/tr.json/translate";

const LIMIT: usize = 9800;

const LANGUAGES: &[Language] = &[
    Language { code: "be", name: "Belarusian" },
    Language { code: "cs", name: "Czech" },
    Language { code: "de", name: "German" },
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "it", name: "Italian" },
    Language { code: "pl", name: "Polish" },
    Language { code: "ru", name: "Russian" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "uk", name: "Ukrainian" },
];

/// Directions the service actually serves. Anything else comes back from
/// upstream as code 501, so it is cheaper to not offer it at all.
const DIRECTIONS: &[(&str, &[&str])] = &[
    ("be", &["ru"]),
    ("cs", &["en", "ru"]),
    ("de", &["en", "fr", "ru"]),
    ("en", &["cs", "de", "es", "fr", "it", "pl", "ru", "tr", "uk"]),
    ("es", &["en", "ru"]),
    ("fr", &["de", "en", "ru"]),
    ("it", &["en", "ru"]),
    ("pl", &["en", "ru"]),
    ("ru", &["be", "cs", "de", "en", "es", "fr", "it", "pl", "tr", "uk"]),
    ("tr", &["en", "ru"]),
    ("uk", &["en", "ru"]),
];

#[derive(Deserialize)]
struct ApiResponse {
    code: u16,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    text: Vec<String>,
}

pub struct YandexTranslate {
    client: reqwest::Client,
    api_key: String,
    timeout: Duration,
}

impl YandexTranslate {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl TranslationProvider for YandexTranslate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn limit(&self) -> usize {
        LIMIT
    }

    fn languages(&self) -> &'static [Language] {
        LANGUAGES
    }

    fn pairs(&self, source: &str) -> Vec<Language> {
        let Some((_, targets)) = DIRECTIONS.iter().find(|(code, _)| *code == source) else {
            return Vec::new();
        };

        LANGUAGES
            .iter()
            .copied()
            .filter(|l| targets.contains(&l.code))
            .collect()
    }

    fn default_source(&self) -> &'static str {
        "en"
    }

    fn default_target(&self) -> &'static str {
        "ru"
    }

    async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<Translation, TranslateError> {
        self.validate_input(text)?;

        if self.api_key.is_empty() {
            return Err(TranslateError::Authentication);
        }

        let lang = format!("{source}-{target}");
        let params = [
            ("key", self.api_key.as_str()),
            ("lang", lang.as_str()),
            ("text", text),
        ];

        let response = self
            .client
            .post(ENDPOINT)
            .form(&params)
            .timeout(self.timeout)
            .send()
            .await?;

        // Errors arrive as JSON bodies with their own code field; only
        // fall back to the HTTP status when there is no such body.
        let status = response.status();
        let body: ApiResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(TranslateError::Http {
                    provider: NAME,
                    status: status.as_u16(),
                });
            }
            Err(e) => return Err(TranslateError::MalformedResponse(e.to_string())),
        };

        match body.code {
            200 => {}
            401 | 402 => return Err(TranslateError::Authentication),
            404 => return Err(TranslateError::RateLimitExceeded),
            413 => {
                return Err(TranslateError::TooLong {
                    len: text.chars().count(),
                    limit: LIMIT,
                });
            }
            501 => {
                return Err(TranslateError::UnsupportedPair {
                    from: source.to_string(),
                    to: target.to_string(),
                });
            }
            code => {
                let message = body.message.unwrap_or_else(|| format!("code {code}"));
                return Err(TranslateError::Api(message));
            }
        }

        let translated = body.text.join("\n");
        if translated.is_empty() {
            return Err(TranslateError::MalformedResponse(
                "empty text array".to_string(),
            ));
        }

        Ok(Translation {
            text: translated,
            from: source.to_string(),
            to: target.to_string(),
            provider: NAME,
            detected_source: None,
        })
    }
}
