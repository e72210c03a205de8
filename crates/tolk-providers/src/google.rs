use std::time::Duration;

use async_trait::async_trait;

use crate::{Language, TranslateError, Translation, TranslationProvider};

pub const NAME: &str = "Google";

/// Unofficial web endpoint. Keyless, but rate-limited per address and the
/// whole request travels in the query string, hence the short limit.
const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

const LIMIT: usize = 1400;

const LANGUAGES: &[Language] = &[
    Language { code: "auto", name: "Detect language" },
    Language { code: "af", name: "Afrikaans" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "be", name: "Belarusian" },
    Language { code: "bg", name: "Bulgarian" },
    Language { code: "bn", name: "Bengali" },
    Language { code: "ca", name: "Catalan" },
    Language { code: "cs", name: "Czech" },
    Language { code: "da", name: "Danish" },
    Language { code: "de", name: "German" },
    Language { code: "el", name: "Greek" },
    Language { code: "en", name: "English" },
    Language { code: "eo", name: "Esperanto" },
    Language { code: "es", name: "Spanish" },
    Language { code: "et", name: "Estonian" },
    Language { code: "fa", name: "Persian" },
    Language { code: "fi", name: "Finnish" },
    Language { code: "fr", name: "French" },
    Language { code: "ga", name: "Irish" },
    Language { code: "he", name: "Hebrew" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "hr", name: "Croatian" },
    Language { code: "hu", name: "Hungarian" },
    Language { code: "hy", name: "Armenian" },
    Language { code: "id", name: "Indonesian" },
    Language { code: "is", name: "Icelandic" },
    Language { code: "it", name: "Italian" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ka", name: "Georgian" },
    Language { code: "kk", name: "Kazakh" },
    Language { code: "ko", name: "Korean" },
    Language { code: "lt", name: "Lithuanian" },
    Language { code: "lv", name: "Latvian" },
    Language { code: "mk", name: "Macedonian" },
    Language { code: "ms", name: "Malay" },
    Language { code: "mt", name: "Maltese" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "no", name: "Norwegian" },
    Language { code: "pl", name: "Polish" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "ro", name: "Romanian" },
    Language { code: "ru", name: "Russian" },
    Language { code: "sk", name: "Slovak" },
    Language { code: "sl", name: "Slovenian" },
    Language { code: "sq", name: "Albanian" },
    Language { code: "sr", name: "Serbian" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "sw", name: "Swahili" },
    Language { code: "th", name: "Thai" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "uk", name: "Ukrainian" },
    Language { code: "ur", name: "Urdu" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "zh-CN", name: "Chinese (Simplified)" },
    Language { code: "zh-TW", name: "Chinese (Traditional)" },
];

pub struct GoogleTranslate {
    client: reqwest::Client,
    timeout: Duration,
}

impl GoogleTranslate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
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
        // Any language can be targeted, except the detection pseudo-entry.
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

        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .header("User-Agent", "Mozilla/5.0")
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::Http {
                provider: NAME,
                status: response.status().as_u16(),
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

        let (translated, detected_source) = parse_body(&json)?;

        Ok(Translation {
            text: translated,
            from: source.to_string(),
            to: target.to_string(),
            provider: NAME,
            detected_source,
        })
    }
}

/// The endpoint answers a bare JSON array: index 0 holds the translated
/// segments, index 2 the detected source language.
fn parse_body(json: &serde_json::Value) -> Result<(String, Option<String>), TranslateError> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::MalformedResponse("no segment array".to_string()))?;

    let mut text = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
            text.push_str(part);
        }
    }

    if text.is_empty() {
        return Err(TranslateError::MalformedResponse(
            "no translated segments".to_string(),
        ));
    }

    let detected = json.get(2).and_then(|v| v.as_str()).map(str::to_string);

    Ok((text, detected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_translated_segments() {
        let body = serde_json::json!([
            [["Hallo ", "Hello ", null, null], ["Welt", "world", null, null]],
            null,
            "en"
        ]);

        let (text, detected) = parse_body(&body).unwrap();
        assert_eq!(text, "Hallo Welt");
        assert_eq!(detected.as_deref(), Some("en"));
    }

    #[test]
    fn rejects_bodies_without_segments() {
        let body = serde_json::json!({ "error": "not an array" });

        assert!(matches!(
            parse_body(&body),
            Err(TranslateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn detection_entry_is_not_a_target() {
        let provider = GoogleTranslate::new(Duration::from_secs(5));

        assert!(!provider.pairs("auto").is_empty());
        assert!(provider.pairs("auto").iter().all(|l| l.code != "auto"));
    }

    #[tokio::test]
    async fn oversized_input_fails_before_any_request() {
        let provider = GoogleTranslate::new(Duration::from_secs(5));
        let text = "x".repeat(LIMIT + 1);

        let err = provider.translate("auto", "en", &text).await.unwrap_err();
        assert!(matches!(err, TranslateError::TooLong { .. }));
    }
}
