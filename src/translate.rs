//! Quote translation with a store-backed cache.

use tracing::{debug, warn};

use crate::constants::store::TRANSLATION_PREFIX;
use crate::constants::translate::SOURCE_LANGUAGE;
use crate::errors::QuoteError;
use crate::store::StoreAdapter;
use crate::types::StoreKey;

#[cfg(feature = "http")]
pub use http::MyMemoryTranslator;

/// Translates English text into a target language.
pub trait Translator: Send + Sync {
    /// Translate `text` into `target`.
    fn translate(&self, text: &str, target: &str) -> Result<String, QuoteError>;
}

/// Cache key for a translation of `text` into `lang`.
pub fn translation_key(text: &str, lang: &str) -> StoreKey {
    format!("{TRANSLATION_PREFIX}{text}_{lang}")
}

/// Cache-first wrapper around a `Translator`.
///
/// Never fails: any translator error yields the original text.
pub struct TranslationCache {
    translator: Box<dyn Translator>,
    store: StoreAdapter,
}

impl TranslationCache {
    pub fn new(translator: Box<dyn Translator>, store: StoreAdapter) -> Self {
        Self { translator, store }
    }

    /// Translate `text` into `lang`, consulting the cache first.
    pub fn translate(&self, text: &str, lang: &str) -> String {
        if lang == SOURCE_LANGUAGE || text.is_empty() {
            return text.to_string();
        }
        let key = translation_key(text, lang);
        if let Some(cached) = self.store.get(&key) {
            return cached;
        }
        match self.translator.translate(text, lang) {
            Ok(translated) => {
                if !self.store.set(&key, &translated) {
                    let evicted = self.evict_oldest_half();
                    debug!(
                        "[quote_galaxy:translate] cache full, evicted {} translations",
                        evicted
                    );
                }
                translated
            }
            Err(err) => {
                warn!(
                    "[quote_galaxy:translate] translation to '{}' failed: {}",
                    lang, err
                );
                text.to_string()
            }
        }
    }

    /// Remove the oldest half of cached translations. Returns the number removed.
    pub fn evict_oldest_half(&self) -> usize {
        let keys = self.store.keys_with_prefix(TRANSLATION_PREFIX);
        let cutoff = keys.len() / 2;
        keys.iter()
            .take(cutoff)
            .filter(|key| self.store.remove(key))
            .count()
    }
}

#[cfg(feature = "http")]
mod http {
    use serde::Deserialize;
    use tracing::debug;

    use crate::config::TranslateConfig;
    use crate::constants::translate::{SOURCE_LANGUAGE, SUCCESS_STATUS};
    use crate::errors::QuoteError;

    use super::Translator;

    const SERVICE_ID: &str = "mymemory";

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct TranslateResponse {
        #[serde(default)]
        response_status: serde_json::Value,
        response_data: Option<ResponseData>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ResponseData {
        #[serde(default)]
        translated_text: Option<String>,
    }

    /// `Translator` backed by the MyMemory public API.
    pub struct MyMemoryTranslator {
        config: TranslateConfig,
    }

    impl Default for MyMemoryTranslator {
        fn default() -> Self {
            Self::new(TranslateConfig::default())
        }
    }

    impl MyMemoryTranslator {
        pub fn new(config: TranslateConfig) -> Self {
            Self { config }
        }

        fn error(reason: String) -> QuoteError {
            QuoteError::Network {
                source_id: SERVICE_ID.to_string(),
                reason,
            }
        }
    }

    impl Translator for MyMemoryTranslator {
        fn translate(&self, text: &str, target: &str) -> Result<String, QuoteError> {
            let langpair = format!("{SOURCE_LANGUAGE}|{target}");
            debug!("[quote_galaxy:translate] requesting {}", langpair);
            let response = ureq::get(&self.config.endpoint)
                .query("q", text)
                .query("langpair", &langpair)
                .call()
                .map_err(|err| Self::error(format!("failed querying translation endpoint: {err}")))?;
            let body = response
                .into_body()
                .read_to_string()
                .map_err(|err| Self::error(format!("failed reading translation body: {err}")))?;
            let parsed: TranslateResponse = serde_json::from_str(&body)
                .map_err(|err| Self::error(format!("malformed translation payload: {err}")))?;
            // The API reports the status as a number or a numeric string.
            let status = match &parsed.response_status {
                serde_json::Value::Number(value) => value.as_i64(),
                serde_json::Value::String(value) => value.parse().ok(),
                _ => None,
            };
            if status != Some(SUCCESS_STATUS) {
                return Err(Self::error(format!(
                    "translation service reported status {}",
                    parsed.response_status
                )));
            }
            parsed
                .response_data
                .and_then(|data| data.translated_text)
                .filter(|translated| !translated.is_empty())
                .ok_or_else(|| Self::error("translation missing from response".into()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::{Read, Write};
        use std::net::TcpListener;
        use std::thread;

        fn spawn_one_shot_http(payload: &'static str) -> (String, thread::JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            let handle = thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut request_buf = [0u8; 2048];
                let read = stream.read(&mut request_buf).unwrap_or(0);
                let headers = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    payload.len()
                );
                stream.write_all(headers.as_bytes()).unwrap();
                stream.write_all(payload.as_bytes()).unwrap();
                let _ = stream.flush();
                String::from_utf8_lossy(&request_buf[..read]).into_owned()
            });
            (format!("http://{addr}/get"), handle)
        }

        #[test]
        fn returns_translated_text_on_success() {
            let (endpoint, server) = spawn_one_shot_http(
                r#"{"responseStatus":200,"responseData":{"translatedText":"Hola mundo"}}"#,
            );
            let translator = MyMemoryTranslator::new(TranslateConfig { endpoint });
            let translated = translator.translate("Hello world", "es").unwrap();
            let request = server.join().unwrap();
            assert_eq!(translated, "Hola mundo");
            assert!(request.contains("langpair=en%7Ces") || request.contains("langpair=en|es"));
        }

        #[test]
        fn non_success_status_is_an_error() {
            let (endpoint, server) = spawn_one_shot_http(
                r#"{"responseStatus":"429","responseData":{"translatedText":"QUOTA EXCEEDED"}}"#,
            );
            let translator = MyMemoryTranslator::new(TranslateConfig { endpoint });
            let err = translator.translate("Hello", "fr").unwrap_err();
            server.join().unwrap();
            assert!(err.is_network());
        }
    }
}
