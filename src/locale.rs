//! Supported display languages and their status strings.

use std::fmt;
use std::str::FromStr;

use crate::constants::store::LANGUAGE_KEY;
use crate::errors::QuoteError;
use crate::store::StoreAdapter;

/// Environment variables consulted for the system locale, in priority order.
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Display language for status text and quote translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Spanish,
    French,
    German,
    Japanese,
    Chinese,
}

/// Localized status strings for one language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Messages {
    pub loading: &'static str,
    pub offline: &'static str,
    pub copied: &'static str,
    pub viewed: &'static str,
    pub translating: &'static str,
    pub variety: &'static str,
    pub no_quotes: &'static str,
}

const VARIETY: &str = "Showing all quotes for variety";
const NO_QUOTES: &str = "No quotes available. Check your connection.";

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Hindi,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Japanese,
        Language::Chinese,
    ];

    /// Two-letter code used for storage and the translation API.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
        }
    }

    /// Parse a code such as `fr`, `fr-FR`, or `fr_FR.UTF-8`.
    pub fn from_code(raw: &str) -> Option<Self> {
        let primary = raw
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == primary)
    }

    /// BCP 47 tag for speech output.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Hindi => "hi-IN",
            Language::Spanish => "es-ES",
            Language::French => "fr-FR",
            Language::German => "de-DE",
            Language::Japanese => "ja-JP",
            Language::Chinese => "zh-CN",
        }
    }

    pub fn messages(self) -> Messages {
        // Only the English UI carried the variety and empty-pool notices.
        let (loading, offline, copied, viewed, translating) = match self {
            Language::English => (
                "Loading...",
                "Offline mode",
                "Copied to clipboard!",
                "quotes viewed",
                "Translating...",
            ),
            Language::Hindi => (
                "लोड हो रहा है...",
                "ऑफ़लाइन मोड",
                "क्लिपबोर्ड पर कॉपी किया गया!",
                "उद्धरण देखे गए",
                "अनुवाद हो रहा है...",
            ),
            Language::Spanish => (
                "Cargando...",
                "Modo sin conexión",
                "¡Copiado al portapapeles!",
                "citas vistas",
                "Traduciendo...",
            ),
            Language::French => (
                "Chargement...",
                "Mode hors ligne",
                "Copié dans le presse-papiers!",
                "citations consultées",
                "Traduction...",
            ),
            Language::German => (
                "Laden...",
                "Offline-Modus",
                "In Zwischenablage kopiert!",
                "Zitate angesehen",
                "Übersetzen...",
            ),
            Language::Japanese => (
                "読み込み中...",
                "オフラインモード",
                "クリップボードにコピーしました！",
                "引用を見た",
                "翻訳中...",
            ),
            Language::Chinese => (
                "加载中...",
                "离线模式",
                "已复制到剪贴板！",
                "已查看引语",
                "翻译中...",
            ),
        };
        Messages {
            loading,
            offline,
            copied,
            viewed,
            translating,
            variety: VARIETY,
            no_quotes: NO_QUOTES,
        }
    }

    /// Status line such as `3 quotes viewed`.
    pub fn viewed_status(self, count: usize) -> String {
        format!("{count} {}", self.messages().viewed)
    }

    /// Resolve the display language.
    ///
    /// Saved preference wins, then the system locale, then English. An
    /// unsupported system locale resolves to English.
    pub fn detect(saved: Option<&str>, system_locale: Option<&str>) -> Self {
        if let Some(lang) = saved.and_then(Self::from_code) {
            return lang;
        }
        system_locale
            .and_then(Self::from_code)
            .unwrap_or_default()
    }

    /// `detect` against the store's saved preference and the process environment.
    ///
    /// The system locale is the first non-empty of `LC_ALL`, `LC_MESSAGES`,
    /// `LANG`, following POSIX precedence.
    pub fn detect_from(store: &StoreAdapter) -> Self {
        let saved = store.get(LANGUAGE_KEY);
        let system_locale =
            first_locale(LOCALE_ENV_VARS.iter().map(|name| std::env::var(name).ok()));
        Self::detect(saved.as_deref(), system_locale.as_deref())
    }

    /// Persist this language as the saved preference.
    pub fn save(self, store: &StoreAdapter) -> bool {
        store.set(LANGUAGE_KEY, self.code())
    }
}

/// First set, non-empty locale value in precedence order.
fn first_locale<I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    values.into_iter().flatten().find(|value| !value.is_empty())
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = QuoteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_code(raw)
            .ok_or_else(|| QuoteError::Configuration(format!("unsupported language '{raw}'")))
    }
}
