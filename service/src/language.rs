use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A target language the engine can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    Chinese,
    Korean,
}

/// Error for a language code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: {0}. Supported: es, zh, ko")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub const ALL: [Language; 3] = [Language::Spanish, Language::Chinese, Language::Korean];

    /// Looks up a client language code. Accepts `es`, `zh`, `zh-cn` and `ko`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "es" => Some(Self::Spanish),
            "zh" | "zh-cn" => Some(Self::Chinese),
            "ko" => Some(Self::Korean),
            _ => None,
        }
    }

    /// Returns the code the engine expects.
    pub fn engine_code(self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::Chinese => "zh-cn",
            Self::Korean => "ko",
        }
    }

    /// Returns the public code clients use.
    pub fn public_code(self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::Chinese => "zh",
            Self::Korean => "ko",
        }
    }

    /// Engine codes of every supported language.
    pub fn engine_codes() -> Vec<String> {
        Self::ALL.iter().map(|l| l.engine_code().to_string()).collect()
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.public_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_mapping() {
        assert_eq!("es".parse::<Language>().unwrap().engine_code(), "es");
        assert_eq!("zh".parse::<Language>().unwrap().engine_code(), "zh-cn");
        assert_eq!("zh-cn".parse::<Language>().unwrap().engine_code(), "zh-cn");
        assert_eq!("ko".parse::<Language>().unwrap().engine_code(), "ko");
    }

    #[test]
    fn unsupported_codes() {
        for code in ["fr", "en", "", "ES", "zh-tw", " es"] {
            let err = code.parse::<Language>().unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Unsupported language: {code}. Supported: es, zh, ko")
            );
        }
    }

    #[test]
    fn public_codes_list_matches_message() {
        let codes: Vec<&str> = Language::ALL.iter().map(|l| l.public_code()).collect();
        assert_eq!(codes.join(", "), "es, zh, ko");
        assert_eq!(Language::Chinese.to_string(), "zh");
    }

    #[test]
    fn engine_codes() {
        assert_eq!(Language::engine_codes(), vec!["es", "zh-cn", "ko"]);
    }
}
