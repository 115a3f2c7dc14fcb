use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display language of a session. Traditional Chinese is the primary one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::ZhTw, Language::En];

    pub fn code(&self) -> &'static str {
        match self {
            Language::ZhTw => "zh-TW",
            Language::En => "en",
        }
    }

    /// Accepts the canonical code plus a few loose spellings (`zh`, `tw`, `EN`).
    pub fn from_code(code: &str) -> AppResult<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "zh-tw" | "zh_tw" | "zh" | "tw" => Ok(Language::ZhTw),
            "en" | "en-us" | "en_us" => Ok(Language::En),
            _ => Err(AppError::InvalidLanguage(code.to_string())),
        }
    }

    /// Name shown in the language toggle.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::ZhTw => "中文",
            Language::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
