//! User preference models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Storage keys, one row each in the preferences table.
pub mod keys {
    pub const LANGUAGE: &str = "language";
    pub const FONT_STYLE: &str = "fontStyle";
    pub const THEME: &str = "theme";
    pub const BACKGROUND_TYPE: &str = "backgroundType";
    pub const BACKGROUND_VALUE: &str = "backgroundValue";
    pub const VOICE: &str = "voice";
    pub const ELEVEN_LABS_VOICE_ID: &str = "elevenLabsVoiceId";
    pub const SHOW_DATE_TIME: &str = "showDateTime";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Serif => "serif",
            FontStyle::SansSerif => "sans-serif",
            FontStyle::Monospace => "monospace",
            FontStyle::Cursive => "cursive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "serif" => Some(FontStyle::Serif),
            "sans-serif" => Some(FontStyle::SansSerif),
            "monospace" => Some(FontStyle::Monospace),
            "cursive" => Some(FontStyle::Cursive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Minimal,
    Full,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Minimal => "minimal",
            Theme::Full => "full",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "minimal" => Some(Theme::Minimal),
            "full" => Some(Theme::Full),
            _ => None,
        }
    }
}

/// Kind of custom background. `None` means "use the rotating photo".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Gradient,
    Image,
    #[default]
    #[serde(rename = "")]
    None,
}

impl BackgroundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundKind::Color => "color",
            BackgroundKind::Gradient => "gradient",
            BackgroundKind::Image => "image",
            BackgroundKind::None => "",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "color" => Some(BackgroundKind::Color),
            "gradient" => Some(BackgroundKind::Gradient),
            "image" => Some(BackgroundKind::Image),
            "" => Some(BackgroundKind::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub value: String,
}

/// All user-facing settings of the new-tab page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub language: String,
    pub font_style: FontStyle,
    pub theme: Theme,
    pub background: Background,
    pub voice: String,
    pub eleven_labs_voice_id: String,
    pub show_date_time: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            font_style: FontStyle::Serif,
            theme: Theme::Full,
            background: Background::default(),
            voice: String::new(),
            eleven_labs_voice_id: String::new(),
            show_date_time: true,
        }
    }
}

impl Preferences {
    /// Rebuild from stored strings. Unknown or unparsable values fall back
    /// to their defaults so a bad row never breaks the settings panel.
    pub fn from_stored(stored: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| stored.get(key).map(String::as_str);

        let background = match get(keys::BACKGROUND_TYPE).and_then(BackgroundKind::parse) {
            Some(kind) if kind != BackgroundKind::None => Background {
                kind,
                value: get(keys::BACKGROUND_VALUE).unwrap_or_default().to_string(),
            },
            _ => Background::default(),
        };

        Self {
            language: get(keys::LANGUAGE)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .unwrap_or(defaults.language),
            font_style: get(keys::FONT_STYLE)
                .and_then(FontStyle::parse)
                .unwrap_or(defaults.font_style),
            theme: get(keys::THEME).and_then(Theme::parse).unwrap_or(defaults.theme),
            background,
            voice: get(keys::VOICE).map(String::from).unwrap_or(defaults.voice),
            eleven_labs_voice_id: get(keys::ELEVEN_LABS_VOICE_ID)
                .map(String::from)
                .unwrap_or(defaults.eleven_labs_voice_id),
            show_date_time: get(keys::SHOW_DATE_TIME)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.show_date_time),
        }
    }
}

/// Request body for updating preferences. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub font_style: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub background: Option<UpdateBackground>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub eleven_labs_voice_id: Option<String>,
    #[serde(default)]
    pub show_date_time: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBackground {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}
