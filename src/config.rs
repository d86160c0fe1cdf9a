use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

use crate::persistence::{
    load_json_or_default,
    save_json,
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const SESSION_FILE: &str = "auth_session.json";

const URL_VAR: &str = "SUPABASE_URL";
const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontLanguage {
    #[default]
    Spanish,
    Arabic,
}

impl FrontLanguage {
    pub fn label(&self) -> &'static str {
        match self {
            FrontLanguage::Spanish => "Español",
            FrontLanguage::Arabic => "Árabe",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FrontLanguage::Spanish => FrontLanguage::Arabic,
            FrontLanguage::Arabic => FrontLanguage::Spanish,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub front_language: FrontLanguage,
    pub show_diacritics: bool,
    pub dark_mode: bool,
    /// A font with Arabic glyphs; the bundled egui fonts have none.
    pub arabic_font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            front_language: FrontLanguage::Spanish,
            show_diacritics: true,
            dark_mode: false,
            arabic_font_path: None,
        }
    }
}

impl AppConfig {
    /// Settings file from the data dir, with connection details overridable from the environment.
    pub fn load() -> Self {
        let mut config = load_json_or_default::<AppConfig>(SETTINGS_FILE);
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.supabase_url = url;
        }
        if let Some(key) = lookup(ANON_KEY_VAR).filter(|v| !v.trim().is_empty()) {
            self.supabase_anon_key = key;
        }
    }

    /// Persists the UI preferences only, so environment overrides never end up on disk.
    pub fn save_preferences(&self) {
        let mut stored = load_json_or_default::<AppConfig>(SETTINGS_FILE);
        stored.front_language = self.front_language;
        stored.show_diacritics = self.show_diacritics;
        stored.dark_mode = self.dark_mode;

        if let Err(e) = save_json(&stored, SETTINGS_FILE) {
            log::warn!("Failed to save settings: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"supabase_url": "https://demo.supabase.co"}"#).unwrap();

        assert_eq!(config.supabase_url, "https://demo.supabase.co");
        assert_eq!(config.front_language, FrontLanguage::Spanish);
        assert!(config.show_diacritics);
        assert!(config.arabic_font_path.is_none());
    }

    #[test]
    fn test_front_language_serialized_lowercase() {
        let config = AppConfig { front_language: FrontLanguage::Arabic, ..AppConfig::default() };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""front_language":"arabic""#));
        assert_eq!(FrontLanguage::Arabic.toggled(), FrontLanguage::Spanish);
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let env: HashMap<&str, &str> =
            HashMap::from([(URL_VAR, "https://env.supabase.co"), (ANON_KEY_VAR, "  ")]);

        let mut config = AppConfig {
            supabase_url: "https://file.supabase.co".into(),
            supabase_anon_key: "file-key".into(),
            ..AppConfig::default()
        };
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.supabase_url, "https://env.supabase.co");
        // Blank variables do not clobber the file.
        assert_eq!(config.supabase_anon_key, "file-key");
    }
}
