use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How long a recognition session may run before it is aborted.
pub const DEFAULT_SPEECH_TIMEOUT_MS: u64 = 15_000;

/// Default maximum fuzzy-match score for vocabulary correction.
pub const DEFAULT_VOCABULARY_THRESHOLD: f64 = 0.3;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// Input device name; `None` uses the platform default microphone.
    pub selected_microphone: Option<String>,
    /// BCP-47 tag passed to the recognizer. The deployed course catalog is
    /// Russian-first.
    pub recognition_language: Option<String>,
    /// Upper bound on one recognition session, in milliseconds.
    pub speech_timeout_ms: u64,
    /// Technical vocabulary applied to transcripts before scoring.
    pub custom_words: Vec<String>,
    /// Maximum fuzzy-match score accepted by vocabulary correction.
    pub custom_word_threshold: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            selected_microphone: None,
            recognition_language: Some("ru-RU".to_string()),
            speech_timeout_ms: DEFAULT_SPEECH_TIMEOUT_MS,
            custom_words: Vec::new(),
            custom_word_threshold: DEFAULT_VOCABULARY_THRESHOLD,
        }
    }
}

impl AppSettings {
    pub fn speech_timeout(&self) -> Duration {
        Duration::from_millis(self.speech_timeout_ms)
    }
}

/// Loads settings from a JSON file, falling back to defaults when the file
/// is missing or unreadable.
pub fn load_settings<P: AsRef<Path>>(path: P) -> AppSettings {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Ignoring malformed settings file {:?}: {e}",
                    path.as_ref()
                );
                AppSettings::default()
            }
        },
        Err(_) => AppSettings::default(),
    }
}

/// Persists settings as pretty-printed JSON.
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &AppSettings) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path.as_ref(), contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = AppSettings::default();
        assert_eq!(settings.speech_timeout(), Duration::from_secs(15));
        assert_eq!(settings.recognition_language.as_deref(), Some("ru-RU"));
        assert!(settings.custom_words.is_empty());
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = AppSettings::default();
        settings.selected_microphone = Some("USB Microphone".into());
        settings.speech_timeout_ms = 5_000;
        settings.custom_words = vec!["recursion".into()];

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path);

        assert_eq!(loaded.selected_microphone.as_deref(), Some("USB Microphone"));
        assert_eq!(loaded.speech_timeout_ms, 5_000);
        assert_eq!(loaded.custom_words, vec!["recursion".to_string()]);
    }

    #[test]
    fn missing_or_malformed_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_settings(dir.path().join("nope.json"));
        assert_eq!(missing.speech_timeout_ms, DEFAULT_SPEECH_TIMEOUT_MS);

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let broken = load_settings(&path);
        assert_eq!(broken.speech_timeout_ms, DEFAULT_SPEECH_TIMEOUT_MS);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"speech_timeout_ms": 2000}"#).unwrap();

        let loaded = load_settings(&path);
        assert_eq!(loaded.speech_timeout_ms, 2_000);
        assert_eq!(loaded.custom_word_threshold, DEFAULT_VOCABULARY_THRESHOLD);
    }
}
