// Theme preference
// Persisted as "light"/"dark" in eframe storage, mirroring the
// widget's durable theme key

use serde::{Deserialize, Serialize};

/// Light/dark preference, read once at startup and re-persisted on
/// every toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Default light visuals
    #[default]
    Light,
    /// Dark visuals
    Dark,
}

impl ThemePreference {
    /// The opposite preference
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Whether dark visuals are selected
    pub fn is_dark(self) -> bool {
        matches!(self, ThemePreference::Dark)
    }

    /// egui visuals matching the preference
    pub fn visuals(self) -> egui::Visuals {
        if self.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_light() {
        assert_eq!(ThemePreference::default(), ThemePreference::Light);
        assert!(!ThemePreference::default().is_dark());
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let original = ThemePreference::Light;
        let flipped = original.toggled();
        assert_ne!(original, flipped);
        assert_eq!(original, flipped.toggled());
    }

    #[test]
    fn test_persisted_form_is_lowercase_string() {
        assert_eq!(
            serde_json::to_string(&ThemePreference::Dark).unwrap(),
            "\"dark\""
        );
        assert_eq!(
            serde_json::from_str::<ThemePreference>("\"light\"").unwrap(),
            ThemePreference::Light
        );
    }
}
