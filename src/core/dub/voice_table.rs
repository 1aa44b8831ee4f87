//! Fixed ISO-language-code-to-voice-identifier table.
//!
//! Unknown codes fall back to the English entry. Per-entry overrides are
//! applied on top of this table from [`crate::config::DubConfig::voice_overrides`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

static VOICE_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "en-US-JennyNeural"),
        ("it", "it-IT-ElsaNeural"),
        ("zh", "zh-CN-XiaoxiaoNeural"),
        ("es", "es-ES-ElviraNeural"),
        ("fr", "fr-FR-DeniseNeural"),
        ("de", "de-DE-KatjaNeural"),
        ("ja", "ja-JP-NanamiNeural"),
        ("pt", "pt-BR-FranciscaNeural"),
        ("ru", "ru-RU-SvetlanaNeural"),
        ("ko", "ko-KR-SunHiNeural"),
    ])
});

const DEFAULT_VOICE: &str = "en-US-JennyNeural";

/// Resolves a voice id for `language_code`, applying `overrides` first and
/// falling back to the English entry for unknown codes.
pub fn voice_for(language_code: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(custom) = overrides.get(language_code) {
        return custom.clone();
    }
    VOICE_TABLE
        .get(language_code)
        .map(|v| v.to_string())
        .unwrap_or_else(|| DEFAULT_VOICE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_language() {
        let overrides = HashMap::new();
        assert_eq!(voice_for("it", &overrides), "it-IT-ElsaNeural");
    }

    #[test]
    fn falls_back_to_english_for_unknown_code() {
        let overrides = HashMap::new();
        assert_eq!(voice_for("xx", &overrides), DEFAULT_VOICE);
    }

    #[test]
    fn override_takes_precedence() {
        let mut overrides = HashMap::new();
        overrides.insert("it".to_string(), "it-IT-CustomNeural".to_string());
        assert_eq!(voice_for("it", &overrides), "it-IT-CustomNeural");
    }
}
