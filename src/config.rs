use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

use crate::error::Result;

/// Id of the optional inline JSON block that overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-enhance-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for every enhancement. All fields fall back to the values the
/// site was designed around, so a page without a config block behaves the
/// same as one with an empty `{}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub nav_breakpoint_px: f64,
    pub resize_debounce_ms: u32,
    pub scroll_throttle_ms: u32,
    pub header_fallback_px: f64,
    pub spy_offset_px: f64,
    pub scroll_top_threshold_px: f64,
    pub submit_delay_ms: u32,
    pub thank_you_url: String,
    pub count_duration_ms: f64,
    pub image_reveal_delay_ms: u32,
    pub ripple_ms: u32,
    pub modal_fade_in_ms: u32,
    pub modal_fade_out_ms: u32,
    pub privacy_placeholder_hrefs: Vec<String>,
    pub strings: Strings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            nav_breakpoint_px: 1024.0,
            resize_debounce_ms: 250,
            scroll_throttle_ms: 100,
            header_fallback_px: 70.0,
            spy_offset_px: 100.0,
            scroll_top_threshold_px: 500.0,
            submit_delay_ms: 1500,
            thank_you_url: "thank_you.html".to_string(),
            count_duration_ms: 2000.0,
            image_reveal_delay_ms: 100,
            ripple_ms: 600,
            modal_fade_in_ms: 10,
            modal_fade_out_ms: 300,
            privacy_placeholder_hrefs: vec!["#".to_string(), "privacy.html".to_string()],
            strings: Strings::default(),
        }
    }
}

/// User-facing text. The site is German, so are the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Strings {
    pub first_name_invalid: String,
    pub last_name_invalid: String,
    pub email_invalid: String,
    pub phone_invalid: String,
    pub message_too_short: String,
    pub privacy_required: String,
    pub required: String,
    pub sending: String,
    pub image_unavailable: String,
    pub scroll_to_top_label: String,
    pub privacy_title: String,
    pub privacy_body: String,
    pub close: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            first_name_invalid: "Bitte geben Sie einen gültigen Vornamen ein (2-50 Zeichen)."
                .to_string(),
            last_name_invalid: "Bitte geben Sie einen gültigen Nachnamen ein (2-50 Zeichen)."
                .to_string(),
            email_invalid: "Bitte geben Sie eine gültige E-Mail-Adresse ein.".to_string(),
            phone_invalid: "Bitte geben Sie eine gültige Telefonnummer ein.".to_string(),
            message_too_short: "Bitte geben Sie mindestens 10 Zeichen ein.".to_string(),
            privacy_required: "Sie müssen die Datenschutzerklärung akzeptieren.".to_string(),
            required: "Dieses Feld ist erforderlich.".to_string(),
            sending: "Wird gesendet...".to_string(),
            image_unavailable: "Bild nicht verfügbar".to_string(),
            scroll_to_top_label: "Nach oben scrollen".to_string(),
            privacy_title: "Datenschutzerklärung".to_string(),
            privacy_body: "Hier finden Sie unsere Datenschutzerklärung...".to_string(),
            close: "Schließen".to_string(),
        }
    }
}

pub fn parse(raw: &str) -> Result<SiteConfig> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads the inline config block if the page has one.
pub fn load(document: &Document) -> SiteConfig {
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());

    match raw {
        Some(raw) if !raw.trim().is_empty() => parse(&raw).unwrap_or_else(|e| {
            warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
            SiteConfig::default()
        }),
        _ => SiteConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(parse("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn submit_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.submit_delay_ms, 1500);
        assert_eq!(config.thank_you_url, "thank_you.html");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            parse(r#"{"thankYouUrl": "/danke.html", "strings": {"close": "Close"}}"#).unwrap();
        assert_eq!(config.thank_you_url, "/danke.html");
        assert_eq!(config.strings.close, "Close");
        assert_eq!(config.strings.sending, "Wird gesendet...");
        assert_eq!(config.scroll_top_threshold_px, 500.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse("{thankYouUrl:").is_err());
    }
}
