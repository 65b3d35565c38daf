//! Display-line template for the synthetic damage line.
//!
//! The raw template comes from operator configuration (`&9Actual Damage: %damage%`).
//! It is normalized once per load and shared read-only with packet handling
//! through [`SharedTemplate`].

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// Placeholder replaced by the formatted damage value.
pub const DAMAGE_PLACEHOLDER: &str = "%damage%";

/// Template written back to configuration when the configured one is blank.
pub const DEFAULT_TEMPLATE: &str = "&9Actual Damage: %damage%";

const COLOR_CODE_CHARS: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";
const SECTION_SIGN: char = '\u{00A7}';

/// Normalized template with a single substitution site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLineTemplate {
    prefix: String,
    suffix: String,
    has_placeholder: bool,
}

impl DisplayLineTemplate {
    /// Translate colour codes and locate the first `%damage%` placeholder.
    ///
    /// Later placeholders are kept as literal text. A template without a
    /// placeholder renders the value after the text, separated by a space.
    pub fn normalize(raw: &str) -> Self {
        let translated = translate_color_codes(raw);
        match translated.split_once(DAMAGE_PLACEHOLDER) {
            Some((prefix, suffix)) => Self {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
                has_placeholder: true,
            },
            None => {
                warn!(
                    template = raw,
                    "Display template has no {DAMAGE_PLACEHOLDER} placeholder; appending value"
                );
                Self {
                    prefix: translated,
                    suffix: String::new(),
                    has_placeholder: false,
                }
            }
        }
    }

    /// Whether the raw template contained a placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.has_placeholder
    }

    /// Render the line for `value`.
    pub fn render(&self, value: f64) -> String {
        let formatted = format_damage(value);
        if self.has_placeholder {
            format!("{}{}{}", self.prefix, formatted, self.suffix)
        } else if self.prefix.is_empty() {
            formatted
        } else {
            format!("{} {}", self.prefix, formatted)
        }
    }
}

impl Default for DisplayLineTemplate {
    fn default() -> Self {
        Self::normalize(DEFAULT_TEMPLATE)
    }
}

/// Format with at most one decimal place, rounding half up and dropping a trailing `.0`.
pub fn format_damage(value: f64) -> String {
    let tenths = (value * 10.0).round();
    if tenths == 0.0 {
        return "0".to_string();
    }
    if tenths % 10.0 == 0.0 {
        format!("{:.0}", tenths / 10.0)
    } else {
        format!("{:.1}", tenths / 10.0)
    }
}

/// Replace `&` with the section sign before every valid colour/format code.
pub fn translate_color_codes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '&' && COLOR_CODE_CHARS.contains(next) => {
                out.push(SECTION_SIGN);
                out.push(next.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Process-wide template slot, swapped atomically on reload.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedTemplate {
    slot: Arc<RwLock<Arc<DisplayLineTemplate>>>,
}

impl SharedTemplate {
    /// Create a slot holding `template`.
    pub fn new(template: DisplayLineTemplate) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(template))),
        }
    }

    /// Current template. The returned snapshot is unaffected by later reloads.
    pub fn load(&self) -> Arc<DisplayLineTemplate> {
        self.slot.read().clone()
    }

    /// Replace the template for all clones of this handle.
    pub fn replace(&self, template: DisplayLineTemplate) {
        *self.slot.write() = Arc::new(template);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the formatted value is within half a tenth of the input
        #[test]
        fn formatted_damage_is_close(value in 0.0f64..1000.0) {
            let formatted = format_damage(value);
            let parsed: f64 = formatted.parse().unwrap();
            prop_assert!((parsed - value).abs() <= 0.05 + 1e-9, "{} -> {}", value, formatted);
            prop_assert!(!formatted.ends_with(".0"));
        }
    }

    #[test]
    fn formats_one_decimal_half_up() {
        assert_eq!(format_damage(5.0), "5");
        assert_eq!(format_damage(5.25), "5.3");
        assert_eq!(format_damage(9.5), "9.5");
        assert_eq!(format_damage(10.0), "10");
        assert_eq!(format_damage(12.04), "12");
        assert_eq!(format_damage(12.96), "13");
    }

    #[test]
    fn translates_only_valid_color_codes() {
        assert_eq!(translate_color_codes("&9Blue"), "\u{a7}9Blue");
        assert_eq!(translate_color_codes("&LBold"), "\u{a7}lBold");
        assert_eq!(translate_color_codes("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(translate_color_codes("&zNope&"), "&zNope&");
    }

    #[test]
    fn default_template_renders() {
        let template = DisplayLineTemplate::default();
        assert!(template.has_placeholder());
        assert_eq!(template.render(10.0), "\u{a7}9Actual Damage: 10");
    }

    #[test]
    fn only_first_placeholder_is_substituted() {
        let template = DisplayLineTemplate::normalize("%damage% / %damage%");
        assert_eq!(template.render(7.5), "7.5 / %damage%");
    }

    #[test]
    fn missing_placeholder_appends_value() {
        let template = DisplayLineTemplate::normalize("&cDamage:");
        assert!(!template.has_placeholder());
        assert_eq!(template.render(4.0), "\u{a7}cDamage: 4");
    }

    #[test]
    fn shared_template_swaps_for_all_clones() {
        let shared = SharedTemplate::new(DisplayLineTemplate::normalize("A %damage%"));
        let other = shared.clone();
        let before = shared.load();

        other.replace(DisplayLineTemplate::normalize("B %damage%"));

        assert_eq!(before.render(1.0), "A 1");
        assert_eq!(shared.load().render(1.0), "B 1");
    }
}
