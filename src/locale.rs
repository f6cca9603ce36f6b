//! Locale-aware number handling for the calculator fields.
//!
//! Text typed by the user is accepted with either a comma or a period as the
//! decimal separator, while values written back to the fields use the
//! separator of the browser locale.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// Decimal literal as typed in a field, either separator, optional exponent
static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+([.,]\d*)?|[.,]\d+)([eE][+-]?\d+)?$").unwrap()
});

// BCP 47 tag such as "sv-SE", "pt_BR" or "sr-Latn-RS": language, script, region
static LANGUAGE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{2,3})(?:[-_]([A-Za-z]{4}))?(?:[-_]([A-Za-z]{2}|\d{3}))?(?:[-_][A-Za-z0-9]+)*$")
        .unwrap()
});

/// Languages that write a decimal comma.
const DECIMAL_COMMA_LANGUAGES: &[&str] = &[
    "az", "be", "bg", "bs", "ca", "cs", "da", "de", "el", "es", "et", "eu", "fi", "fo", "fr",
    "gl", "hr", "hu", "hy", "id", "is", "it", "ka", "kk", "lt", "lv", "mk", "nb", "nl", "nn",
    "no", "pl", "pt", "ro", "ru", "sk", "sl", "sq", "sr", "sv", "tr", "uk", "uz", "vi",
];

/// Regions whose convention differs from their language's: (language, region, separator).
const REGION_OVERRIDES: &[(&str, &str, char)] = &[
    ("de", "CH", '.'),
    ("de", "LI", '.'),
    ("it", "CH", '.'),
    ("es", "MX", '.'),
    ("es", "US", '.'),
    ("es", "PR", '.'),
    ("es", "DO", '.'),
    ("es", "GT", '.'),
    ("es", "HN", '.'),
    ("es", "NI", '.'),
    ("es", "PA", '.'),
    ("es", "PE", '.'),
    ("es", "SV", '.'),
    ("en", "ZA", ','),
    ("en", "AT", ','),
    ("en", "BE", ','),
    ("en", "DE", ','),
    ("en", "DK", ','),
    ("en", "FI", ','),
    ("en", "NL", ','),
    ("en", "SE", ','),
    ("en", "SI", ','),
];

/// Decimal parsing error types
#[derive(Debug, Clone, PartialEq)]
pub enum ParseDecimalError {
    Malformed(String),
}

impl std::fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseDecimalError::Malformed(text) => write!(f, "Not a decimal number: {:?}", text),
        }
    }
}

impl std::error::Error for ParseDecimalError {}

/// Parse a decimal number written with either `,` or `.` as separator.
///
/// Surrounding whitespace is ignored and an empty field counts as zero.
///
/// # Examples
/// ```
/// use cutting_speed::locale::parse_decimal;
/// assert_eq!(parse_decimal("12,5"), Ok(12.5));
/// assert_eq!(parse_decimal("12.5"), Ok(12.5));
/// assert_eq!(parse_decimal(""), Ok(0.0));
/// ```
pub fn parse_decimal(input: &str) -> Result<f64, ParseDecimalError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    if !DECIMAL_REGEX.is_match(trimmed) {
        return Err(ParseDecimalError::Malformed(input.to_string()));
    }

    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ParseDecimalError::Malformed(input.to_string()))
}

/// Parse a field value, coercing anything unparseable to zero.
pub fn parse_or_zero(input: &str) -> f64 {
    match parse_decimal(input) {
        Ok(value) => value,
        Err(e) => {
            debug!("{}, using 0", e);
            0.0
        }
    }
}

/// Number formatting conventions of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal_separator: char,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
        }
    }
}

impl NumberLocale {
    pub const DECIMAL_COMMA: NumberLocale = NumberLocale {
        decimal_separator: ',',
    };

    /// Pick the conventions for a language tag like "sv-SE" or "en_US".
    /// The region refines the language's convention; unrecognised tags fall
    /// back to the default (period separator).
    pub fn from_language_tag(tag: &str) -> Self {
        let Some(captures) = LANGUAGE_TAG_REGEX.captures(tag.trim()) else {
            debug!("Unrecognised language tag {:?}, using default locale", tag);
            return Self::default();
        };

        let language = captures[1].to_ascii_lowercase();
        let region = captures.get(3).map(|m| m.as_str().to_ascii_uppercase());

        if let Some(region) = region {
            let overridden = REGION_OVERRIDES
                .iter()
                .find(|(l, r, _)| *l == language && *r == region);
            if let Some(&(_, _, decimal_separator)) = overridden {
                return Self { decimal_separator };
            }
        }

        if DECIMAL_COMMA_LANGUAGES.contains(&language.as_str()) {
            Self::DECIMAL_COMMA
        } else {
            Self::default()
        }
    }

    /// Conventions of the browser's default locale.
    ///
    /// Asks `Intl.NumberFormat` for the decimal separator and falls back to
    /// the language tag table when that yields nothing.
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        if let Some(locale) = Self::from_intl() {
            log::info!("Intl decimal separator {:?}", locale.decimal_separator);
            return locale;
        }

        let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
            return Self::default();
        };

        let languages: js_sys::Array = navigator.languages();
        let preferred = languages.get(0).as_string().or_else(|| navigator.language());

        match preferred {
            Some(tag) => {
                let locale = Self::from_language_tag(&tag);
                log::info!("Browser language {}, decimal separator {:?}", tag, locale.decimal_separator);
                locale
            }
            None => Self::default(),
        }
    }

    /// Decimal part of `formatToParts(1.5)` in the default locale.
    #[cfg(target_arch = "wasm32")]
    fn from_intl() -> Option<Self> {
        use js_sys::{Array, Intl, Object, Reflect};
        use wasm_bindgen::JsValue;

        let format = Intl::NumberFormat::new(&Array::new(), &Object::new());
        let parts = format.format_to_parts(1.5);

        parts.iter().find_map(|part| {
            let kind = Reflect::get(&part, &JsValue::from_str("type")).ok()?.as_string()?;
            if kind != "decimal" {
                return None;
            }
            let value = Reflect::get(&part, &JsValue::from_str("value")).ok()?.as_string()?;
            value.chars().next().map(|decimal_separator| Self { decimal_separator })
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::default()
    }

    /// Fixed-point formatting with `decimals` places, rounding half away from
    /// zero and without digit grouping.
    pub fn format(&self, value: f64, decimals: usize) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }

        let scale = 10f64.powi(decimals as i32);
        let scaled = value * scale;
        let rounded = if scaled.is_finite() {
            scaled.round() / scale
        } else {
            value
        };

        let text = format!("{:.*}", decimals, rounded);
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_separators() {
        assert_eq!(parse_decimal("63,7"), Ok(63.7));
        assert_eq!(parse_decimal("63.7"), Ok(63.7));
        assert_eq!(parse_decimal(" 1273 "), Ok(1273.0));
        assert_eq!(parse_decimal("-4,5"), Ok(-4.5));
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(parse_decimal(""), Ok(0.0));
        assert_eq!(parse_decimal("   "), Ok(0.0));
    }

    #[test]
    fn malformed_input_is_reported_and_coerced() {
        assert_eq!(
            parse_decimal("12a"),
            Err(ParseDecimalError::Malformed("12a".to_string()))
        );
        // Grouping separators are not understood: "1.000,5" becomes "1.000.5"
        assert!(parse_decimal("1.000,5").is_err());
        assert_eq!(parse_or_zero("abc"), 0.0);
        assert_eq!(parse_or_zero("-"), 0.0);
        assert_eq!(parse_or_zero("2,5"), 2.5);
    }

    #[test]
    fn special_float_words_count_as_zero() {
        for word in ["inf", "nan", "Infinity", "-infinity", "NaN", "INF"] {
            assert_eq!(
                parse_decimal(word),
                Err(ParseDecimalError::Malformed(word.to_string()))
            );
            assert_eq!(parse_or_zero(word), 0.0, "{}", word);
        }
    }

    #[test]
    fn accepts_partial_and_exponent_forms() {
        assert_eq!(parse_decimal("12,"), Ok(12.0));
        assert_eq!(parse_decimal(",5"), Ok(0.5));
        assert_eq!(parse_decimal("+3"), Ok(3.0));
        assert_eq!(parse_decimal("1,5e3"), Ok(1500.0));
        assert!(parse_decimal("1e").is_err());
        assert!(parse_decimal(".").is_err());
    }

    #[test]
    fn region_refines_language_convention() {
        assert_eq!(NumberLocale::from_language_tag("de-CH").decimal_separator, '.');
        assert_eq!(NumberLocale::from_language_tag("es-MX").decimal_separator, '.');
        assert_eq!(NumberLocale::from_language_tag("es_us").decimal_separator, '.');
        assert_eq!(NumberLocale::from_language_tag("en-ZA").decimal_separator, ',');
        assert_eq!(NumberLocale::from_language_tag("es-ES").decimal_separator, ',');
        assert_eq!(NumberLocale::from_language_tag("de-AT").decimal_separator, ',');
        assert_eq!(NumberLocale::from_language_tag("en-GB").decimal_separator, '.');
        assert_eq!(NumberLocale::from_language_tag("sr-Latn-RS").decimal_separator, ',');
    }

    #[test]
    fn language_tags_select_separator() {
        assert_eq!(NumberLocale::from_language_tag("sv-SE"), NumberLocale::DECIMAL_COMMA);
        assert_eq!(NumberLocale::from_language_tag("de"), NumberLocale::DECIMAL_COMMA);
        assert_eq!(NumberLocale::from_language_tag("pt_BR"), NumberLocale::DECIMAL_COMMA);
        assert_eq!(NumberLocale::from_language_tag("en-US"), NumberLocale::default());
        assert_eq!(NumberLocale::from_language_tag("ja"), NumberLocale::default());
        assert_eq!(NumberLocale::from_language_tag(""), NumberLocale::default());
        assert_eq!(NumberLocale::from_language_tag("not a tag"), NumberLocale::default());
    }

    #[test]
    fn formats_with_fixed_precision() {
        let locale = NumberLocale::default();
        assert_eq!(locale.format(1591.549, 0), "1592");
        assert_eq!(locale.format(20.0, 1), "20.0");
        assert_eq!(locale.format(63.66, 1), "63.7");
        assert_eq!(locale.format(0.0, 0), "0");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let locale = NumberLocale::default();
        assert_eq!(locale.format(2.5, 0), "3");
        assert_eq!(locale.format(0.25, 1), "0.3");
        assert_eq!(locale.format(-2.5, 0), "-3");
    }

    #[test]
    fn formats_with_decimal_comma() {
        let locale = NumberLocale::DECIMAL_COMMA;
        assert_eq!(locale.format(20.0, 1), "20,0");
        assert_eq!(locale.format(1273.24, 0), "1273");
    }

    #[test]
    fn formats_non_finite_values() {
        let locale = NumberLocale::default();
        assert_eq!(locale.format(f64::INFINITY, 0), "Infinity");
        assert_eq!(locale.format(f64::NEG_INFINITY, 1), "-Infinity");
        assert_eq!(locale.format(f64::NAN, 0), "NaN");
    }

    #[test]
    fn detect_falls_back_to_default_off_the_web() {
        assert_eq!(NumberLocale::detect(), NumberLocale::default());
    }
}
