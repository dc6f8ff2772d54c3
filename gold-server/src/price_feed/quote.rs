//! Upstream quote fields and their normalisation to `f64`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A price field as the upstream sends it: a JSON number or a string that
/// may use a comma as decimal separator (`"5600,50"`).
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteValue {
    Number(f64),
    Text(String),
}

impl QuoteValue {
    /// `null`, `0`, `""` and non-scalar values count as absent, so that
    /// `buying` is consulted when `selling` carries nothing useful.
    fn from_json(v: Value) -> Option<Self> {
        match v {
            Value::Number(n) => n.as_f64().filter(|x| *x != 0.0).map(QuoteValue::Number),
            Value::String(s) if !s.is_empty() => Some(QuoteValue::Text(s)),
            _ => None,
        }
    }

    /// Normalised numeric value, or `None` if the text holds no number.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            QuoteValue::Number(n) => Some(*n),
            QuoteValue::Text(s) => parse_price_text(s),
        }
    }
}

/// One denomination's entry in the upstream response.
#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default, deserialize_with = "de_quote_value")]
    pub selling: Option<QuoteValue>,
    #[serde(default, deserialize_with = "de_quote_value")]
    pub buying: Option<QuoteValue>,
}

impl Quote {
    /// Selling price if present, otherwise buying price.
    pub fn preferred(&self) -> Option<&QuoteValue> {
        self.selling.as_ref().or(self.buying.as_ref())
    }
}

fn de_quote_value<'de, D>(deserializer: D) -> Result<Option<QuoteValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.and_then(QuoteValue::from_json))
}

/// Parses a price string leniently.
///
/// The first comma is taken as the decimal separator. Leading whitespace is
/// skipped and anything after the leading decimal literal is ignored, so
/// `" 5600,50 TL"` reads as `5600.5`.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let normalised = text.replacen(',', ".", 1);
    let s = normalised.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
