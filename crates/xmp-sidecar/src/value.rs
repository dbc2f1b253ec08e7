//! Typed view of a quoted XMP attribute value

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Interpret raw attribute text such as `"+0.50"`, `"1/250"` or `"Custom"`.
    ///
    /// Quoted numbers (with an optional leading `+`) and quoted rationals become
    /// [`Value::Number`]; everything else is kept as text with the quotes removed.
    pub fn parse(raw: &str) -> Self {
        let inner = match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            Some(inner) => inner,
            None => return Value::Text(raw.to_string()),
        };

        match parse_number(inner) {
            Some(n) => Value::Number(n),
            None => Value::Text(inner.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Render as a quoted attribute value.
    pub fn to_attribute(&self) -> String {
        format!("\"{}\"", self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.strip_prefix('+').unwrap_or(text);
    if text.is_empty() || !text.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
        return None;
    }

    let n = match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => text.parse().ok()?,
    };

    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_decimal() {
        assert_eq!(Value::parse("\"+0.50\""), Value::Number(0.5));
        assert_eq!(Value::parse("\"-12\""), Value::Number(-12.0));
        assert_eq!(Value::parse("\"5500\""), Value::Number(5500.0));
    }

    #[test]
    fn test_rational() {
        assert_eq!(Value::parse("\"1/250\""), Value::Number(0.004));
        assert_eq!(Value::parse("\"80/10\""), Value::Number(8.0));
        // Zero denominators stay as text rather than becoming infinity
        assert_eq!(Value::parse("\"1/0\""), Value::Text("1/0".to_string()));
    }

    #[test]
    fn test_text_values() {
        assert_eq!(Value::parse("\"Custom\""), Value::Text("Custom".to_string()));
        assert_eq!(Value::parse("\"\""), Value::Text(String::new()));
        assert_eq!(Value::parse("\"inf\""), Value::Text("inf".to_string()));
        assert_eq!(
            Value::parse("\"2012-06-05T10:00:00.00\""),
            Value::Text("2012-06-05T10:00:00.00".to_string())
        );
        assert_eq!(Value::parse("unquoted"), Value::Text("unquoted".to_string()));
    }

    #[test]
    fn test_attribute_rendering() {
        assert_eq!(Value::Number(1.0).to_attribute(), "\"1\"");
        assert_eq!(Value::Number(-0.25).to_attribute(), "\"-0.25\"");
        assert_eq!(Value::from("Custom").to_attribute(), "\"Custom\"");
    }
}
