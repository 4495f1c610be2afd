use thiserror::Error;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// A price of 2.50 is stored as 250.
pub type Cents = i64;

/// Format cents as a decimal string.
/// Example: 750 -> "7.50", 5 -> "0.05"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("'{0}' is not a valid price")]
    InvalidFormat(String),

    #[error("price cannot be negative: {0}")]
    Negative(String),

    #[error("price has more than two decimal places: {0}")]
    TooPrecise(String),
}

/// Parse a non-negative decimal price into cents.
/// Example: "2.50" -> 250, "2.5" -> 250, "3" -> 300, ".99" -> 99
pub fn parse_price(input: &str) -> Result<Cents, PriceError> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(PriceError::Negative(trimmed.to_string()));
    }
    let invalid = || PriceError::InvalidFormat(trimmed.to_string());

    let (units_str, fraction_str) = match trimmed.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (trimmed, ""),
    };
    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    if fraction_str.len() > 2 {
        return Err(PriceError::TooPrecise(trimmed.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| invalid())?
    };
    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => fraction_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction_str.parse().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(750), "7.50");
        assert_eq!(format_cents(250), "2.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-120), "-1.20");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("2.50"), Ok(250));
        assert_eq!(parse_price("2.5"), Ok(250));
        assert_eq!(parse_price("3"), Ok(300));
        assert_eq!(parse_price("3."), Ok(300));
        assert_eq!(parse_price(".99"), Ok(99));
        assert_eq!(parse_price(" 0 "), Ok(0));
    }

    #[test]
    fn test_parse_price_rejects_bad_input() {
        assert!(matches!(parse_price("abc"), Err(PriceError::InvalidFormat(_))));
        assert!(matches!(parse_price("1.2.3"), Err(PriceError::InvalidFormat(_))));
        assert!(matches!(parse_price("."), Err(PriceError::InvalidFormat(_))));
        assert!(matches!(parse_price(""), Err(PriceError::InvalidFormat(_))));
        assert!(matches!(parse_price("1e3"), Err(PriceError::InvalidFormat(_))));
        assert!(matches!(parse_price("-1.00"), Err(PriceError::Negative(_))));
        assert!(matches!(parse_price("1.999"), Err(PriceError::TooPrecise(_))));
    }
}
