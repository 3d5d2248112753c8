/// Display symbol for an ISO currency code; unknown codes pass through.
pub fn currency_symbol(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "JPY" => "¥",
        "GBP" => "£",
        "AUD" => "A$",
        "CAD" => "C$",
        "HKD" => "HK$",
        _ => code,
    }
}

/// Formats a quantity with a currency symbol and B/M/K units; negative values
/// are parenthesized accounting-style.
pub fn format_number(num: f64, currency: &str) -> String {
    if num.is_nan() {
        return "N/A".to_string();
    }

    let is_negative = num < 0.0;
    let num = num.abs();

    let formatted = if num >= 1e9 {
        format!("{} {:.2} B", currency, num / 1e9)
    } else if num >= 1e6 {
        format!("{} {:.2} M", currency, num / 1e6)
    } else if num >= 1e3 {
        format!("{} {:.2} K", currency, num / 1e3)
    } else {
        format!("{} {:.2}", currency, num)
    };

    if is_negative {
        format!("({})", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_units() {
        assert_eq!(format_number(2.95e12, "$"), "$ 2950.00 B");
        assert_eq!(format_number(1_500_000.0, "$"), "$ 1.50 M");
        assert_eq!(format_number(12_345.0, "€"), "€ 12.35 K");
        assert_eq!(format_number(113.884, "$"), "$ 113.88");
    }

    #[test]
    fn test_format_number_negative_and_nan() {
        assert_eq!(format_number(-2_000_000.0, "$"), "($ 2.00 M)");
        assert_eq!(format_number(f64::NAN, "$"), "N/A");
    }

    #[test]
    fn test_currency_symbol_passthrough() {
        assert_eq!(currency_symbol("USD"), "$");
        assert_eq!(currency_symbol("GBP"), "£");
        assert_eq!(currency_symbol("CHF"), "CHF");
    }
}
