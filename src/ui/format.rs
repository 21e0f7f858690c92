// ============================================================================
// Formatage des nombres pour l'affichage
// ============================================================================

/// Formate avec séparateur de milliers et 2 décimales : 65000 → "65,000.00"
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Ligne de taux : "1 BTC = $65,000.00"
pub fn rate_line(symbol: &str, rate: f64) -> String {
    format!("1 BTC = {}{}", symbol, format_grouped(rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0.00");
        assert_eq!(format_grouped(999.999), "1,000.00");
        assert_eq!(format_grouped(65000.0), "65,000.00");
        assert_eq!(format_grouped(9_800_000.0), "9,800,000.00");
        assert_eq!(format_grouped(123_456_789.5), "123,456,789.50");
        assert_eq!(format_grouped(-1234.5), "-1,234.50");
    }

    #[test]
    fn test_rate_line() {
        assert_eq!(rate_line("$", 65000.0), "1 BTC = $65,000.00");
        assert_eq!(rate_line("€", 60000.0), "1 BTC = €60,000.00");
    }
}
