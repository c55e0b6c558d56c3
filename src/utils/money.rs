// Formatação de valores no estilo espanhol: "." agrupa milhares, "," separa decimais

pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().chain(frac_part.chars()).all(|c| c == '0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    format!("{}{},{}", sign, grouped, frac_part)
}

pub fn format_amount(value: f64, currency: &str) -> String {
    format!("{} {}", format_currency(value), currency)
}

/// Accepts `12.50`, `12,50` and grouped forms such as `1.234,50`.
pub fn parse_amount(amount_str: &str) -> Result<f64, std::num::ParseFloatError> {
    let cleaned = amount_str.trim().replace(' ', "");

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.matches('.').count() > 1 {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    normalized.parse()
}
