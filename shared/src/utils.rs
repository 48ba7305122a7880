// Display helpers shared by the report renderer and any external front-end.

/// Formats a price with its currency label, e.g. `$123.46`. `None` renders as `n/a`.
pub fn format_money(label: &str, value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}{:.2}", label, v),
        _ => "n/a".to_string(),
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v),
        _ => "n/a".to_string(),
    }
}

/// Volume is carried as f64 for uniformity with provider output but is a whole count.
pub fn format_volume(value: f64) -> String {
    let digits = format!("{:.0}", value.max(0.0));
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
