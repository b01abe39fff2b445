//! Форматирование чисел для графиков и легенды

/// Inserts a space every three digits of the integer part
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*c);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Часы простоя: два знака после точки, "1 234.50"
pub fn format_hours(hours: f64) -> String {
    group_thousands(&format!("{:.2}", hours))
}

pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Legend line: "12.50 ч | 4"
pub fn format_legend_value(hours: f64, count: u64) -> String {
    format!("{} ч | {}", format_hours(hours), format_count(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(0.0), "0.00");
        assert_eq!(format_hours(12.5), "12.50");
        assert_eq!(format_hours(1234.567), "1 234.57");
        assert_eq!(format_hours(-1234.5), "-1 234.50");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1234567), "1 234 567");
    }

    #[test]
    fn test_legend_value() {
        assert_eq!(format_legend_value(3.0, 2), "3.00 ч | 2");
    }
}
