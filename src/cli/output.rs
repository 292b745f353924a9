//! Output formatting for CLI

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a count together with its share of `total` as a percentage
pub fn format_share(count: usize, total: usize) -> String {
    let percent = if total > 0 {
        count as f64 * 100.0 / total as f64
    } else {
        0.0
    };
    format!("{} ({percent:.1}%)", format_number(count))
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(200_000), "200,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(1, 4), "1 (25.0%)");
        assert_eq!(format_share(0, 0), "0 (0.0%)");
    }
}
