//! Number formatting for labels and tooltips

use sal_core::drilldown::group_thousands;

/// `$120,000`
pub fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", group_thousands(-value))
    } else {
        format!("${}", group_thousands(value))
    }
}

/// `$120k`, used on compact axes and the globe legend
pub fn format_k(value: f64) -> String {
    format!("${}k", group_thousands(value / 1000.0))
}

/// Share in `[0, 1]` as a percentage with one decimal (`"33.3"`)
pub fn format_percent(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.1}", ratio * 100.0)
    } else {
        "0.0".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(120_000.0), "$120,000");
        assert_eq!(format_currency(99_999.6), "$100,000");
        assert_eq!(format_currency(-5.0), "-$5");
    }

    #[test]
    fn test_format_k() {
        assert_eq!(format_k(45_000.0), "$45k");
        assert_eq!(format_k(1_234_000.0), "$1,234k");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1.0 / 3.0), "33.3");
        assert_eq!(format_percent(f64::NAN), "0.0");
    }
}
