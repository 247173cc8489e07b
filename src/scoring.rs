//! Numeric helpers shared by the aggregators. Every division checks its denominator.

/// Task Performance Indicator: success rate weighted by time efficiency, 0 to 100.
///
/// `round(success_rate * min(1, target / avg) * 100)`. A non-positive average time
/// leaves the time factor at 1.
pub fn tpi_score(success_rate: f64, avg_time_ms: f64, target_time_ms: f64) -> u32 {
    let success_rate = if success_rate.is_finite() {
        success_rate.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let time_factor = if avg_time_ms > 0.0 && target_time_ms >= 0.0 {
        (target_time_ms / avg_time_ms).min(1.0)
    } else {
        1.0
    };

    (success_rate * time_factor * 100.0).round().clamp(0.0, 100.0) as u32
}

pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Share of `whole` as a rounded whole percentage.
pub fn percentage(part: usize, whole: usize) -> u32 {
    (ratio(part, whole) * 100.0).round() as u32
}

pub fn format_percent(rate: f64) -> String {
    format!("{}%", (rate * 100.0).round() as i64)
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tpi_follows_formula() {
        assert_eq!(tpi_score(0.6, 40_000.0, 45_000.0), 60);
        assert_eq!(tpi_score(0.8, 90_000.0, 45_000.0), 40);
        assert_eq!(tpi_score(1.0, 45_000.0, 45_000.0), 100);
        assert_eq!(tpi_score(0.0, 10_000.0, 45_000.0), 0);
    }

    #[test]
    fn tpi_guards_degenerate_inputs() {
        assert_eq!(tpi_score(0.5, 0.0, 45_000.0), 50);
        assert_eq!(tpi_score(1.7, 10.0, 45_000.0), 100);
        assert_eq!(tpi_score(f64::NAN, 10.0, 45_000.0), 0);
    }

    #[test]
    fn percentages_check_their_denominator() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(ratio(3, 0), 0.0);
    }

    #[test]
    fn formats_rounded_percent() {
        assert_eq!(format_percent(0.6), "60%");
        assert_eq!(format_percent(2.0 / 3.0), "67%");
        assert_eq!(format_percent(0.0), "0%");
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean(vec![40_000.0, 50_000.0]), Some(45_000.0));
    }
}
