use std::f64::consts::TAU;

/// Round `value` to the nearest multiple of `step` (ties away from zero).
/// Display code quantizes before positioning so a label and its line never disagree.
pub fn quantize_to_step(value: f64, step: f64) -> f64 {
    if !value.is_finite() || step.is_nan() || step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Map a sinusoid of period `period_secs` onto `[min, max]`.
/// At `t = 0` the output sits at the midpoint and is rising.
pub fn sine_cycle(elapsed_secs: f64, period_secs: f64, min: f64, max: f64) -> f64 {
    let phase = (elapsed_secs / period_secs) * TAU;
    let s = (phase.sin() + 1.0) / 2.0;
    min + (max - min) * s
}

/// Sum of two centred uniform variates: a cheap, bounded bell curve on [-1, 1].
pub fn irwin_hall_pair(u1: f64, u2: f64) -> f64 {
    (u1 - 0.5) + (u2 - 0.5)
}

/// Insert `,` every three digits of the integer part of a formatted number.
pub fn group_thousands(formatted: &str) -> String {
    use itertools::Itertools;

    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let grouped: String = int_part
        .chars()
        .rev()
        .chunks(3)
        .into_iter()
        .map(|chunk| chunk.collect::<String>())
        .join(",")
        .chars()
        .rev()
        .collect();

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Price with a `$` prefix, fixed decimals and thousands separators: `$116,200.14`.
pub fn format_price(price: f64, digits: usize) -> String {
    format!("${}", format_level(price, digits))
}

/// Grid label text: fixed decimals with thousands separators, no currency sign.
pub fn format_level(price: f64, digits: usize) -> String {
    if !price.is_finite() {
        return "-".to_string();
    }
    group_thousands(&format!("{price:.digits$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn quantize_rounds_to_nearest_not_truncates() {
        assert!((quantize_to_step(100.029, 0.02) - 100.02).abs() < 1e-9);
        assert!((quantize_to_step(100.031, 0.02) - 100.04).abs() < 1e-9);
        assert!((quantize_to_step(-0.031, 0.02) + 0.04).abs() < 1e-9);
    }

    #[test]
    fn quantize_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20_000 {
            let x: f64 = rng.random_range(-1.0e6..1.0e6);
            for step in [0.02, 0.5, 0.001, 3.0] {
                let once = quantize_to_step(x, step);
                assert_eq!(quantize_to_step(once, step), once, "x={x} step={step}");
            }
        }
        assert_eq!(quantize_to_step(0.0, 0.02), 0.0);
    }

    #[test]
    fn sine_cycle_stays_in_range() {
        for i in 0..1000 {
            let v = sine_cycle(i as f64 * 0.137, 18.0, 0.9, 1.1);
            assert!((0.9..=1.1).contains(&v));
        }
        assert!((sine_cycle(0.0, 18.0, 0.9, 1.1) - 1.0).abs() < 1e-12);
        assert!((sine_cycle(4.5, 18.0, 0.9, 1.1) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn irwin_hall_pair_is_bounded() {
        assert_eq!(irwin_hall_pair(0.5, 0.5), 0.0);
        assert_eq!(irwin_hall_pair(0.0, 0.0), -1.0);
        assert!(irwin_hall_pair(0.999_999, 0.999_999) < 1.0);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("116200.02"), "116,200.02");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("999.5"), "999.5");
        assert_eq!(group_thousands("-1000.00"), "-1,000.00");
        assert_eq!(group_thousands("0.00"), "0.00");
    }

    #[test]
    fn formats_prices_with_separators() {
        assert_eq!(format_price(116_200.14, 2), "$116,200.14");
        assert_eq!(format_price(999.5, 2), "$999.50");
        assert_eq!(format_level(1_234_567.0, 0), "1,234,567");
        assert_eq!(format_level(-4_321.26, 1), "-4,321.3");
    }

    #[test]
    fn non_finite_price_is_a_dash() {
        assert_eq!(format_level(f64::NAN, 2), "-");
        assert_eq!(format_price(f64::INFINITY, 2), "$-");
    }
}
