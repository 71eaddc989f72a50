/// Rounds to `places` decimal digits, half away from zero.
#[inline]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(-2.675_01, 2), -2.68);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn rounds_to_whole_numbers() {
        assert_eq!(round_to(1234.5, 0), 1235.0);
        assert_eq!(round_to(-0.4, 0), -0.0);
    }
}
