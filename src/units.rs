pub mod temperature {
    /// Whole degrees, rounding halves up toward positive infinity.
    pub fn round(temp_c: f64) -> i64 {
        (temp_c + 0.5).floor() as i64
    }

    #[test]
    fn test_round() {
        assert_eq!(round(15.4), 15);
        assert_eq!(round(15.5), 16);
        assert_eq!(round(-0.4), 0);
        assert_eq!(round(-2.6), -3);
        assert_eq!(round(-0.5), 0);
        assert_eq!(round(-2.5), -2);
        assert_eq!(round(-15.5), -15);
    }
}

pub mod speed {
    const KPH_PER_MS: f64 = 3.6;

    pub fn ms2kph(ms: f64) -> f64 {
        ms * KPH_PER_MS
    }

    #[test]
    fn test_ms2kph() {
        assert_eq!(ms2kph(0.0), 0.0);
        assert_eq!(ms2kph(10.0), 36.0);
        assert_eq!(ms2kph(3.2).round(), 12.0);
    }
}
