use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to cents, halves away from zero. The result
/// always carries exactly two decimal places, so `997.5` renders as `997.50`.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_cent_up() {
        assert_eq!(round2(Decimal::new(12_345, 3)), Decimal::new(1_235, 2));
    }

    #[test]
    fn keeps_two_decimal_values() {
        assert_eq!(round2(Decimal::new(99_750, 2)), Decimal::new(99_750, 2));
    }

    #[test]
    fn pads_to_two_places() {
        assert_eq!(round2(Decimal::new(9_975, 1)).to_string(), "997.50");
        assert_eq!(round2(Decimal::new(1995, 0)).to_string(), "1995.00");
    }

    #[test]
    fn rounds_repeating_division() {
        let third = Decimal::new(100, 0) / Decimal::new(3, 0);
        assert_eq!(round2(third), Decimal::new(3_333, 2));
    }
}
