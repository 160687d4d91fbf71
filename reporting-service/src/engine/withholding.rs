//! Tax withholding (TDS) calculator.
//!
//! Linear over the gross amount: no sign special-casing, so credit-note
//! reversals flow through the same arithmetic. All math is done in
//! `Decimal`; binary floats would break the determinism the frozen
//! snapshots depend on.

use rust_decimal::{Decimal, RoundingStrategy};

use super::EngineError;

/// Result of a withholding computation. `withheld + payable == gross`
/// holds exactly for every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withholding {
    pub withheld: Decimal,
    pub payable: Decimal,
}

/// Compute the withheld and net payable amounts for a gross amount.
///
/// * `percentage: None` means no withholding applies.
/// * `round_up: false` rounds half-to-even at two decimal places.
/// * `round_up: true` rounds the withheld amount up to the next whole
///   currency unit.
pub fn withhold(gross: Decimal, percentage: Option<Decimal>, round_up: bool) -> Withholding {
    let withheld = match percentage {
        None => Decimal::ZERO,
        Some(pct) => {
            let raw = gross * pct / Decimal::from(100);
            if round_up {
                raw.ceil()
            } else {
                raw.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
            }
        }
    };

    Withholding {
        withheld,
        payable: gross - withheld,
    }
}

/// Reject percentages outside `[0, 100]`. Used at the boundaries that
/// accept configuration, not inside the linear function.
pub fn validate_percentage(percentage: Decimal) -> Result<(), EngineError> {
    if percentage < Decimal::ZERO || percentage > Decimal::from(100) {
        return Err(EngineError::InvalidInput(format!(
            "withholding percentage {} outside 0..=100",
            percentage
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn ten_percent_of_ten_thousand() {
        let w = withhold(dec("10000"), Some(dec("10")), false);
        assert_eq!(w.withheld, dec("1000"));
        assert_eq!(w.payable, dec("9000"));
    }

    #[test]
    fn ceiling_rounds_to_next_whole_unit() {
        // 333 * 7% = 23.31, ceiling to 24
        let w = withhold(dec("333"), Some(dec("7")), true);
        assert_eq!(w.withheld, dec("24"));
        assert_eq!(w.payable, dec("309"));
    }

    #[test]
    fn no_percentage_means_no_withholding() {
        let w = withhold(dec("1234.56"), None, false);
        assert_eq!(w.withheld, Decimal::ZERO);
        assert_eq!(w.payable, dec("1234.56"));
    }

    #[test]
    fn half_to_even_at_two_places() {
        // 100.25 * 10% = 10.025 -> 10.02 (even neighbor)
        let w = withhold(dec("100.25"), Some(dec("10")), false);
        assert_eq!(w.withheld, dec("10.02"));
        // 100.35 * 10% = 10.035 -> 10.04
        let w = withhold(dec("100.35"), Some(dec("10")), false);
        assert_eq!(w.withheld, dec("10.04"));
    }

    #[test]
    fn pair_always_sums_to_gross() {
        let grosses = ["0", "1", "333", "10000", "99.99", "0.01", "123456.78"];
        let pcts = ["0", "1", "2.5", "7", "10", "33.33", "100"];
        for g in grosses {
            for p in pcts {
                for round_up in [false, true] {
                    let w = withhold(dec(g), Some(dec(p)), round_up);
                    assert_eq!(w.withheld + w.payable, dec(g), "g={} p={}", g, p);
                }
            }
        }
    }

    #[test]
    fn ceiling_never_less_than_standard() {
        let grosses = ["0", "1", "333", "10000", "99.99"];
        let pcts = ["0", "2.5", "7", "10"];
        for g in grosses {
            for p in pcts {
                let up = withhold(dec(g), Some(dec(p)), true);
                let std = withhold(dec(g), Some(dec(p)), false);
                assert!(up.withheld >= std.withheld, "g={} p={}", g, p);
            }
        }
    }

    #[test]
    fn negative_gross_yields_negative_withholding() {
        let w = withhold(dec("-10000"), Some(dec("10")), false);
        assert_eq!(w.withheld, dec("-1000"));
        assert_eq!(w.payable, dec("-9000"));
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage(dec("0")).is_ok());
        assert!(validate_percentage(dec("100")).is_ok());
        assert!(validate_percentage(dec("-1")).is_err());
        assert!(validate_percentage(dec("100.01")).is_err());
    }
}
