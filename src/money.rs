//! Monetary rounding and rate derivation helpers.
//!
//! All peso amounts in the engine are [`Decimal`] and are rounded to two
//! decimal places with round-half-up, only at line-item boundaries. Keeping
//! intermediate math unrounded means recomputing the same inputs can never
//! accumulate drift.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a peso amount to centavos using round-half-up.
///
/// # Example
///
/// ```
/// use payroll_engine::money::round_centavos;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("12.345").unwrap();
/// assert_eq!(round_centavos(amount), Decimal::from_str("12.35").unwrap());
/// let half = Decimal::from_str("0.125").unwrap();
/// assert_eq!(round_centavos(half), Decimal::from_str("0.13").unwrap());
/// ```
pub fn round_centavos(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Derives the per-minute pay rate from a monthly rate.
///
/// Daily rate = monthly / `monthly_divisor` (working days per month),
/// hourly rate = daily / 8, minute rate = hourly / 60. The result is left
/// unrounded; callers round the final line amount.
pub fn minute_rate(monthly_rate: Decimal, monthly_divisor: Decimal) -> Decimal {
    monthly_rate / monthly_divisor / Decimal::from(8) / Decimal::from(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_centavos(dec("1.005")), dec("1.01"));
        assert_eq!(round_centavos(dec("1.004")), dec("1.00"));
        assert_eq!(round_centavos(dec("2.675")), dec("2.68"));
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let amount = dec("123.456");
        let once = round_centavos(amount);
        assert_eq!(round_centavos(once), once);
    }

    #[test]
    fn test_minute_rate_from_monthly() {
        // 26,000/month at divisor 26 -> 1,000/day -> 125/hour -> 2.0833../min
        let rate = minute_rate(dec("26000"), dec("26"));
        assert_eq!(round_centavos(rate), dec("2.08"));
        // 480 minutes at that rate is one daily wage
        assert_eq!(round_centavos(rate * dec("480")), dec("1000.00"));
    }
}
