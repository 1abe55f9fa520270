use rust_decimal::{Decimal, RoundingStrategy};

/// Days a monthly budget is spread over.
pub const DAYS_PER_MONTH: u32 = 30;

/// Smallest daily budget the platform accepts, one cent.
pub const MIN_DAILY_BUDGET: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Monthly budget divided by 30 and rounded half-up to two decimal places.
///
/// A positive monthly budget small enough to round to zero is raised to
/// [`MIN_DAILY_BUDGET`] so the daily figure stays positive.
pub fn daily_budget(monthly: Decimal) -> Decimal {
    let daily = (monthly / Decimal::from(DAYS_PER_MONTH))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if monthly > Decimal::ZERO && daily < MIN_DAILY_BUDGET {
        MIN_DAILY_BUDGET
    } else {
        daily
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_even_division() {
        assert_eq!(daily_budget(dec("600")), dec("20.00"));
        assert_eq!(daily_budget(dec("3000")), dec("100"));
    }

    #[test]
    fn test_rounds_to_cents() {
        // 1000 / 30 = 33.333...
        assert_eq!(daily_budget(dec("1000")), dec("33.33"));
        // 50 / 30 = 1.666...
        assert_eq!(daily_budget(dec("50")), dec("1.67"));
    }

    #[test]
    fn test_midpoint_rounds_up() {
        // 0.45 / 30 = 0.015
        assert_eq!(daily_budget(dec("0.45")), dec("0.02"));
        // 10.35 / 30 = 0.345
        assert_eq!(daily_budget(dec("10.35")), dec("0.35"));
    }

    #[test]
    fn test_tiny_budget_stays_positive() {
        assert_eq!(daily_budget(dec("0.10")), MIN_DAILY_BUDGET);
        assert!(daily_budget(dec("0.0001")) > Decimal::ZERO);
    }

    #[test]
    fn test_scale_is_at_most_two() {
        for monthly in ["1", "7", "99.99", "123456.78"] {
            assert!(daily_budget(dec(monthly)).scale() <= 2);
        }
    }
}
