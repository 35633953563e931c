// American/decimal odds conversion and payout utilities

use crate::error::{Error, Result};

/// Convert American odds to decimal odds.
/// Formula: +O -> O/100 + 1, -O -> 100/|O| + 1
pub fn american_to_decimal(odds: f64) -> Result<f64> {
    if odds == 0.0 {
        return Err(Error::InvalidOdds("Odds cannot be zero".to_string()));
    }

    if odds > 0.0 {
        Ok(odds / 100.0 + 1.0)
    } else {
        Ok(100.0 / odds.abs() + 1.0)
    }
}

/// Convert decimal odds back to American odds.
/// Decimal 2.0 and above maps to positive American odds, below to negative.
pub fn decimal_to_american(decimal_odds: f64) -> Result<f64> {
    if decimal_odds <= 1.0 {
        return Err(Error::InvalidOdds(format!(
            "Decimal odds must be greater than 1.0, got {}",
            decimal_odds
        )));
    }

    if decimal_odds >= 2.0 {
        Ok((decimal_odds - 1.0) * 100.0)
    } else {
        Ok(-100.0 / (decimal_odds - 1.0))
    }
}

/// Potential payout (stake included) of a single bet. Not rounded.
pub fn payout_from_odds(amount: f64, odds: f64) -> Result<f64> {
    Ok(amount * american_to_decimal(odds)?)
}

/// Potential payout of a parlay: stake times the product of every leg's decimal odds,
/// rounded to cents.
///
/// Returns `InvalidParlay` if:
/// - Fewer than 2 legs
/// - Any leg has missing or zero odds
pub fn parlay_payout<I>(amount: f64, leg_odds: I) -> Result<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let leg_odds: Vec<Option<f64>> = leg_odds.into_iter().collect();
    if leg_odds.len() < 2 {
        return Err(Error::InvalidParlay("Parlay must have at least 2 legs".to_string()));
    }

    let mut combined_decimal = 1.0;
    for (i, odds) in leg_odds.iter().enumerate() {
        let odds = match odds {
            Some(o) if *o != 0.0 => *o,
            _ => {
                return Err(Error::InvalidParlay(format!("Leg {} must have odds", i + 1)));
            }
        };
        combined_decimal *= american_to_decimal(odds)?;
    }

    Ok(round_cents(amount * combined_decimal))
}

/// Reverse calculate per-leg odds from a combined price, assuming every leg is priced equally.
/// For N legs with combined decimal D and per-leg decimal O: D = O^N, so O = D^(1/N).
///
/// This is an approximation: a book's real same game parlay legs rarely share one price,
/// but only the combined price is visible on the slip.
pub fn reverse_equal_odds(combined_odds: f64, num_legs: usize) -> Result<f64> {
    if combined_odds == 0.0 {
        return Err(Error::InvalidOdds("Combined odds cannot be zero".to_string()));
    }
    if num_legs < 2 {
        return Err(Error::InvalidParlay(
            "Number of legs must be at least 2".to_string(),
        ));
    }

    let combined_decimal = american_to_decimal(combined_odds)?;
    let individual_decimal = combined_decimal.powf(1.0 / num_legs as f64);
    let individual_american = decimal_to_american(individual_decimal)?;

    Ok(round_cents(individual_american))
}

/// Round to 2 decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn converts_american_to_decimal() {
        assert!(approx(american_to_decimal(200.0).unwrap(), 3.0, 1e-12));
        assert!(approx(american_to_decimal(-110.0).unwrap(), 1.909_090_909, 1e-6));
        assert!(approx(american_to_decimal(-100.0).unwrap(), 2.0, 1e-12));
    }

    #[test]
    fn zero_american_odds_are_invalid() {
        assert!(matches!(american_to_decimal(0.0), Err(Error::InvalidOdds(_))));
        assert!(matches!(payout_from_odds(10.0, 0.0), Err(Error::InvalidOdds(_))));
    }

    #[test]
    fn decimal_at_or_below_one_is_invalid() {
        assert!(matches!(decimal_to_american(1.0), Err(Error::InvalidOdds(_))));
        assert!(matches!(decimal_to_american(0.5), Err(Error::InvalidOdds(_))));
    }

    #[test]
    fn american_round_trips_through_decimal() {
        for odds in [-1000.0, -250.0, -150.0, -110.0, -101.0, 101.0, 100.0, 150.0, 450.0, 2500.0] {
            let back = decimal_to_american(american_to_decimal(odds).unwrap()).unwrap();
            assert!(approx(back, odds, 1e-9), "{} came back as {}", odds, back);
        }
    }

    #[test]
    fn even_money_comes_back_positive() {
        assert_eq!(decimal_to_american(2.0).unwrap(), 100.0);
    }

    #[test]
    fn single_payout_includes_stake() {
        assert!(approx(payout_from_odds(100.0, 150.0).unwrap(), 250.0, 1e-9));
        assert!(approx(payout_from_odds(110.0, -110.0).unwrap(), 210.0, 1e-9));
    }

    #[test]
    fn single_payout_grows_with_amount_and_price() {
        let mut last = 0.0;
        for odds in [100.0, 120.0, 200.0, 500.0] {
            let payout = payout_from_odds(50.0, odds).unwrap();
            assert!(payout > last);
            last = payout;
        }

        let mut last = 0.0;
        for amount in [1.0, 5.0, 25.0, 100.0] {
            let payout = payout_from_odds(amount, -150.0).unwrap();
            assert!(payout > last);
            last = payout;
        }
    }

    #[test]
    fn parlay_payout_multiplies_legs() {
        let payout = parlay_payout(25.0, [Some(-110.0), Some(-120.0)]).unwrap();
        let expected = round_cents(25.0 * (100.0 / 110.0 + 1.0) * (100.0 / 120.0 + 1.0));
        assert_eq!(payout, expected);
        assert!(approx(payout, 87.5, 0.01));
    }

    #[test]
    fn parlay_payout_rejects_short_or_unpriced_parlays() {
        assert!(matches!(
            parlay_payout(10.0, [Some(-110.0)]),
            Err(Error::InvalidParlay(_))
        ));
        assert!(matches!(
            parlay_payout(10.0, [Some(-110.0), None]),
            Err(Error::InvalidParlay(_))
        ));
        assert!(matches!(
            parlay_payout(10.0, [Some(0.0), Some(150.0)]),
            Err(Error::InvalidParlay(_))
        ));
    }

    #[test]
    fn reverse_equal_odds_reproduces_combined_price() {
        for (combined, legs) in [(450.0, 2), (-150.0, 2), (1200.0, 3), (250.0, 4)] {
            let per_leg = reverse_equal_odds(combined, legs).unwrap();
            let leg_decimal = american_to_decimal(per_leg).unwrap();
            let product = leg_decimal.powi(legs as i32);
            let expected = american_to_decimal(combined).unwrap();
            assert!(
                approx(product, expected, 5e-3),
                "{} over {} legs gave {}",
                combined,
                legs,
                per_leg
            );
        }
    }

    #[test]
    fn reverse_equal_odds_rounds_to_cents() {
        let per_leg = reverse_equal_odds(-150.0, 2).unwrap();
        assert_eq!(per_leg, round_cents(per_leg));
        assert!(per_leg < -150.0);
    }

    #[test]
    fn reverse_equal_odds_rejects_bad_input() {
        assert!(reverse_equal_odds(0.0, 2).is_err());
        assert!(reverse_equal_odds(300.0, 1).is_err());
    }
}
