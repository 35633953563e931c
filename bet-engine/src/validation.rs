//! Structural and semantic checks for draft bets.
//!
//! Checks run in a fixed order and stop at the first failure, so the message always names
//! the earliest offending field. The only mutation is assigning ids to parlay legs.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::{DraftBet, LegDraft, ParlayDraft, RawField, SingleDraft};

type Check = Result<(), ValidationError>;

pub fn validate_bet(bet: &mut DraftBet) -> Check {
    match bet {
        DraftBet::Single(single) => validate_single(single),
        DraftBet::Parlay(parlay) => validate_parlay(parlay),
    }
}

pub fn validate_single(bet: &SingleDraft) -> Check {
    check_amount(&bet.amount)?;
    check_date(&bet.date)?;
    check_text(&bet.sport, "sport", "Sport")?;
    check_text(&bet.teams, "teams", "Teams")?;
    check_text(&bet.bet_type, "betType", "Bet type")?;
    check_text(&bet.selection, "selection", "Selection")?;
    check_odds(&bet.odds)
}

pub fn validate_parlay(bet: &mut ParlayDraft) -> Check {
    for leg in bet.legs.iter_mut().filter(|leg| leg.id.is_none()) {
        leg.id = Some(Uuid::new_v4().to_string());
    }

    if bet.legs.len() < 2 {
        return Err(ValidationError::new("Parlay must have at least 2 legs"));
    }
    check_amount(&bet.amount)?;
    check_date(&bet.date)?;

    for (i, leg) in bet.legs.iter().enumerate() {
        validate_leg(leg).map_err(|e| e.in_leg(i + 1))?;
    }
    Ok(())
}

pub fn validate_leg(leg: &LegDraft) -> Check {
    check_text(&leg.sport, "sport", "Sport")?;
    check_text(&leg.teams, "teams", "Teams")?;
    check_text(&leg.selection, "selection", "Selection")?;
    check_odds(&leg.odds)
}

/// Strict `YYYY-MM-DD` that is also a real calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn check_amount(amount: &RawField<f64>) -> Check {
    match amount {
        RawField::Missing => Err(ValidationError::missing("amount")),
        RawField::Present(a) if *a > 0.0 => Ok(()),
        _ => Err(ValidationError::new("Amount must be a positive number")),
    }
}

fn check_date(date: &RawField<String>) -> Check {
    match date {
        RawField::Missing => Err(ValidationError::missing("date")),
        RawField::Present(d) if parse_date(d).is_some() => Ok(()),
        _ => Err(ValidationError::new("Date must be in YYYY-MM-DD format")),
    }
}

fn check_text(value: &RawField<String>, field: &str, label: &str) -> Check {
    if value.is_missing() {
        return Err(ValidationError::missing(field));
    }
    match value.non_empty() {
        Some(_) => Ok(()),
        None => Err(ValidationError::new(format!("{} must be a non-empty string", label))),
    }
}

fn check_odds(odds: &RawField<f64>) -> Check {
    match odds {
        RawField::Missing => Err(ValidationError::missing("odds")),
        RawField::Invalid(_) => Err(ValidationError::new("Odds must be a number")),
        RawField::Present(o) if *o == 0.0 => Err(ValidationError::new("Odds cannot be zero")),
        RawField::Present(_) => Ok(()),
    }
}
