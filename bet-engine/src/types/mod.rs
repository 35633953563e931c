mod draft;

pub use draft::{declared_type, DraftBet, DraftError, LegDraft, ParlayDraft, RawField, SingleDraft};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::calculations::odds::{parlay_payout, payout_from_odds, round_cents};
use crate::error::{Error, Result, ValidationError};
use crate::validation::{parse_date, validate_bet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    #[default]
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
        }
    }
}

impl FromStr for BetStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BetStatus::Pending),
            "won" => Ok(BetStatus::Won),
            "lost" => Ok(BetStatus::Lost),
            _ => Err(ValidationError::new(
                "Invalid status. Must be one of: pending, won, lost",
            )),
        }
    }
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Single,
    Parlay,
}

/// A stored wager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub bet_id: String,
    /// Owning account, distinct from `attributed_to`
    pub user_id: String,
    pub status: BetStatus,
    pub date: NaiveDate,
    pub amount: f64,
    pub potential_payout: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributed_to: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(flatten)]
    pub kind: BetKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BetKind {
    Single(Selection),
    Parlay { legs: Vec<Leg> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub sport: String,
    pub teams: String,
    pub bet_type: String,
    pub selection: String,
    pub odds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub id: String,
    pub sport: String,
    pub teams: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_type: Option<String>,
    pub selection: String,
    pub odds: f64,
    #[serde(default)]
    pub status: BetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributed_to: Option<String>,
}

impl Bet {
    /// Validate a draft and turn it into a stored bet owned by `user_id`.
    /// Payout is always computed here; any client-supplied value is ignored.
    pub fn create(user_id: &str, mut draft: DraftBet, now: DateTime<Utc>) -> Result<Bet> {
        validate_bet(&mut draft)?;

        let (status, date, amount, attributed_to, featured, kind) = match draft {
            DraftBet::Single(single) => {
                let selection = Selection {
                    sport: required_text(single.sport)?,
                    teams: required_text(single.teams)?,
                    bet_type: required_text(single.bet_type)?,
                    selection: required_text(single.selection)?,
                    odds: required_number(single.odds)?,
                };
                (
                    single.status,
                    required_date(&single.date)?,
                    required_number(single.amount)?,
                    single.attributed_to,
                    single.featured,
                    BetKind::Single(selection),
                )
            }
            DraftBet::Parlay(parlay) => {
                let legs = parlay
                    .legs
                    .into_iter()
                    .map(Leg::try_from)
                    .collect::<Result<Vec<_>>>()?;
                (
                    parlay.status,
                    required_date(&parlay.date)?,
                    required_number(parlay.amount)?,
                    parlay.attributed_to,
                    parlay.featured,
                    BetKind::Parlay { legs },
                )
            }
        };

        let mut bet = Bet {
            bet_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            status,
            date,
            amount,
            potential_payout: 0.0,
            created_at: now,
            updated_at: now,
            attributed_to,
            featured,
            kind,
        };
        bet.potential_payout = bet.compute_payout()?;
        Ok(bet)
    }

    /// Payout from current amount and odds, rounded to cents.
    pub fn compute_payout(&self) -> Result<f64> {
        match &self.kind {
            BetKind::Single(selection) => {
                Ok(round_cents(payout_from_odds(self.amount, selection.odds)?))
            }
            BetKind::Parlay { legs } => {
                parlay_payout(self.amount, legs.iter().map(|leg| Some(leg.odds)))
            }
        }
    }

    pub fn bet_type(&self) -> BetType {
        match self.kind {
            BetKind::Single(_) => BetType::Single,
            BetKind::Parlay { .. } => BetType::Parlay,
        }
    }

    /// Legs of a parlay; empty for singles.
    pub fn legs(&self) -> &[Leg] {
        match &self.kind {
            BetKind::Single(_) => &[],
            BetKind::Parlay { legs } => legs,
        }
    }
}

impl TryFrom<LegDraft> for Leg {
    type Error = Error;

    fn try_from(draft: LegDraft) -> Result<Leg> {
        Ok(Leg {
            id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            sport: required_text(draft.sport)?,
            teams: required_text(draft.teams)?,
            bet_type: draft.bet_type.present().cloned(),
            selection: required_text(draft.selection)?,
            odds: required_number(draft.odds)?,
            status: draft.status,
            attributed_to: draft.attributed_to,
        })
    }
}

// Validation has already run; these only guard the conversion itself.

fn required_text(field: RawField<String>) -> Result<String> {
    match field {
        RawField::Present(s) => Ok(s),
        _ => Err(ValidationError::new("Expected a validated text field").into()),
    }
}

fn required_number(field: RawField<f64>) -> Result<f64> {
    match field {
        RawField::Present(n) => Ok(n),
        _ => Err(ValidationError::new("Expected a validated number").into()),
    }
}

fn required_date(field: &RawField<String>) -> Result<NaiveDate> {
    field
        .present()
        .and_then(|s| parse_date(s))
        .ok_or_else(|| ValidationError::new("Date must be in YYYY-MM-DD format").into())
}
