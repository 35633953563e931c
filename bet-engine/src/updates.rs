//! Partial updates to stored bets.
//!
//! Authorization and application are separate steps. `authorize_update` only looks at
//! fields whose value would actually change, so resubmitting a whole bet with one edit
//! is judged on that one edit.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::error::ValidationError;
use crate::permissions::{bet_permissions, Action, BetPermissions};
use crate::profile::UserProfile;
use crate::types::{Bet, BetKind, BetStatus, Leg, Selection};
use crate::validation::parse_date;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetUpdate {
    pub status: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    /// Blank clears the attribution
    pub attributed_to: Option<String>,
    pub featured: Option<bool>,
    pub sport: Option<String>,
    pub teams: Option<String>,
    pub bet_type: Option<String>,
    pub selection: Option<String>,
    pub odds: Option<f64>,
    pub legs: Option<Vec<LegUpdate>>,
}

/// Changes to one parlay leg, addressed by leg id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegUpdate {
    pub id: String,
    pub status: Option<String>,
    pub sport: Option<String>,
    pub teams: Option<String>,
    pub bet_type: Option<String>,
    pub selection: Option<String>,
    pub odds: Option<f64>,
    pub attributed_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateRejection {
    #[error("Not permitted to change {field}")]
    Forbidden { field: String },

    #[error("Leg not found: {0}")]
    UnknownLeg(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

type Outcome = Result<(), UpdateRejection>;

struct Grants {
    edit: BetPermissions,
    mark_result: BetPermissions,
    mark_featured: BetPermissions,
}

/// Reject the update if any field it changes is outside the caller's permissions.
pub fn authorize_update(profile: &UserProfile, bet: &Bet, update: &BetUpdate) -> Outcome {
    let grants = Grants {
        edit: bet_permissions(profile, Action::Edit, bet),
        mark_result: bet_permissions(profile, Action::MarkResult, bet),
        mark_featured: bet_permissions(profile, Action::MarkFeatured, bet),
    };

    if status_changes(update.status.as_deref(), bet.status) {
        require(grants.mark_result.bet, "status")?;
    }
    if update.featured.is_some_and(|f| f != bet.featured) {
        require(grants.mark_featured.bet, "featured")?;
    }

    let edits = [
        ("amount", update.amount.is_some_and(|a| a != bet.amount)),
        (
            "date",
            update
                .date
                .as_deref()
                .is_some_and(|d| parse_date(d) != Some(bet.date)),
        ),
        (
            "attributedTo",
            attribution_changes(update.attributed_to.as_deref(), bet.attributed_to.as_deref()),
        ),
    ];
    for (field, changed) in edits {
        if changed {
            require(grants.edit.bet, field)?;
        }
    }

    if let BetKind::Single(current) = &bet.kind {
        for field in changed_selection_fields(update, current) {
            require(grants.edit.bet, field)?;
        }
    }

    for leg_update in update.legs.iter().flatten() {
        let (index, leg) = find_leg(bet.legs(), &leg_update.id)?;
        let field = |name: &str| format!("legs[{}].{}", leg.id, name);

        if status_changes(leg_update.status.as_deref(), leg.status) {
            require(grants.mark_result.leg(index), &field("status"))?;
        }
        for name in changed_leg_fields(leg_update, leg) {
            require(grants.edit.leg(index), &field(name))?;
        }
    }

    Ok(())
}

/// Apply a validated update in place. On error the bet is left untouched, and an update
/// that changes nothing leaves `updatedAt` alone.
pub fn apply_update(bet: &mut Bet, update: &BetUpdate, now: DateTime<Utc>) -> Outcome {
    let mut next = bet.clone();

    if let Some(status) = &update.status {
        next.status = status.parse()?;
    }
    if let Some(amount) = update.amount {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ValidationError::new("Amount must be a positive number").into());
        }
        next.amount = amount;
    }
    if let Some(date) = &update.date {
        next.date = parse_date(date)
            .ok_or_else(|| ValidationError::new("Date must be in YYYY-MM-DD format"))?;
    }
    if let Some(attributed_to) = &update.attributed_to {
        next.attributed_to = blank_to_none(attributed_to);
    }
    if let Some(featured) = update.featured {
        next.featured = featured;
    }

    match &mut next.kind {
        BetKind::Single(selection) => {
            if update.legs.is_some() {
                return Err(ValidationError::new("Only parlays have legs").into());
            }
            apply_selection(selection, update)?;
        }
        BetKind::Parlay { legs } => {
            if let Some(field) = single_only_field(update) {
                return Err(ValidationError::new(format!(
                    "Field {} applies to single bets only; update parlay legs instead",
                    field
                ))
                .into());
            }
            for leg_update in update.legs.iter().flatten() {
                let position = legs
                    .iter()
                    .position(|leg| leg.id == leg_update.id)
                    .ok_or_else(|| UpdateRejection::UnknownLeg(leg_update.id.clone()))?;
                apply_leg(&mut legs[position], leg_update)
                    .map_err(|e| e.in_leg(position + 1))?;
            }
        }
    }

    next.potential_payout = next
        .compute_payout()
        .map_err(|e| ValidationError::new(e.to_string()))?;
    if next == *bet {
        return Ok(());
    }
    next.updated_at = now;
    *bet = next;
    Ok(())
}

fn require(granted: bool, field: &str) -> Outcome {
    if granted {
        Ok(())
    } else {
        Err(UpdateRejection::Forbidden { field: field.to_string() })
    }
}

fn find_leg<'a>(legs: &'a [Leg], id: &str) -> Result<(usize, &'a Leg), UpdateRejection> {
    legs.iter()
        .enumerate()
        .find(|(_, leg)| leg.id == id)
        .ok_or_else(|| UpdateRejection::UnknownLeg(id.to_string()))
}

// An unparseable status counts as a change so it is checked, then rejected on apply.
fn status_changes(requested: Option<&str>, current: BetStatus) -> bool {
    requested.is_some_and(|s| s.parse::<BetStatus>().ok() != Some(current))
}

fn attribution_changes(requested: Option<&str>, current: Option<&str>) -> bool {
    requested.is_some_and(|a| blank_to_none(a).as_deref() != current)
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn text_changes(requested: &Option<String>, current: &str) -> bool {
    requested.as_deref().is_some_and(|v| v != current)
}

fn changed_selection_fields(update: &BetUpdate, current: &Selection) -> Vec<&'static str> {
    [
        ("sport", text_changes(&update.sport, &current.sport)),
        ("teams", text_changes(&update.teams, &current.teams)),
        ("betType", text_changes(&update.bet_type, &current.bet_type)),
        ("selection", text_changes(&update.selection, &current.selection)),
        ("odds", update.odds.is_some_and(|o| o != current.odds)),
    ]
    .into_iter()
    .filter_map(|(field, changed)| changed.then_some(field))
    .collect()
}

fn changed_leg_fields(update: &LegUpdate, current: &Leg) -> Vec<&'static str> {
    [
        ("sport", text_changes(&update.sport, &current.sport)),
        ("teams", text_changes(&update.teams, &current.teams)),
        (
            "betType",
            update
                .bet_type
                .as_deref()
                .is_some_and(|v| Some(v) != current.bet_type.as_deref()),
        ),
        ("selection", text_changes(&update.selection, &current.selection)),
        ("odds", update.odds.is_some_and(|o| o != current.odds)),
        (
            "attributedTo",
            attribution_changes(update.attributed_to.as_deref(), current.attributed_to.as_deref()),
        ),
    ]
    .into_iter()
    .filter_map(|(field, changed)| changed.then_some(field))
    .collect()
}

fn single_only_field(update: &BetUpdate) -> Option<&'static str> {
    [
        ("sport", update.sport.is_some()),
        ("teams", update.teams.is_some()),
        ("betType", update.bet_type.is_some()),
        ("selection", update.selection.is_some()),
        ("odds", update.odds.is_some()),
    ]
    .into_iter()
    .find_map(|(field, set)| set.then_some(field))
}

fn apply_selection(selection: &mut Selection, update: &BetUpdate) -> Result<(), ValidationError> {
    set_text(&mut selection.sport, &update.sport, "Sport")?;
    set_text(&mut selection.teams, &update.teams, "Teams")?;
    set_text(&mut selection.bet_type, &update.bet_type, "Bet type")?;
    set_text(&mut selection.selection, &update.selection, "Selection")?;
    if let Some(odds) = update.odds {
        selection.odds = checked_odds(odds)?;
    }
    Ok(())
}

fn apply_leg(leg: &mut Leg, update: &LegUpdate) -> Result<(), ValidationError> {
    if let Some(status) = &update.status {
        leg.status = status.parse()?;
    }
    set_text(&mut leg.sport, &update.sport, "Sport")?;
    set_text(&mut leg.teams, &update.teams, "Teams")?;
    if let Some(bet_type) = &update.bet_type {
        leg.bet_type = blank_to_none(bet_type);
    }
    set_text(&mut leg.selection, &update.selection, "Selection")?;
    if let Some(odds) = update.odds {
        leg.odds = checked_odds(odds)?;
    }
    if let Some(attributed_to) = &update.attributed_to {
        leg.attributed_to = blank_to_none(attributed_to);
    }
    Ok(())
}

fn set_text(target: &mut String, value: &Option<String>, label: &str) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if value.trim().is_empty() {
            return Err(ValidationError::new(format!("{} must be a non-empty string", label)));
        }
        *target = value.clone();
    }
    Ok(())
}

fn checked_odds(odds: f64) -> Result<f64, ValidationError> {
    if !odds.is_finite() {
        Err(ValidationError::new("Odds must be a number"))
    } else if odds == 0.0 {
        Err(ValidationError::new("Odds cannot be zero"))
    } else {
        Ok(odds)
    }
}
