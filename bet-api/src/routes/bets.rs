use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use bet_engine::{
    apply_update, authorize_update, bet_permissions, can_view,
    profile::{CAN_CLEAR_WEEK, CAN_CREATE_BETS, CAN_DELETE_BETS},
    week::{is_date_in_week, week_range},
    Action, Bet, BetFilter, BetUpdate, DraftBet, UserProfile,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::auth::CallerId;
use crate::responses::{created, ok, parse_body, ApiError, Envelope};

/// Owners always see their own bets; anyone else needs an attribution grant.
fn visible_to(profile: &UserProfile, user_id: &str, bet: &Bet) -> bool {
    bet.user_id == user_id || can_view(profile, bet)
}

/// Visible, or covered by an edit or marking permission on the bet or one of its legs.
fn reachable(profile: &UserProfile, user_id: &str, bet: &Bet) -> bool {
    visible_to(profile, user_id, bet)
        || [Action::Edit, Action::MarkResult, Action::MarkFeatured]
            .into_iter()
            .any(|action| {
                let perms = bet_permissions(profile, action, bet);
                perms.bet || perms.legs.contains(&true)
            })
}

pub async fn list_bets(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    filter: Result<Query<BetFilter>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Bet>>>, ApiError> {
    let Query(filter) = filter.map_err(|e| ApiError::validation(e.body_text()))?;
    filter.check()?;

    let profile = state.profile_for(&user_id);
    let bets: Vec<Bet> = state
        .bets
        .all()
        .into_iter()
        .filter(|bet| filter.matches(bet) && visible_to(&profile, &user_id, bet))
        .collect();

    Ok(ok(bets))
}

pub async fn create_bet(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<Bet>>), ApiError> {
    let profile = state.require_flag(&user_id, CAN_CREATE_BETS, "create bets")?;

    let value: Value = parse_body(&body)?;
    let draft = DraftBet::from_value(&value).map_err(|(e, _)| ApiError::validation(e.to_string()))?;
    let bet = Bet::create(&user_id, draft, Utc::now())?;

    if bet.featured && !bet_permissions(&profile, Action::MarkFeatured, &bet).bet {
        return Err(ApiError::forbidden("Not permitted to change featured"));
    }

    info!(user_id = %user_id, bet_id = %bet.bet_id, bet_type = ?bet.bet_type(), "🎫 Bet created");
    state.bets.insert(bet.clone());
    Ok(created(bet))
}

pub async fn update_bet(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    Path(bet_id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<Bet>>, ApiError> {
    let update: BetUpdate = parse_body(&body)?;
    let profile = state.profile_for(&user_id);

    let updated = state
        .bets
        .modify(&bet_id, |bet: &mut Bet| -> Result<Bet, ApiError> {
            if !reachable(&profile, &user_id, bet) {
                return Err(ApiError::not_found("Bet not found"));
            }
            authorize_update(&profile, bet, &update)?;
            apply_update(bet, &update, Utc::now())?;
            Ok(bet.clone())
        })
        .ok_or_else(|| ApiError::not_found("Bet not found"))??;

    info!(user_id = %user_id, bet_id = %bet_id, "✏️ Bet updated");
    Ok(ok(updated))
}

pub async fn delete_bet(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    Path(bet_id): Path<String>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    let profile = state.require_flag(&user_id, CAN_DELETE_BETS, "delete bets")?;

    state
        .bets
        .get(&bet_id)
        .filter(|bet| visible_to(&profile, &user_id, bet))
        .and_then(|_| state.bets.remove(&bet_id))
        .ok_or_else(|| ApiError::not_found("Bet not found"))?;

    info!(user_id = %user_id, bet_id = %bet_id, "🗑️ Bet deleted");
    Ok(ok(json!({ "betId": bet_id, "deleted": true })))
}

/// Delete the caller's own bets dated in the current Monday-Sunday week.
pub async fn clear_week(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
) -> Result<Json<Envelope<Value>>, ApiError> {
    state.require_flag(&user_id, CAN_CLEAR_WEEK, "clear the week")?;

    let today = Utc::now().date_naive();
    let week = week_range(today);
    let deleted = state
        .bets
        .remove_where(|bet| bet.user_id == user_id && is_date_in_week(bet.date, today));

    info!(user_id = %user_id, deleted, week_start = %week.start, "🧹 Cleared week");
    Ok(ok(json!({
        "deletedCount": deleted,
        "weekStart": week.start,
        "weekEnd": week.end,
    })))
}
