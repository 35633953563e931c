use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use bet_engine::{profile::FeatureFlags, Role, UserProfile};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::auth::CallerId;
use crate::responses::{ok, parse_body, ApiError, Envelope};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Target account; the caller's own profile when absent
    pub user_id: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub role: Option<Role>,
    pub feature_flags: Option<FeatureFlags>,
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
) -> Json<Envelope<UserProfile>> {
    ok(state.profile_for(&user_id))
}

/// Admin-only. A role change resets flags to that role's defaults before any explicit
/// flag overrides in the same request are merged in.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    body: Bytes,
) -> Result<Json<Envelope<UserProfile>>, ApiError> {
    if state.profile_for(&user_id).role != Role::Admin {
        return Err(ApiError::forbidden("Only admins can update profiles"));
    }

    let update: ProfileUpdate = parse_body(&body)?;
    let target = update
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(&user_id)
        .to_string();

    let now = Utc::now();
    let mut profile = state.profile_for(&target);
    if let Some(role) = update.role {
        profile.set_role(role, now);
    }
    if let Some(flags) = update.feature_flags {
        profile.set_flags(flags, now);
    }
    if let Some(aliases) = update.aliases {
        profile.set_aliases(aliases, now)?;
    }
    state.profiles.put(profile.clone());

    info!(admin = %user_id, target = %target, role = ?profile.role, "👤 Profile updated");
    Ok(ok(profile))
}
