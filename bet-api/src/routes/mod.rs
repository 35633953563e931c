pub mod bets;
pub mod betslip;
pub mod profile;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use bet_engine::{Role, UserProfile};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::Config;
use crate::responses::ApiError;
use crate::store::{BetStore, ProfileStore};

pub struct AppState {
    pub config: Config,
    pub bets: BetStore,
    pub profiles: ProfileStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let state = Self {
            config,
            bets: BetStore::default(),
            profiles: ProfileStore::default(),
        };
        for admin in &state.config.admin_user_ids {
            state.profiles.get_or_create(admin, Role::Admin);
        }
        state
    }

    /// The caller's profile, created with role defaults on first sight.
    pub fn profile_for(&self, user_id: &str) -> UserProfile {
        let role = if self.config.is_admin(user_id) { Role::Admin } else { Role::User };
        self.profiles.get_or_create(user_id, role)
    }

    pub fn require_flag(&self, user_id: &str, flag: &str, action: &str) -> Result<UserProfile, ApiError> {
        let profile = self.profile_for(user_id);
        if profile.has_flag(flag) {
            Ok(profile)
        } else {
            Err(ApiError::forbidden(format!("You do not have permission to {}", action)))
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_allow_origin.as_deref());

    Router::new()
        .route("/health", get(health_check))
        .route("/bets", get(bets::list_bets).post(bets::create_bet))
        .route("/bets/week/clear", delete(bets::clear_week))
        .route("/bets/:bet_id", put(bets::update_bet).delete(bets::delete_bet))
        .route("/betslip/process", post(betslip::process_betslip))
        .route("/users/profile", get(profile::get_profile).put(profile::update_profile))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        None => layer.allow_origin(Any),
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            warn!("⚠️ Invalid CORS_ALLOW_ORIGIN, allowing any origin");
            layer.allow_origin(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
