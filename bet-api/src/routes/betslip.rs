use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use bet_engine::{parse_bets_from_model_output, profile::CAN_BETSLIP_IMPORT};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::AppState;
use crate::auth::CallerId;
use crate::responses::{ok, parse_body, ApiError, Envelope};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub model_output: String,
}

/// Turn a vision model's bet slip transcription into draft bets for review.
/// Nothing is stored; the client submits the reviewed drafts to `POST /bets`.
pub async fn process_betslip(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    body: Bytes,
) -> Result<Json<Envelope<Value>>, ApiError> {
    state.require_flag(&user_id, CAN_BETSLIP_IMPORT, "import bet slips")?;

    let request: ProcessRequest = parse_body(&body)?;
    if request.model_output.trim().is_empty() {
        return Err(ApiError::validation("modelOutput is required"));
    }

    let slip = match parse_bets_from_model_output(&request.model_output, &state.config.parse_limits()) {
        Ok(slip) => slip,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "❌ Could not parse bet slip");
            return Err(e.into());
        }
    };

    for (i, bet) in slip.bets.iter().enumerate() {
        for group in &bet.resolutions {
            info!(
                bet = i + 1,
                teams = %group.teams,
                source = ?group.source,
                combined_odds = group.combined_odds,
                leg_odds = ?group.leg_odds,
                updated = group.updated.len(),
                "🔗 Resolved same game parlay odds"
            );
        }
    }
    for warning in &slip.warnings {
        warn!(user_id = %user_id, "⚠️ {}", warning);
    }

    info!(
        user_id = %user_id,
        bet_count = slip.bets.len(),
        warning_count = slip.warnings.len(),
        "📸 Bet slip processed"
    );

    let mut data = json!({ "bets": slip.bets });
    if !slip.warnings.is_empty() {
        data["warnings"] = json!(slip.warnings);
    }
    Ok(ok(data))
}
