use serde::Serialize;
use serde_json::{Map, Value};

use super::same_game::{resolve_same_game_odds, GroupResolution};
use crate::calculations::odds::{parlay_payout, payout_from_odds, round_cents};
use crate::error::{Error, Result};
use crate::types::{declared_type, DraftBet};
use crate::validation::validate_bet;

pub const DEFAULT_MAX_BETS: usize = 20;
pub const DEFAULT_MAX_LEGS_PER_PARLAY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_bets: usize,
    pub max_legs_per_parlay: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_bets: DEFAULT_MAX_BETS,
            max_legs_per_parlay: DEFAULT_MAX_LEGS_PER_PARLAY,
        }
    }
}

/// One entry of the model output after normalization.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SlipRecord {
    Bet(DraftBet),
    /// Entry that could not be shaped into a single or parlay, kept as sent
    Unrecognized(Map<String, Value>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedBet {
    #[serde(flatten)]
    pub record: SlipRecord,
    #[serde(rename = "_validationError", skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
    #[serde(skip)]
    pub resolutions: Vec<GroupResolution>,
}

impl ParsedBet {
    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedSlip {
    pub bets: Vec<ParsedBet>,
    pub warnings: Vec<String>,
}

/// Parse a vision model's bet slip output (`{"bets": [...]}`) into draft records.
///
/// Only an unusable batch is an error. Individual bets that fail normalization or
/// validation are kept with `_validationError` set and a matching warning.
pub fn parse_bets_from_model_output(model_output: &str, limits: &ParseLimits) -> Result<ParsedSlip> {
    let data: Value = serde_json::from_str(model_output)
        .map_err(|e| Error::MalformedOutput(format!("Model output is not valid JSON: {}", e)))?;

    let Value::Object(mut data) = data else {
        return Err(Error::MalformedOutput(
            "Model output must be a JSON object".to_string(),
        ));
    };

    let bets_raw = match data.remove("bets") {
        None | Some(Value::Null) => {
            return Err(Error::MalformedOutput(
                "Model output must contain a 'bets' array".to_string(),
            ));
        }
        Some(Value::Array(bets)) => bets,
        Some(_) => return Err(Error::MalformedOutput("'bets' must be a list".to_string())),
    };

    let mut slip = ParsedSlip::default();

    if bets_raw.len() > limits.max_bets {
        slip.warnings.push(format!(
            "Model returned {} bets, but only the first {} will be used.",
            bets_raw.len(),
            limits.max_bets
        ));
    }

    for (idx, mut raw_bet) in bets_raw.into_iter().take(limits.max_bets).enumerate() {
        let position = idx + 1;

        if let Some(warning) = truncate_legs(&mut raw_bet, limits.max_legs_per_parlay) {
            slip.warnings.push(format!("Bet {}: {}", position, warning));
        }

        let parsed = normalize_bet(&raw_bet);
        if let Some(error) = &parsed.validation_error {
            slip.warnings
                .push(format!("Bet {} has validation errors: {}", position, error));
        }
        slip.bets.push(parsed);
    }

    Ok(slip)
}

/// Normalize one raw bet: shape it, resolve same game parlay odds, validate.
pub fn normalize_bet(raw: &Value) -> ParsedBet {
    let mut draft = match DraftBet::from_value(raw) {
        Ok(draft) => draft,
        Err((error, Some(partial))) => {
            return ParsedBet {
                record: SlipRecord::Bet(partial),
                validation_error: Some(error.to_string()),
                resolutions: Vec::new(),
            };
        }
        Err((error, None)) => {
            return ParsedBet {
                record: SlipRecord::Unrecognized(unrecognized_record(raw)),
                validation_error: Some(error.to_string()),
                resolutions: Vec::new(),
            };
        }
    };

    let resolutions = match &mut draft {
        DraftBet::Parlay(parlay) => resolve_same_game_odds(&mut parlay.legs, parlay.combined_odds),
        DraftBet::Single(_) => Vec::new(),
    };

    let validation_error = match validate_bet(&mut draft) {
        Ok(()) => {
            let payout = draft_payout(&draft);
            draft.set_potential_payout(payout);
            None
        }
        Err(e) => Some(e.to_string()),
    };

    ParsedBet {
        record: SlipRecord::Bet(draft),
        validation_error,
        resolutions,
    }
}

fn draft_payout(draft: &DraftBet) -> Option<f64> {
    match draft {
        DraftBet::Single(single) => {
            let amount = *single.amount.present()?;
            let odds = *single.odds.present()?;
            payout_from_odds(amount, odds).ok().map(round_cents)
        }
        DraftBet::Parlay(parlay) => {
            let amount = *parlay.amount.present()?;
            parlay_payout(amount, parlay.leg_odds()).ok()
        }
    }
}

/// Cap a parlay's legs in place, returning the warning text if anything was dropped.
fn truncate_legs(raw: &mut Value, max_legs: usize) -> Option<String> {
    let obj = raw.as_object_mut()?;
    if declared_type(obj) != "parlay" {
        return None;
    }
    let legs = obj.get_mut("legs")?.as_array_mut()?;
    if legs.len() <= max_legs {
        return None;
    }

    let total = legs.len();
    legs.truncate(max_legs);
    Some(format!(
        "parlay has {} legs; only first {} will be used.",
        total, max_legs
    ))
}

/// Best-effort copy of an entry the normalizer could not shape.
fn unrecognized_record(raw: &Value) -> Map<String, Value> {
    let mut record = match raw {
        Value::Object(obj) => obj.clone(),
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("raw".to_string(), other.clone());
            wrapped
        }
    };

    record
        .entry("type")
        .or_insert_with(|| Value::String("unknown".to_string()));
    record
}
