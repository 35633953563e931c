use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::BetStatus;

/// A field lifted out of untrusted JSON.
///
/// `Invalid` keeps the original value so the record still shows the caller what was sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawField<T> {
    #[default]
    Missing,
    Invalid(Value),
    Present(T),
}

impl<T> RawField<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            RawField::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawField::Missing)
    }
}

impl RawField<f64> {
    /// Numbers only; null/absent is `Missing`, anything else `Invalid`.
    pub fn number(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawField::Missing,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => RawField::Present(f),
                None => RawField::Invalid(Value::Number(n.clone())),
            },
            Some(other) => RawField::Invalid(other.clone()),
        }
    }
}

impl RawField<String> {
    pub fn text(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawField::Missing,
            Some(Value::String(s)) => RawField::Present(s.clone()),
            Some(other) => RawField::Invalid(other.clone()),
        }
    }

    /// Present and non-blank.
    pub fn non_empty(&self) -> Option<&str> {
        self.present()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

impl<T: Serialize> Serialize for RawField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawField::Missing => serializer.serialize_none(),
            RawField::Invalid(v) => v.serialize(serializer),
            RawField::Present(v) => v.serialize(serializer),
        }
    }
}

// ============================================================================
// DRAFT RECORDS
// ============================================================================

/// A bet as received from a client or a vision model, before validation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DraftBet {
    Single(SingleDraft),
    Parlay(ParlayDraft),
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleDraft {
    pub amount: RawField<f64>,
    pub date: RawField<String>,
    pub sport: RawField<String>,
    pub teams: RawField<String>,
    pub bet_type: RawField<String>,
    pub selection: RawField<String>,
    pub odds: RawField<f64>,
    pub status: BetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributed_to: Option<String>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_payout: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParlayDraft {
    pub amount: RawField<f64>,
    pub date: RawField<String>,
    pub legs: Vec<LegDraft>,
    pub status: BetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributed_to: Option<String>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_payout: Option<f64>,
    /// Parlay-level combined price hint, normalization only
    #[serde(skip)]
    pub combined_odds: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sport: RawField<String>,
    pub teams: RawField<String>,
    pub bet_type: RawField<String>,
    pub selection: RawField<String>,
    pub odds: RawField<f64>,
    pub status: BetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributed_to: Option<String>,
    /// Same game parlay price printed next to this leg, normalization only
    #[serde(skip)]
    pub combined_odds: Option<f64>,
}

/// Reasons a JSON entry cannot even be shaped into a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    NotAnObject,
    UnknownType(String),
    LegsNotAList,
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::NotAnObject => write!(f, "Bet entry must be a JSON object"),
            DraftError::UnknownType(_) => write!(f, "Bet 'type' must be 'single' or 'parlay'"),
            DraftError::LegsNotAList => write!(f, "Parlay 'legs' must be a list"),
        }
    }
}

impl DraftBet {
    /// Shape a raw JSON bet into a draft, copying only recognized fields.
    ///
    /// On `LegsNotAList` the returned partial parlay is still usable as a record.
    pub fn from_value(value: &Value) -> Result<DraftBet, (DraftError, Option<DraftBet>)> {
        let obj = value.as_object().ok_or((DraftError::NotAnObject, None))?;

        match declared_type(obj).as_str() {
            "single" => Ok(DraftBet::Single(SingleDraft::from_object(obj))),
            "parlay" => ParlayDraft::from_object(obj)
                .map(DraftBet::Parlay)
                .map_err(|partial| (DraftError::LegsNotAList, Some(DraftBet::Parlay(partial)))),
            other => Err((DraftError::UnknownType(other.to_string()), None)),
        }
    }

    pub fn set_potential_payout(&mut self, payout: Option<f64>) {
        match self {
            DraftBet::Single(s) => s.potential_payout = payout,
            DraftBet::Parlay(p) => p.potential_payout = payout,
        }
    }
}

/// Lowercased `type`, empty when absent or not a string.
pub fn declared_type(obj: &Map<String, Value>) -> String {
    obj.get("type")
        .and_then(Value::as_str)
        .map(|t| t.trim().to_lowercase())
        .unwrap_or_default()
}

impl SingleDraft {
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            amount: RawField::number(obj.get("amount")),
            date: RawField::text(obj.get("date")),
            sport: RawField::text(obj.get("sport")),
            teams: RawField::text(obj.get("teams")),
            bet_type: RawField::text(obj.get("betType")),
            selection: RawField::text(obj.get("selection")),
            odds: RawField::number(obj.get("odds")),
            status: status_or_pending(obj.get("status")),
            attributed_to: attribution(obj.get("attributedTo")),
            featured: obj.get("featured").and_then(Value::as_bool).unwrap_or(false),
            potential_payout: None,
        }
    }
}

impl ParlayDraft {
    /// Err carries a partial parlay (no legs) when `legs` is present but not an array.
    pub fn from_object(obj: &Map<String, Value>) -> Result<Self, Self> {
        let mut parlay = Self {
            amount: RawField::number(obj.get("amount")),
            date: RawField::text(obj.get("date")),
            legs: Vec::new(),
            status: status_or_pending(obj.get("status")),
            attributed_to: attribution(obj.get("attributedTo")),
            featured: obj.get("featured").and_then(Value::as_bool).unwrap_or(false),
            potential_payout: None,
            combined_odds: odds_hint(obj, &["combinedOdds", "sameGameParlayOdds", "parlayOdds"]),
        };

        match obj.get("legs") {
            None | Some(Value::Null) => Ok(parlay),
            Some(Value::Array(legs)) => {
                parlay.legs = legs.iter().map(LegDraft::from_value).collect();
                Ok(parlay)
            }
            Some(_) => Err(parlay),
        }
    }

    pub fn leg_odds(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.legs.iter().map(|leg| leg.odds.present().copied())
    }
}

impl LegDraft {
    /// Non-object legs become empty drafts and fail validation on their first field.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                id: Some(Uuid::new_v4().to_string()),
                ..Self::default()
            };
        };

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            id: Some(id),
            sport: RawField::text(obj.get("sport")),
            teams: RawField::text(obj.get("teams")),
            bet_type: RawField::text(obj.get("betType")),
            selection: RawField::text(obj.get("selection")),
            odds: RawField::number(obj.get("odds")),
            status: status_or_pending(obj.get("status")),
            attributed_to: attribution(obj.get("attributedTo")),
            combined_odds: odds_hint(obj, &["combinedOdds", "sameGameParlayOdds"]),
        }
    }

    /// Odds absent, null or zero.
    pub fn odds_missing(&self) -> bool {
        match self.odds {
            RawField::Missing => true,
            RawField::Present(o) => o == 0.0,
            RawField::Invalid(_) => false,
        }
    }

    /// Usable nonzero odds.
    pub fn known_odds(&self) -> Option<f64> {
        self.odds.present().copied().filter(|o| *o != 0.0)
    }
}

fn status_or_pending(value: Option<&Value>) -> BetStatus {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn attribution(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First nonzero numeric value among `keys`.
fn odds_hint(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_f64))
        .find(|odds| *odds != 0.0)
}
