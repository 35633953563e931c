use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ValidationError;
use crate::types::{Bet, BetStatus, BetType};

/// Listing filter; every set field must match. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetFilter {
    pub status: Option<BetStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub bet_type: Option<BetType>,
}

impl BetFilter {
    pub fn check(&self) -> Result<(), ValidationError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                Err(ValidationError::new("startDate must not be after endDate"))
            }
            _ => Ok(()),
        }
    }

    pub fn matches(&self, bet: &Bet) -> bool {
        self.status.map_or(true, |s| bet.status == s)
            && self.bet_type.map_or(true, |t| bet.bet_type() == t)
            && self.start_date.map_or(true, |d| bet.date >= d)
            && self.end_date.map_or(true, |d| bet.date <= d)
    }
}
