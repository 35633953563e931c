use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ValidationError;

pub type FeatureFlags = HashMap<String, bool>;

// Feature flag names as stored on user profiles
pub const CAN_CREATE_BETS: &str = "canCreateBets";
pub const CAN_DELETE_BETS: &str = "canDeleteBets";
pub const CAN_CLEAR_WEEK: &str = "canClearWeek";
pub const CAN_BETSLIP_IMPORT: &str = "canBetslipImport";
pub const CAN_VIEW_ALL_BETS: &str = "canViewAllBets";
pub const CAN_VIEW_BETS_OWN: &str = "canViewBetsOwn";
pub const CAN_EDIT_BETS: &str = "canEditBets";
pub const CAN_EDIT_BETS_OWN: &str = "canEditBetsOwn";
pub const CAN_MARK_RESULTS: &str = "canMarkResults";
pub const CAN_MARK_RESULTS_OWN: &str = "canMarkResultsOwn";
pub const CAN_MARK_FEATURED: &str = "canMarkFeatured";
pub const CAN_MARK_FEATURED_OWN: &str = "canMarkFeaturedOwn";

const ALL_FLAGS: [&str; 12] = [
    CAN_CREATE_BETS,
    CAN_DELETE_BETS,
    CAN_CLEAR_WEEK,
    CAN_BETSLIP_IMPORT,
    CAN_VIEW_ALL_BETS,
    CAN_VIEW_BETS_OWN,
    CAN_EDIT_BETS,
    CAN_EDIT_BETS_OWN,
    CAN_MARK_RESULTS,
    CAN_MARK_RESULTS_OWN,
    CAN_MARK_FEATURED,
    CAN_MARK_FEATURED_OWN,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Default flags for a role. Admins get everything; users may create bets and see
/// bets attributed to them.
pub fn default_feature_flags(role: Role) -> FeatureFlags {
    ALL_FLAGS
        .iter()
        .map(|flag| {
            let enabled = match role {
                Role::Admin => true,
                Role::User => matches!(*flag, CAN_CREATE_BETS | CAN_VIEW_BETS_OWN),
            };
            (flag.to_string(), enabled)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Names this user answers to in `attributedTo`
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub feature_flags: FeatureFlags,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user_id: &str, email: Option<String>, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            email,
            role,
            aliases: Vec::new(),
            feature_flags: default_feature_flags(role),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stand-in for a caller without a stored profile: no flags, no aliases.
    pub fn unprivileged(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: None,
            role: Role::User,
            aliases: Vec::new(),
            feature_flags: FeatureFlags::new(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.feature_flags.get(flag).copied().unwrap_or(false)
    }

    /// Case-sensitive exact membership, never fuzzy.
    pub fn answers_to(&self, attribution: Option<&str>) -> bool {
        attribution.is_some_and(|name| self.aliases.iter().any(|alias| alias == name))
    }

    /// Change role; flags reset to that role's defaults.
    pub fn set_role(&mut self, role: Role, now: DateTime<Utc>) {
        self.role = role;
        self.feature_flags = default_feature_flags(role);
        self.updated_at = now;
    }

    pub fn set_aliases(&mut self, aliases: Vec<String>, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if aliases.iter().any(|alias| alias.trim().is_empty()) {
            return Err(ValidationError::new("All aliases must be non-empty strings"));
        }
        self.aliases = aliases;
        self.updated_at = now;
        Ok(())
    }

    /// Merge explicit flag overrides over the current set.
    pub fn set_flags(&mut self, flags: FeatureFlags, now: DateTime<Utc>) {
        self.feature_flags.extend(flags);
        self.updated_at = now;
    }
}
