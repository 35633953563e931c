//! Per-call permission evaluation for bets and legs.
//!
//! Every gated action follows the same three tiers: a global flag allows everything, an
//! "own" flag allows bets or legs whose `attributedTo` is one of the caller's aliases,
//! and without either flag nothing is allowed. Nothing here errors; a caller without a
//! profile simply has no flags.

use serde::Serialize;

use crate::profile::{
    UserProfile, CAN_EDIT_BETS, CAN_EDIT_BETS_OWN, CAN_MARK_FEATURED, CAN_MARK_FEATURED_OWN,
    CAN_MARK_RESULTS, CAN_MARK_RESULTS_OWN, CAN_VIEW_ALL_BETS, CAN_VIEW_BETS_OWN,
};
use crate::types::{Bet, Leg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub global_flag: &'static str,
    pub own_flag: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    View,
    Edit,
    MarkResult,
    MarkFeatured,
}

impl Action {
    pub const fn policy(self) -> Policy {
        match self {
            Action::View => Policy { global_flag: CAN_VIEW_ALL_BETS, own_flag: CAN_VIEW_BETS_OWN },
            Action::Edit => Policy { global_flag: CAN_EDIT_BETS, own_flag: CAN_EDIT_BETS_OWN },
            Action::MarkResult => Policy {
                global_flag: CAN_MARK_RESULTS,
                own_flag: CAN_MARK_RESULTS_OWN,
            },
            Action::MarkFeatured => Policy {
                global_flag: CAN_MARK_FEATURED,
                own_flag: CAN_MARK_FEATURED_OWN,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Own,
    Nothing,
}

pub fn scope(profile: &UserProfile, policy: Policy) -> Scope {
    if profile.has_flag(policy.global_flag) {
        Scope::All
    } else if profile.has_flag(policy.own_flag) {
        Scope::Own
    } else {
        Scope::Nothing
    }
}

/// Evaluate `policy` for one target, reading its attribution through `attribution`.
pub fn allows<T, F>(profile: &UserProfile, policy: Policy, target: &T, attribution: F) -> bool
where
    F: Fn(&T) -> Option<&str>,
{
    match scope(profile, policy) {
        Scope::All => true,
        Scope::Own => profile.answers_to(attribution(target)),
        Scope::Nothing => false,
    }
}

/// Decision for a bet's own fields plus one decision per parlay leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BetPermissions {
    pub bet: bool,
    pub legs: Vec<bool>,
}

impl BetPermissions {
    pub fn leg(&self, index: usize) -> bool {
        self.legs.get(index).copied().unwrap_or(false)
    }
}

/// Leg decisions use the leg's own attribution only; the parlay's attribution covers
/// parlay-level fields (amount, date, attribution, status).
pub fn bet_permissions(profile: &UserProfile, action: Action, bet: &Bet) -> BetPermissions {
    let policy = action.policy();
    BetPermissions {
        bet: allows(profile, policy, bet, |b: &Bet| b.attributed_to.as_deref()),
        legs: bet
            .legs()
            .iter()
            .map(|leg| allows(profile, policy, leg, |l: &Leg| l.attributed_to.as_deref()))
            .collect(),
    }
}

/// Visible when the caller sees everything, or owns the bet's or any leg's attribution.
pub fn can_view(profile: &UserProfile, bet: &Bet) -> bool {
    let policy = Action::View.policy();
    allows(profile, policy, bet, |b: &Bet| b.attributed_to.as_deref())
        || bet
            .legs()
            .iter()
            .any(|leg| allows(profile, policy, leg, |l: &Leg| l.attributed_to.as_deref()))
}

pub fn visible_bets<'a, I>(profile: &UserProfile, bets: I) -> Vec<&'a Bet>
where
    I: IntoIterator<Item = &'a Bet>,
{
    bets.into_iter().filter(|bet| can_view(profile, bet)).collect()
}
