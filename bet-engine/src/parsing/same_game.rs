// Same game parlay odds reconstruction
//
// Slips often print one combined price for several legs on the same game. Vision models
// then either leave those legs without odds or copy the combined price onto each leg.

use serde::Serialize;

use crate::calculations::odds::reverse_equal_odds;
use crate::types::{LegDraft, RawField};

/// Where a group's combined price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinedOddsSource {
    /// `combinedOdds` / `sameGameParlayOdds` on one of the group's legs
    LegHint,
    /// Every leg carried the same price, taken to be the combined one
    EchoedOdds,
    /// Parlay-level hint, used when no leg in the group had odds
    ParlayHint,
}

/// What the resolver did for one same game group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResolution {
    pub teams: String,
    /// Leg indices in the group
    pub legs: Vec<usize>,
    pub source: CombinedOddsSource,
    pub combined_odds: f64,
    /// Per-leg odds written, `None` when the combined price could not be split
    pub leg_odds: Option<f64>,
    /// Leg indices that were overwritten
    pub updated: Vec<usize>,
}

/// Fill missing per-leg odds of same game groups from a combined price.
///
/// Legs are grouped by exact `teams` text. Odds math failures leave the group untouched;
/// validation reports whatever is still missing.
pub fn resolve_same_game_odds(
    legs: &mut [LegDraft],
    parlay_combined_odds: Option<f64>,
) -> Vec<GroupResolution> {
    let mut resolutions = Vec::new();

    for (teams, indices) in same_game_groups(legs) {
        if indices.len() < 2 {
            continue;
        }

        let missing: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| legs[i].odds_missing())
            .collect();
        let known: Vec<f64> = indices.iter().filter_map(|&i| legs[i].known_odds()).collect();

        let Some((combined, source)) =
            group_combined_odds(legs, &indices, &known, &missing, parlay_combined_odds)
        else {
            continue;
        };

        let targets = match source {
            CombinedOddsSource::EchoedOdds => indices.clone(),
            CombinedOddsSource::LegHint | CombinedOddsSource::ParlayHint => missing,
        };

        let leg_odds = reverse_equal_odds(combined, indices.len()).ok();
        let mut updated = Vec::new();
        if let Some(odds) = leg_odds {
            for &i in &targets {
                legs[i].odds = RawField::Present(odds);
                updated.push(i);
            }
        }

        resolutions.push(GroupResolution {
            teams,
            legs: indices,
            source,
            combined_odds: combined,
            leg_odds,
            updated,
        });
    }

    resolutions
}

/// Leg indices keyed by `teams`, in order of first appearance.
fn same_game_groups(legs: &[LegDraft]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

    for (i, leg) in legs.iter().enumerate() {
        let Some(teams) = leg.teams.present().filter(|t| !t.is_empty()) else {
            continue;
        };
        match groups.iter_mut().find(|(key, _)| key == teams) {
            Some((_, indices)) => indices.push(i),
            None => groups.push((teams.clone(), vec![i])),
        }
    }

    groups
}

fn group_combined_odds(
    legs: &[LegDraft],
    indices: &[usize],
    known: &[f64],
    missing: &[usize],
    parlay_combined_odds: Option<f64>,
) -> Option<(f64, CombinedOddsSource)> {
    if let Some(hint) = indices.iter().find_map(|&i| legs[i].combined_odds) {
        return Some((hint, CombinedOddsSource::LegHint));
    }

    if known.len() == indices.len() && known.iter().all(|&o| o == known[0]) {
        return Some((known[0], CombinedOddsSource::EchoedOdds));
    }

    // Never overwrite legs that already carry distinct prices of their own
    match parlay_combined_odds {
        Some(odds) if odds != 0.0 && missing.len() == indices.len() => {
            Some((odds, CombinedOddsSource::ParlayHint))
        }
        _ => None,
    }
}
