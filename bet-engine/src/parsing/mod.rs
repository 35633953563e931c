pub mod normalizer;
pub mod same_game;

pub use normalizer::{
    normalize_bet, parse_bets_from_model_output, ParseLimits, ParsedBet, ParsedSlip, SlipRecord,
};
pub use same_game::{resolve_same_game_odds, CombinedOddsSource, GroupResolution};
