pub mod odds;

pub use odds::{
    american_to_decimal, decimal_to_american, parlay_payout, payout_from_odds,
    reverse_equal_odds, round_cents,
};
