//! Bet tracking core: odds math, bet validation, bet slip normalization, same game
//! parlay odds reconstruction and per-call permission checks.
//!
//! Everything here is synchronous and side-effect free apart from id generation.

pub mod calculations;
pub mod error;
pub mod filters;
pub mod parsing;
pub mod permissions;
pub mod profile;
pub mod types;
pub mod updates;
pub mod validation;
pub mod week;

pub use error::{Error, Result, ValidationError};
pub use filters::BetFilter;
pub use parsing::{parse_bets_from_model_output, ParseLimits, ParsedBet, ParsedSlip};
pub use permissions::{bet_permissions, can_view, visible_bets, Action, BetPermissions};
pub use profile::{Role, UserProfile};
pub use types::{Bet, BetKind, BetStatus, BetType, DraftBet, Leg};
pub use updates::{apply_update, authorize_update, BetUpdate, LegUpdate, UpdateRejection};
