use std::env;
use std::str::FromStr;

use bet_engine::parsing::normalizer::{DEFAULT_MAX_BETS, DEFAULT_MAX_LEGS_PER_PARLAY};
use bet_engine::ParseLimits;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub max_bets: usize,
    pub max_legs_per_parlay: usize,
    /// Accounts created with the admin role on first sight
    pub admin_user_ids: Vec<String>,
    /// `None` means permissive CORS
    pub cors_allow_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            max_bets: DEFAULT_MAX_BETS,
            max_legs_per_parlay: DEFAULT_MAX_LEGS_PER_PARLAY,
            admin_user_ids: Vec::new(),
            cors_allow_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("PORT", defaults.server_port),
            max_bets: parse_var("MAX_BETS", defaults.max_bets),
            max_legs_per_parlay: parse_var("MAX_LEGS_PER_PARLAY", defaults.max_legs_per_parlay),
            admin_user_ids: env::var("ADMIN_USER_IDS")
                .map(|v| split_ids(&v))
                .unwrap_or_default(),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_bets: self.max_bets,
            max_legs_per_parlay: self.max_legs_per_parlay,
        }
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_user_ids.iter().any(|id| id == user_id)
    }
}

fn parse_var<T: FromStr + std::fmt::Display + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ Invalid {} '{}', defaulting to {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
