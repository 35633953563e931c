use bet_engine::{Bet, Role, UserProfile};
use chrono::Utc;
use dashmap::DashMap;

/// In-memory bet storage keyed by bet id.
#[derive(Default)]
pub struct BetStore {
    bets: DashMap<String, Bet>,
}

impl BetStore {
    pub fn insert(&self, bet: Bet) {
        self.bets.insert(bet.bet_id.clone(), bet);
    }

    pub fn get(&self, bet_id: &str) -> Option<Bet> {
        self.bets.get(bet_id).map(|entry| entry.value().clone())
    }

    /// Run `f` against the stored bet while holding its entry lock.
    pub fn modify<T, E, F>(&self, bet_id: &str, f: F) -> Option<Result<T, E>>
    where
        F: FnOnce(&mut Bet) -> Result<T, E>,
    {
        self.bets.get_mut(bet_id).map(|mut entry| f(entry.value_mut()))
    }

    pub fn remove(&self, bet_id: &str) -> Option<Bet> {
        self.bets.remove(bet_id).map(|(_, bet)| bet)
    }

    /// Newest first: by bet date, then creation time.
    pub fn all(&self) -> Vec<Bet> {
        let mut bets: Vec<Bet> = self.bets.iter().map(|entry| entry.value().clone()).collect();
        bets.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        bets
    }

    /// Remove every bet matching `predicate`, returning how many were removed.
    pub fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Bet) -> bool,
    {
        let ids: Vec<String> = self
            .bets
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.key().clone())
            .collect();
        ids.iter().filter(|id| self.bets.remove(*id).is_some()).count()
    }
}

#[derive(Default)]
pub struct ProfileStore {
    profiles: DashMap<String, UserProfile>,
}

impl ProfileStore {
    /// Existing profile, or a new one with `role` defaults.
    pub fn get_or_create(&self, user_id: &str, role: Role) -> UserProfile {
        self.profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id, None, role, Utc::now()))
            .value()
            .clone()
    }

    pub fn put(&self, profile: UserProfile) {
        self.profiles.insert(profile.user_id.clone(), profile);
    }
}
