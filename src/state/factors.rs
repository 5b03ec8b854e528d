// state/factors.rs
// In-memory store of confirmed factors, keyed by account.

use std::sync::PoisonError;

use crate::factor::ConfirmedFactor;

use super::AppState;

/// Stores a confirmed factor, replacing any previous one for the account.
/// `accepted_counter` is the step its confirming code matched, which is
/// marked as used.
pub fn save_factor(state: &AppState, factor: ConfirmedFactor, accepted_counter: u64) {
    state.guard.try_consume(factor.id, accepted_counter);
    let replaced = state
        .factors
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(factor.account.clone(), factor);
    if let Some(old) = replaced {
        state.guard.forget(old.id);
        tracing::info!(account = %old.account, old_factor = %old.id, "factor replaced");
    }
}

pub fn find_factor(state: &AppState, account: &str) -> Option<ConfirmedFactor> {
    state
        .factors
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(account)
        .cloned()
}

pub fn delete_factor(state: &AppState, account: &str) -> bool {
    let removed = state
        .factors
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(account);
    match removed {
        Some(old) => {
            state.guard.forget(old.id);
            true
        }
        None => false,
    }
}
