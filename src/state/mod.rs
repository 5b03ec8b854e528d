// state module: AppState, initialization, and re-exports of submodules.

use std::{collections::HashMap, sync::RwLock};

use crate::config::Config;
use crate::factor::{ConfirmedFactor, FactorRegistry};

mod factors;
mod guard;

pub use factors::*;
pub use guard::VerificationGuard;

pub struct AppState {
    pub config: Config,
    pub registry: FactorRegistry,
    pub factors: RwLock<HashMap<String, ConfirmedFactor>>,
    pub guard: VerificationGuard,
}

pub fn init_state(config: Config) -> AppState {
    let guard = VerificationGuard::new(config.max_attempts, config.attempt_window);
    AppState {
        registry: FactorRegistry::with_defaults(),
        factors: RwLock::new(HashMap::new()),
        guard,
        config,
    }
}
