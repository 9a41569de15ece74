#![deny(warnings)]

//! Game runtime: the command reducer, the weekly update and the production
//! phase state machine.
//!
//! All transitions are pure functions from one [`GameState`] snapshot to the
//! next. [`Session`] wraps a snapshot together with its tables and a seeded
//! random source for callers that want a single owner.

mod command;
mod events;
mod phase;
mod weekly;

pub use command::{apply_command, try_apply, Command, Rejection};
pub use weekly::process_weekly_update;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use studio_core::{GameState, GameTables, RandomSource};
use tracing::{info, warn};

/// Single owner of the live game state.
///
/// Every mutation goes through [`Session::dispatch`]; persistence stays an
/// explicit step for the caller.
pub struct Session<R = ChaCha8Rng> {
    state: GameState,
    tables: GameTables,
    rng: R,
}

impl Session<ChaCha8Rng> {
    /// New session on the splash screen with a seeded generator.
    pub fn new(tables: GameTables, seed: u64) -> Self {
        let state = GameState::initial(&tables);
        Self::with_rng(state, tables, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Continue from a loaded snapshot.
    pub fn resume(state: GameState, tables: GameTables, seed: u64) -> Self {
        info!(week = state.current_week, studio = %state.studio_name, "session resumed");
        Self::with_rng(state, tables, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Session<R> {
    pub fn with_rng(state: GameState, tables: GameTables, rng: R) -> Self {
        Self { state, tables, rng }
    }

    /// Apply a command. Returns `false` when it was rejected.
    pub fn dispatch(&mut self, command: Command) -> bool {
        self.try_dispatch(command).is_ok()
    }

    /// Apply a command, surfacing the rejection reason.
    pub fn try_dispatch(&mut self, command: Command) -> Result<(), Rejection> {
        let name = command.name();
        match try_apply(&self.state, command, &self.tables, &mut self.rng) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(reason) => {
                warn!(command = name, %reason, "command ignored");
                Err(reason)
            }
        }
    }

    /// Run `weeks` weekly updates back to back.
    pub fn advance_weeks(&mut self, weeks: u32) {
        for _ in 0..weeks {
            self.state = process_weekly_update(&self.state, &self.tables, &mut self.rng);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tables(&self) -> &GameTables {
        &self.tables
    }

    pub fn into_state(self) -> GameState {
        self.state
    }
}
