//! # Storage Layer
//!
//! Two documents live on disk per user: the state file (credentials,
//! configuration and token context) and the parametrics cache. The
//! [`StateStore`] trait hides where they live so the command layer and its
//! tests never touch the filesystem.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage in the user's home directory
//!   - `~/.digi-key_api_state.json`
//!   - `~/.digi-key_api_parametrics.json`
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!
//! ## Failure Policy
//!
//! Loading the state is strict: a missing file, bad JSON or a missing required
//! key is an error the caller must treat as fatal. Loading the cache is
//! lenient and falls back to an empty cache. Saving never validates.

use crate::error::Result;
use crate::model::State;
use crate::parametrics::ParametricsCache;

pub mod fs;
pub mod memory;

pub trait StateStore {
    /// Load and validate the state document.
    fn load_state(&self) -> Result<State>;

    /// Persist the state document as-is.
    fn save_state(&mut self, state: &State) -> Result<()>;

    /// Load the parametrics cache, or an empty one if it cannot be read.
    fn load_parametrics(&self) -> ParametricsCache;

    /// Persist the parametrics cache.
    fn save_parametrics(&mut self, cache: &ParametricsCache) -> Result<()>;
}
