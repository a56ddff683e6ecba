use super::StateStore;
use crate::error::{DkapiError, Result};
use crate::model::State;
use crate::parametrics::ParametricsCache;

/// In-memory storage for testing. Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    state: Option<State>,
    parametrics: ParametricsCache,
    reject_saves: bool,
    pub state_saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: State) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    /// Make every save fail, as a read-only disk would.
    pub fn rejecting_saves(mut self) -> Self {
        self.reject_saves = true;
        self
    }

    fn check_writable(&self) -> Result<()> {
        if self.reject_saves {
            return Err(DkapiError::Api("Store is read-only".to_string()));
        }
        Ok(())
    }

    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }
}

impl StateStore for InMemoryStore {
    fn load_state(&self) -> Result<State> {
        self.state
            .clone()
            .ok_or_else(|| DkapiError::Api("No state stored".to_string()))
    }

    fn save_state(&mut self, state: &State) -> Result<()> {
        self.check_writable()?;
        self.state = Some(state.clone());
        self.state_saves += 1;
        Ok(())
    }

    fn load_parametrics(&self) -> ParametricsCache {
        self.parametrics.clone()
    }

    fn save_parametrics(&mut self, cache: &ParametricsCache) -> Result<()> {
        self.check_writable()?;
        self.parametrics = cache.clone();
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::{AuthContext, State};
    use serde_json::Map;

    /// A fully configured state with no tokens yet.
    pub fn configured_state() -> State {
        State {
            client_id: "abc".to_string(),
            client_secret: "s3cret".to_string(),
            redirect_uri: "https://localhost".to_string(),
            login_name: "jane@example.com".to_string(),
            login_password: "hunter2".to_string(),
            debug_enabled: false,
            auth_context: AuthContext::default(),
            extra: Map::new(),
        }
    }

    /// A configured state holding a previous token pair.
    pub fn authorized_state() -> State {
        let mut state = configured_state();
        state.auth_context.access_token = Some("old-access".to_string());
        state.auth_context.refresh_token = Some("old-refresh".to_string());
        state
    }
}
