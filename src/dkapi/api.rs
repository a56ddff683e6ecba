//! # API Facade
//!
//! [`DkapiApi`] is the application context: it owns the transport, the
//! endpoints and the two in-memory documents for the duration of one run,
//! and dispatches each operation to the command layer.
//!
//! The facade:
//! - **Normalizes inputs** (`-P` code or redirect URL, trimmed part numbers)
//! - **Dispatches** to `commands/*.rs`
//! - **Returns** `Result<CmdResult>`; it never prints, exits or touches disk
//!
//! Loading and saving the documents is [`Session`]'s job: it reads both
//! documents from a [`StateStore`], runs one [`Operation`] and writes them
//! back only when the operation succeeded.
//!
//! `DkapiApi<T: Transport>` is generic over the transport:
//! - Production: `DkapiApi<ReqwestTransport>`
//! - Testing: `DkapiApi<MockTransport>`

use crate::commands::{authorize, refresh, search, urls};
use crate::config::Endpoints;
use crate::error::{DkapiError, Result};
use crate::http::Transport;
use crate::model::State;
use crate::parametrics::ParametricsCache;
use crate::store::StateStore;

pub use crate::commands::refresh::RefreshPath;
pub use crate::commands::search::{SearchOptions, SearchOutcome};
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

/// One command-line operation with its inputs already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    AuthorizationUrl,
    TokenUrl { code: String },
    RequestCode,
    ExchangeCode { code: String },
    Authenticate,
    Refresh,
    PartSearch {
        part: String,
        quantity: u32,
        options: SearchOptions,
    },
    DebugNoop,
}

pub struct DkapiApi<T: Transport> {
    transport: T,
    endpoints: Endpoints,
    state: State,
    parametrics: ParametricsCache,
}

impl<T: Transport> DkapiApi<T> {
    pub fn new(
        transport: T,
        endpoints: Endpoints,
        state: State,
        parametrics: ParametricsCache,
    ) -> Self {
        Self {
            transport,
            endpoints,
            state,
            parametrics,
        }
    }

    pub fn execute(&mut self, operation: &Operation) -> Result<CmdResult> {
        match operation {
            Operation::AuthorizationUrl => self.authorization_url(),
            Operation::TokenUrl { code } => self.token_url(code),
            Operation::RequestCode => self.request_code(),
            Operation::ExchangeCode { code } => self.exchange_code(code),
            Operation::Authenticate => self.authenticate(),
            Operation::Refresh => self.refresh(),
            Operation::PartSearch {
                part,
                quantity,
                options,
            } => self.part_search(part, *quantity, options),
            Operation::DebugNoop => self.debug_noop(),
        }
    }

    /// NEW_AUTH_STEP1: the URL a browser would open to start authorization.
    pub fn authorization_url(&self) -> Result<CmdResult> {
        let url = urls::authorization_url(&self.endpoints, &self.state)?;
        Ok(CmdResult::default().with_output(url.as_str()))
    }

    /// NEW_AUTH_STEP2: the token URL for a code obtained out-of-band.
    pub fn token_url(&self, code_input: &str) -> Result<CmdResult> {
        let code = urls::normalize_code(code_input)?;
        let url = urls::token_url(&self.endpoints, &self.state, &code)?;
        Ok(CmdResult::default().with_output(url.as_str()))
    }

    /// PERFORM_AUTH_STEP1: log in and print the authorization code.
    pub fn request_code(&self) -> Result<CmdResult> {
        let code = authorize::request_code(&self.transport, &self.endpoints, &self.state)?;
        Ok(CmdResult::default().with_output(code))
    }

    /// PERFORM_AUTH_STEP2: exchange a code for tokens.
    pub fn exchange_code(&mut self, code_input: &str) -> Result<CmdResult> {
        let code = urls::normalize_code(code_input)?;
        authorize::run_with_code(&self.transport, &self.endpoints, &mut self.state, &code)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(
            "Stored new access and refresh tokens.",
        )))
    }

    /// AUTHENTICATE: the full new-authorization flow.
    pub fn authenticate(&mut self) -> Result<CmdResult> {
        authorize::run(&self.transport, &self.endpoints, &mut self.state)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(
            "Authorized; stored new access and refresh tokens.",
        )))
    }

    /// REFRESH_AUTH
    pub fn refresh(&mut self) -> Result<CmdResult> {
        let result = CmdResult::default();
        Ok(
            match refresh::run(&self.transport, &self.endpoints, &mut self.state)? {
                RefreshPath::Refreshed => {
                    result.with_message(CmdMessage::success("Access token refreshed."))
                }
                RefreshPath::Reauthorized => result
                    .with_message(CmdMessage::info(
                        "No refresh token was stored; ran a new authorization instead.",
                    ))
                    .with_message(CmdMessage::success(
                        "Authorized; stored new access and refresh tokens.",
                    )),
            },
        )
    }

    /// PART_SEARCH. Search failures become a `null` result rather than an
    /// error; only bad input is rejected.
    pub fn part_search(
        &mut self,
        part: &str,
        quantity: u32,
        options: &SearchOptions,
    ) -> Result<CmdResult> {
        let part = part.trim();
        if part.is_empty() {
            return Err(DkapiError::Api("Part number cannot be empty".to_string()));
        }
        if quantity == 0 {
            return Err(DkapiError::Api("Quantity must be at least 1".to_string()));
        }

        let outcome = search::run(
            &self.transport,
            &self.endpoints,
            &self.state,
            &mut self.parametrics,
            part,
            quantity,
            options,
        );
        search::render(outcome, options)
    }

    /// DEBUG_NOOP: load, do nothing, save.
    pub fn debug_noop(&self) -> Result<CmdResult> {
        Ok(CmdResult::default())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn parametrics(&self) -> &ParametricsCache {
        &self.parametrics
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Hand the documents back for persisting.
    pub fn into_parts(self) -> (State, ParametricsCache) {
        (self.state, self.parametrics)
    }
}

/// One run of the tool against a store: load, execute, save on success.
pub struct Session<S: StateStore> {
    store: S,
    state: State,
    parametrics: ParametricsCache,
}

impl<S: StateStore> Session<S> {
    /// Load both documents. A broken state file is fatal; a broken cache
    /// file just starts an empty cache.
    pub fn open(store: S) -> Result<Self> {
        let state = store.load_state()?;
        let parametrics = store.load_parametrics();
        Ok(Self {
            store,
            state,
            parametrics,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run `operation`. Nothing is written when it fails. A failed save
    /// does not fail the run; it is reported as a warning on the result.
    pub fn run<T: Transport>(
        &mut self,
        transport: T,
        endpoints: Endpoints,
        operation: &Operation,
    ) -> Result<CmdResult> {
        let mut api = DkapiApi::new(
            transport,
            endpoints,
            self.state.clone(),
            self.parametrics.clone(),
        );
        let mut result = api.execute(operation)?;
        let (state, parametrics) = api.into_parts();

        if let Err(e) = self.store.save_state(&state) {
            result.add_message(CmdMessage::warning(format!(
                "Failed to save state/config: {}",
                e
            )));
        }
        if let Err(e) = self.store.save_parametrics(&parametrics) {
            result.add_message(CmdMessage::warning(format!(
                "Failed to save parametrics cache: {}",
                e
            )));
        }

        self.state = state;
        self.parametrics = parametrics;
        Ok(result)
    }
}
