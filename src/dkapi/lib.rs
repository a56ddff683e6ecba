//! # dkapi Architecture
//!
//! dkapi is a command-line client for the Digi-Key part search API. It keeps
//! an OAuth token pair alive (including the browser-login emulation the
//! provider requires), runs part searches, and caches the parametric
//! attribute names it sees along the way.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, prints results, owns exit codes        │
//! │  - Maps the command line to an api::Operation               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Session: load, run, save only on success                 │
//! │  - Application context: transport, endpoints, documents     │
//! │  - Normalizes inputs, returns Result<CmdResult>             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Auth flow, refresh, search                               │
//! │  - Talks to the network only through the Transport trait    │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                              │
//!                  ▼                              ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Storage (store/)             │ │  HTTP (http/)             │
//! │  FileStore, InMemoryStore     │ │  ReqwestTransport, Mock   │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## State Lifecycle
//!
//! `api::Session` loads the state document once at start-up; it must carry
//! the five configuration keys plus a `CONTEXT` object. Commands mutate it in
//! memory. It is written back only when the command succeeded, so a failed token
//! exchange can never leave half-written credentials on disk.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade and application context
//! - [`commands`]: Business logic for each command
//! - [`store`]: Persistence of the state document and parametrics cache
//! - [`http`]: Transport trait, reqwest backend and test mock
//! - [`model`]: State and auth context types
//! - [`parametrics`]: Attribute-ID to name cache
//! - [`form`]: Login form action extraction
//! - [`output`]: JSON rendering of search results
//! - [`package_types`]: Mounting-type reference tables
//! - [`config`]: File locations, endpoints and timeouts
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod model;
pub mod output;
pub mod package_types;
pub mod parametrics;
pub mod store;
