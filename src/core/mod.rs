//! # Core Application Logic
//!
//! Courier's business logic. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │ Vec<Effect>
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │      Synchronizer       │
//!                    │  HTTP, timers, session  │──► Action (back into update)
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`sync`]: Effect execution and the per-view polling timers
//! - [`session`]: The persisted session record
//! - [`config`]: `~/.courier/config.toml` loading and endpoint resolution
//! - [`attachment`]: Local image files as data URLs

pub mod action;
pub mod attachment;
pub mod config;
pub mod session;
pub mod state;
pub mod sync;

pub use action::{Action, Effect, update};
pub use state::App;
