//! # CLI Layer
//!
//! The only place that knows about terminals, exit codes and argument parsing.
//!
//! ## Behavior
//!
//! Each invocation opens the catalog file, refreshes the taxonomy once and
//! runs one command against it. Mutations always operate on a freshly loaded
//! tree, so the library's pre-flight checks (unknown ids, duplicate attribute
//! names) see the current state of the file.
//!
//! `products` runs in client mode by default: every product is loaded and the
//! filter engine pages locally. `--server` sends a query descriptor to the
//! store instead.
//!
//! ## Module Structure
//!
//! - `setup`: clap definitions
//! - `commands`: logging setup, runtime, dispatch
//! - `render`: text output and the console notifier

mod commands;
mod render;
pub mod setup;

pub use commands::run;
