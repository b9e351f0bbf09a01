//! # Vitrine CLI
//!
//! A back-office client for the `vitrineapp` catalog library. The binary is
//! thin: argument parsing, dispatch and rendering live in `src/cli/`, this file
//! only runs it and turns the outcome into an exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (src/cli/)                                             │
//! │  - clap parsing (setup.rs)                                  │
//! │  - runtime, logging, dispatch (commands.rs)                 │
//! │  - terminal rendering + console notifier (render.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!              vitrineapp::api::CatalogApi<FileStore>
//! ```
//!
//! Mutation failures are reported by the console notifier as they happen, so
//! they only set the exit code here. Anything else that fails is printed once
//! as `Error: ...`.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", console::style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
