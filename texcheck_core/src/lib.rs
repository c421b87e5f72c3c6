//! `texcheck_core` is the library behind the `texcheck` LaTeX style checker.
//! It scans LaTeX source line by line and reports typographic and structural
//! problems: missing non-breaking spaces, wrong dash lengths, unbalanced
//! brackets and environments, misplaced italic corrections, quote misuse,
//! and more. It does not typeset anything and never runs TeX.
//!
//! ## Processing Pipeline
//!
//! ```text
//! texcheck.toml
//!   → TexCheckConfig (serde + toml)
//!   → Settings (word lists, enabled diagnostics, output format)
//! Document paths
//!   → collect_sources (directory walk with include/exclude patterns)
//!   → Scanner (one per document, reads lines through an InputStack)
//!   → Emitter (filters by enablement and context, renders, counts)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `texcheck.toml` loading and the resolved [`Settings`].
//! - [`lists`]: the named word lists and their built-in contents.
//! - [`scanner`]: the per-character rules and the mode state machine.
//! - [`format`]: the `%`-placeholder output template.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use texcheck_core::Emitter;
//! use texcheck_core::Settings;
//! use texcheck_core::check_file;
//!
//! let settings = Settings::builtin().unwrap();
//! let mut emitter = Emitter::from_settings(std::io::stdout(), &settings);
//! check_file(Path::new("paper.tex"), &settings, &mut emitter).unwrap();
//! eprintln!("{}", emitter.counters());
//! ```

pub use commands::*;
pub use config::*;
pub use context::*;
pub use diagnostic::*;
pub use emitter::*;
pub use engine::*;
pub use error::*;
pub use format::*;
pub use input::*;
pub use lists::*;
pub use scanner::*;
pub use sources::*;
pub use stack::*;
pub use wordlist::*;

mod commands;
pub mod config;
mod context;
pub(crate) mod cursor;
mod diagnostic;
mod emitter;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod format;
mod input;
pub mod lists;
pub mod scanner;
mod sources;
mod stack;
mod wordlist;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
