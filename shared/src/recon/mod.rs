//! # Recon
//! Incremental parsing of Recon text into a flat event sequence, and the
//! compact printer that writes events back out.
//!
//! | Module | Role |
//! |--------|------|
//! | `classifiers` | character classes |
//! | `cursor`      | position over the current chunk |
//! | `tokens`      | resumable token sub-parsers |
//! | `transition`  | (context, input) → (events, state change) |
//! | `parser`      | the driver owning the nesting stack |
//! | `printer`     | events → compact text |

pub mod classifiers;
pub mod cursor;
pub mod error;
pub mod event;
pub mod parser;
pub mod parser_config;
pub mod printer;
pub mod tokens;
pub mod transition;
