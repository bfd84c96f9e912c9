//! Envaudit - environment variable consistency auditor
//!
//! Envaudit is a CLI tool and library for reconciling the environment
//! variables a JS/TS codebase reads against the variables its env files and
//! deployment manifests declare. It reports missing, unused, and
//! undocumented variables, and can regenerate `.env.example` templates.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Core analysis engine (three-stage pipeline)
//! - `issues`: Issue type definitions and reporting
//! - `rules`: Reconciliation rules (missing, unused, undocumented)
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;
pub mod utils;
