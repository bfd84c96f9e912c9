//! Core analysis engine: the three-stage pipeline.
//!
//! 1. **Extraction** (`extract`): pattern-based scan of each source file for
//!    environment variable references, tagged guarded or bare.
//! 2. **Collection** (`collect`): parsing of declaration sources (flat env
//!    files, deployment manifests, templates) into uniform declared sets.
//! 3. **Reconciliation** (`crate::rules`): per-scope diff of usage against
//!    declarations, driven by the scopes this module resolves.

pub mod collect;
pub mod context;
pub mod extract;
pub mod registry;
pub mod scope;
pub mod usage;

pub use collect::{DeclarationSource, DeclaredVariable, DeclaredVariables};
pub use context::{AuditWarning, CheckContext, ConfigOverrides, ExampleSet, Scope};
pub use extract::extract_references;
pub use scope::{ScopeKind, rel_display};
pub use usage::{FileUsage, UsageRecord, VariableReference};
