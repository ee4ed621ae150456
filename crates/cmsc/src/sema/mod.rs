//! Semantic analysis module
//!
//! Two passes share one [`ScopeStore`]: the declaration pass builds scopes and
//! resolves names, then the type-check pass annotates and validates types.

mod analyzer;
mod check;
mod declare;
mod scope;
mod walker;

pub use analyzer::{AnalyzerConfig, SemanticAnalyzer};
pub use declare::GLOBAL_SCOPE;
pub use scope::{Declared, Scope, ScopeId, ScopeStore, Symbol, SymbolId, SymbolKind, SymbolTable};
pub use walker::{null_action, traverse, Actions, Visitor};
