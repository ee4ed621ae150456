//! C-Minus semantic analyzer
//!
//! This library takes a syntax tree built by a C-Minus parser, resolves every
//! name against its lexical scope and checks expression and statement types.
//!
//! ## Architecture
//!
//! The crate is organized into:
//! - **AST** (`ast/`): Tree nodes, read by the passes and annotated with types
//! - **Sema** (`sema/`): Tree walker, scope store, declaration and type-check passes
//! - **Common** (`common/`): Shared infrastructure (errors, diagnostics)
//!
//! ## Example
//!
//! ```
//! use cminus_sema::ast::{ExpType, Node, TranslationUnit};
//! use cminus_sema::SemanticAnalyzer;
//!
//! let mut tu = TranslationUnit::new(vec![Node::function(
//!     "main",
//!     ExpType::Void,
//!     vec![Node::void_param(1)],
//!     Node::compound(Vec::new(), vec![Node::call("output", vec![Node::id("x", 2)], 2)], 1),
//!     1,
//! )]);
//!
//! let mut analyzer = SemanticAnalyzer::new();
//! analyzer.analyze(&mut tu).unwrap();
//!
//! assert!(analyzer.has_errors());
//! assert_eq!(
//!     analyzer.diagnostics().as_slice()[0].to_string(),
//!     "undeclared variable \"x\" is used at line 2"
//! );
//! ```

pub mod ast;
pub mod common;
pub mod sema;

// Re-exports for convenience
pub use common::{AnalysisError, AnalysisResult, DiagnosticReporter, Diagnostics, SemaError};
pub use sema::{AnalyzerConfig, SemanticAnalyzer};
