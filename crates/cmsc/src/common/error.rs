//! Error types

use thiserror::Error;

/// A semantic problem found in the analyzed program.
///
/// These never abort a pass; they are collected in [`Diagnostics`](super::Diagnostics).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemaError {
    #[error("symbol \"{name}\" is redefined at line {line} (seen at lines {})", join_lines(.lines))]
    Redefined {
        name: String,
        line: u32,
        /// Declaration and reference lines of the kept entry, then `line`
        lines: Vec<u32>,
    },

    #[error("undeclared variable \"{name}\" is used at line {line}")]
    UndeclaredVariable { name: String, line: u32 },

    #[error("undeclared function \"{name}\" is called at line {line}")]
    UndeclaredFunction { name: String, line: u32 },

    #[error("the void-type variable is declared at line {line} (name: \"{name}\")")]
    VoidVariable { name: String, line: u32 },

    #[error("the void-type parameter is declared at line {line} (name: \"{name}\")")]
    VoidParameter { name: String, line: u32 },

    #[error("invalid assignment at line {line}")]
    InvalidAssignment { line: u32 },

    #[error("invalid operation at line {line}")]
    InvalidOperation { line: u32 },

    #[error("invalid array indexing at line {line} (name: \"{name}\"): only int[] variables may be indexed")]
    InvalidIndexTarget { name: String, line: u32 },

    #[error("invalid array indexing at line {line} (name: \"{name}\"): indices must be int")]
    InvalidIndexType { name: String, line: u32 },

    #[error("invalid condition at line {line}")]
    InvalidCondition { line: u32 },

    #[error("invalid return at line {line}")]
    InvalidReturn { line: u32 },

    #[error("function \"{name}\" is not defined at line {line}")]
    FunctionNotDefined { name: String, line: u32 },

    #[error("\"{name}\" is not a function, but is called as one at line {line}")]
    NotAFunction { name: String, line: u32 },
}

impl SemaError {
    /// Source line the problem is reported against
    pub fn line(&self) -> u32 {
        match self {
            SemaError::Redefined { line, .. }
            | SemaError::UndeclaredVariable { line, .. }
            | SemaError::UndeclaredFunction { line, .. }
            | SemaError::VoidVariable { line, .. }
            | SemaError::VoidParameter { line, .. }
            | SemaError::InvalidAssignment { line }
            | SemaError::InvalidOperation { line }
            | SemaError::InvalidIndexTarget { line, .. }
            | SemaError::InvalidIndexType { line, .. }
            | SemaError::InvalidCondition { line }
            | SemaError::InvalidReturn { line }
            | SemaError::FunctionNotDefined { line, .. }
            | SemaError::NotAFunction { line, .. } => *line,
        }
    }

    /// Headline used when rendering: name resolution problems versus type problems
    pub fn category(&self) -> &'static str {
        match self {
            SemaError::Redefined { .. }
            | SemaError::UndeclaredVariable { .. }
            | SemaError::UndeclaredFunction { .. }
            | SemaError::FunctionNotDefined { .. }
            | SemaError::NotAFunction { .. } => "Semantic error",
            SemaError::VoidVariable { .. }
            | SemaError::VoidParameter { .. }
            | SemaError::InvalidAssignment { .. }
            | SemaError::InvalidOperation { .. }
            | SemaError::InvalidIndexTarget { .. }
            | SemaError::InvalidIndexType { .. }
            | SemaError::InvalidCondition { .. }
            | SemaError::InvalidReturn { .. } => "Type error",
        }
    }
}

fn join_lines(lines: &[u32]) -> String {
    lines
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Misuse of the analyzer itself, as opposed to a problem in the program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no active scope")]
    NoActiveScope,

    #[error("symbol table has already been built")]
    SymtabAlreadyBuilt,

    #[error("type check requires a completed declaration pass")]
    SymtabNotBuilt,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redefined_lists_all_lines() {
        let err = SemaError::Redefined {
            name: "x".into(),
            line: 10,
            lines: vec![3, 7, 10],
        };
        assert_eq!(
            err.to_string(),
            "symbol \"x\" is redefined at line 10 (seen at lines 3, 7, 10)"
        );
        assert_eq!(err.line(), 10);
        assert_eq!(err.category(), "Semantic error");
    }

    #[test]
    fn test_type_error_category() {
        let err = SemaError::InvalidCondition { line: 4 };
        assert_eq!(err.to_string(), "invalid condition at line 4");
        assert_eq!(err.category(), "Type error");
    }
}
