//! Type representations in the AST

use std::fmt;

/// C-Minus expression and declaration types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpType {
    /// `int`
    Integer,
    /// `int[]`
    IntegerArray,
    /// `void`
    Void,
    /// `void[]`, never legal for a declaration
    VoidArray,
    /// Placeholder for implicit declarations and not-yet-typed expressions
    #[default]
    Undetermined,
}

impl ExpType {
    /// Check if this type is `void` or `void[]`
    pub fn is_void(self) -> bool {
        matches!(self, ExpType::Void | ExpType::VoidArray)
    }

    /// Check if this type is an array type
    pub fn is_array(self) -> bool {
        matches!(self, ExpType::IntegerArray | ExpType::VoidArray)
    }

    /// Check if this type is still unresolved
    pub fn is_undetermined(self) -> bool {
        self == ExpType::Undetermined
    }

    /// Spelling used in listings and diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            ExpType::Integer => "int",
            ExpType::IntegerArray => "int[]",
            ExpType::Void => "void",
            ExpType::VoidArray => "void[]",
            ExpType::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for ExpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
