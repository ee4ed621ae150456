//! Abstract Syntax Tree definitions

mod node;
mod types;

pub use node::*;
pub use types::*;

/// A complete C-Minus program: the chain of top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub root: Option<Box<Node>>,
}

impl TranslationUnit {
    pub fn new(declarations: Vec<Node>) -> Self {
        Self {
            root: Node::chain(declarations),
        }
    }

    /// Iterate over the top-level declarations
    pub fn declarations(&self) -> impl Iterator<Item = &Node> {
        self.root.as_deref().into_iter().flat_map(Node::siblings)
    }
}
