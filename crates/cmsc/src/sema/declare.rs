//! Declaration pass: builds scopes and symbol tables, resolves names

use crate::ast::{DeclKind, ExpType, ExprKind, Node, NodeKind, StmtKind};
use crate::common::{AnalysisResult, Diagnostics, SemaError};

use super::scope::{ScopeStore, SymbolId, SymbolKind};
use super::walker::Visitor;

/// Name of the outermost scope
pub const GLOBAL_SCOPE: &str = "Global";

/// Built-in symbols seeded into the global scope at line 0
const BUILTINS: [(&str, SymbolKind, ExpType); 3] = [
    ("input", SymbolKind::Function, ExpType::Integer),
    ("output", SymbolKind::Function, ExpType::Void),
    ("value", SymbolKind::Variable, ExpType::Integer),
];

/// Open the global scope and seed it with the built-ins
pub(crate) fn enter_global(store: &mut ScopeStore) -> AnalysisResult<()> {
    let global = store.create_scope(GLOBAL_SCOPE);
    store.push_scope(global);
    for (name, kind, ty) in BUILTINS {
        store.declare(name, kind, ty, 0)?;
    }
    Ok(())
}

/// Pre/post visitor that populates the scope store
pub(crate) struct DeclarationPass<'a> {
    store: &'a mut ScopeStore,
    diagnostics: &'a mut Diagnostics,
    /// Set when a function opened its scope; consumed by that function's body
    body_scope_open: bool,
}

impl<'a> DeclarationPass<'a> {
    pub(crate) fn new(store: &'a mut ScopeStore, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            store,
            diagnostics,
            body_scope_open: false,
        }
    }

    fn declare_function(&mut self, node: &Node) -> AnalysisResult<()> {
        let name = node.name_str();
        if let Some(existing) = self.store.lookup_local(name)? {
            let lines = self.lines_with(existing, node.lineno);
            self.report_redefined(name, node.lineno, lines);
            return Ok(());
        }

        self.store.declare(name, SymbolKind::Function, node.ty, node.lineno)?;
        self.store.open_nested_scope(name)?;
        self.body_scope_open = true;
        Ok(())
    }

    fn declare_variable(&mut self, node: &Node) -> AnalysisResult<()> {
        let name = node.name_str();
        if let Some(existing) = self.store.lookup_local(name)? {
            self.store.record_reference(existing, node.lineno);
            let lines = self.store.symbol(existing).lines.clone();
            self.report_redefined(name, node.lineno, lines);
        }

        if node.ty.is_void() {
            self.diagnostics.report(SemaError::VoidVariable {
                name: name.to_string(),
                line: node.lineno,
            });
        }

        // A redefinition leaves the first entry in place
        self.store.declare(name, SymbolKind::Variable, node.ty, node.lineno)?;
        Ok(())
    }

    fn declare_parameter(&mut self, node: &Node) -> AnalysisResult<()> {
        if node.is_void_param_marker() {
            return Ok(());
        }

        let name = node.name_str();
        if let Some(existing) = self.store.lookup_local(name)? {
            let lines = self.lines_with(existing, node.lineno);
            self.report_redefined(name, node.lineno, lines);
        }
        self.store.declare(name, SymbolKind::Variable, node.ty, node.lineno)?;
        Ok(())
    }

    fn enter_compound(&mut self, parent: Option<NodeKind>) -> AnalysisResult<()> {
        let owns_function_scope = std::mem::take(&mut self.body_scope_open)
            && parent == Some(NodeKind::Decl(DeclKind::Function));

        if !owns_function_scope {
            // Blocks are listed under their enclosing scope's name
            let current = self.store.current_scope()?;
            let name = self.store.scope(current).name().to_string();
            self.store.open_nested_scope(name)?;
        }
        Ok(())
    }

    /// Resolve an identifier or call, declaring it implicitly when unknown
    fn reference(&mut self, node: &mut Node, kind: SymbolKind) -> AnalysisResult<()> {
        let name = node.name.as_deref().unwrap_or_default();
        match self.store.resolve(name)? {
            Some(symbol) => {
                node.ty = self.store.symbol(symbol).ty;
                self.store.record_reference(symbol, node.lineno);
                tracing::trace!(name, line = node.lineno, "reference");
            }
            None => {
                let error = match kind {
                    SymbolKind::Variable => SemaError::UndeclaredVariable {
                        name: name.to_string(),
                        line: node.lineno,
                    },
                    SymbolKind::Function => SemaError::UndeclaredFunction {
                        name: name.to_string(),
                        line: node.lineno,
                    },
                };
                self.diagnostics.report(error);
                self.store.declare(name, kind, ExpType::Undetermined, node.lineno)?;
                node.ty = ExpType::Undetermined;
            }
        }
        Ok(())
    }

    /// Known lines of `existing` plus the redeclaring line, which is not recorded
    fn lines_with(&self, existing: SymbolId, line: u32) -> Vec<u32> {
        let mut lines = self.store.symbol(existing).lines.clone();
        lines.push(line);
        lines
    }

    fn report_redefined(&mut self, name: &str, line: u32, lines: Vec<u32>) {
        self.diagnostics.report(SemaError::Redefined {
            name: name.to_string(),
            line,
            lines,
        });
    }
}

impl Visitor for DeclarationPass<'_> {
    fn pre_visit(&mut self, node: &mut Node, parent: Option<NodeKind>) -> AnalysisResult<()> {
        match node.kind {
            NodeKind::Decl(DeclKind::Function) => self.declare_function(node),
            NodeKind::Decl(DeclKind::Variable) => self.declare_variable(node),
            NodeKind::Decl(DeclKind::Parameter) => self.declare_parameter(node),
            NodeKind::Stmt(StmtKind::Compound) => self.enter_compound(parent),
            NodeKind::Expr(ExprKind::Identifier) => self.reference(node, SymbolKind::Variable),
            NodeKind::Expr(ExprKind::Call) => self.reference(node, SymbolKind::Function),
            NodeKind::Stmt(StmtKind::If | StmtKind::While | StmtKind::Return)
            | NodeKind::Expr(ExprKind::Assign | ExprKind::BinaryOp(_) | ExprKind::Constant(_)) => {
                Ok(())
            }
        }
    }

    fn post_visit(&mut self, node: &mut Node, _parent: Option<NodeKind>) -> AnalysisResult<()> {
        match node.kind {
            NodeKind::Stmt(StmtKind::Compound) => {
                self.store.close_scope()?;
            }
            // A function without a body never consumed its scope
            NodeKind::Decl(DeclKind::Function) if std::mem::take(&mut self.body_scope_open) => {
                self.store.close_scope()?;
            }
            _ => {}
        }
        Ok(())
    }
}
