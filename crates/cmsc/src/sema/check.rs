//! Type-check pass: annotates expressions and validates statements

use crate::ast::{DeclKind, ExpType, ExprKind, Node, NodeKind, StmtKind};
use crate::common::{AnalysisResult, Diagnostics, SemaError};

use super::scope::{ScopeStore, SymbolKind};
use super::walker::Visitor;

/// Post-order visitor run over a tree whose symbol table is complete
pub(crate) struct TypeCheckPass<'a> {
    store: &'a ScopeStore,
    diagnostics: &'a mut Diagnostics,
    suppress_undetermined: bool,
}

impl<'a> TypeCheckPass<'a> {
    pub(crate) fn new(
        store: &'a ScopeStore,
        diagnostics: &'a mut Diagnostics,
        suppress_undetermined: bool,
    ) -> Self {
        Self {
            store,
            diagnostics,
            suppress_undetermined,
        }
    }

    /// Whether `ty` fails an `int` requirement.
    ///
    /// `Undetermined` comes from a name that was already reported as undeclared
    /// and only counts as a mismatch when suppression is off.
    fn not_int(&self, ty: ExpType) -> bool {
        match ty {
            ExpType::Integer => false,
            ExpType::Undetermined => !self.suppress_undetermined,
            _ => true,
        }
    }

    fn check_parameter(&mut self, node: &Node) {
        if node.ty == ExpType::Void && !node.is_void_param_marker() {
            self.diagnostics.report(SemaError::VoidParameter {
                name: node.name_str().to_string(),
                line: node.lineno,
            });
        }
    }

    fn check_assign(&mut self, node: &mut Node) {
        let (Some(target), Some(value)) = (node.child(0), node.child(1)) else {
            return;
        };
        let (target_ty, value_ty, value_line) = (target.ty, value.ty, value.lineno);

        node.ty = match target_ty {
            ExpType::Integer | ExpType::IntegerArray => {
                if self.not_int(value_ty) {
                    self.diagnostics.report(SemaError::InvalidAssignment { line: value_line });
                }
                ExpType::Integer
            }
            other => other,
        };
    }

    fn check_binary(&mut self, node: &mut Node) {
        if let (Some(left), Some(right)) = (node.child(0), node.child(1)) {
            if self.not_int(left.ty) || self.not_int(right.ty) {
                self.diagnostics.report(SemaError::InvalidOperation { line: left.lineno });
            }
        }
        node.ty = ExpType::Integer;
    }

    fn check_identifier(&mut self, node: &mut Node) {
        let Some(index) = node.child(0) else {
            return;
        };
        let (index_ty, index_line) = (index.ty, index.lineno);

        match node.ty {
            ExpType::IntegerArray => {
                if self.not_int(index_ty) {
                    self.diagnostics.report(SemaError::InvalidIndexType {
                        name: node.name_str().to_string(),
                        line: index_line,
                    });
                }
                // An indexed element is an int
                node.ty = ExpType::Integer;
            }
            ExpType::Undetermined if self.suppress_undetermined => {}
            _ => self.diagnostics.report(SemaError::InvalidIndexTarget {
                name: node.name_str().to_string(),
                line: node.lineno,
            }),
        }
    }

    /// Re-resolve the callee by name through the archived scopes.
    ///
    /// The first archived scope declaring the name wins, which can differ from
    /// the scope the call resolved to during declaration.
    /// `FunctionNotDefined` only fires for a tree checked against a store
    /// that did not declare its callees.
    fn check_call(&mut self, node: &Node) {
        let name = node.name_str();
        let found = self
            .store
            .find_declaring_scope(name)
            .and_then(|scope| self.store.resolve_from(scope, name));

        match found.map(|id| self.store.symbol(id).kind) {
            None => self.diagnostics.report(SemaError::FunctionNotDefined {
                name: name.to_string(),
                line: node.lineno,
            }),
            Some(SymbolKind::Variable) => self.diagnostics.report(SemaError::NotAFunction {
                name: name.to_string(),
                line: node.lineno,
            }),
            Some(SymbolKind::Function) => {}
        }
    }

    fn check_condition(&mut self, node: &Node) {
        if let Some(condition) = node.child(0) {
            if self.not_int(condition.ty) {
                self.diagnostics.report(SemaError::InvalidCondition {
                    line: condition.lineno,
                });
            }
        }
    }

    fn check_return(&mut self, node: &Node) {
        // The value is not compared with the enclosing function's return type
        if let Some(value) = node.child(0) {
            if self.not_int(value.ty) {
                self.diagnostics.report(SemaError::InvalidReturn { line: node.lineno });
            }
        }
    }
}

impl Visitor for TypeCheckPass<'_> {
    fn post_visit(&mut self, node: &mut Node, _parent: Option<NodeKind>) -> AnalysisResult<()> {
        match node.kind {
            NodeKind::Decl(DeclKind::Parameter) => self.check_parameter(node),
            NodeKind::Decl(DeclKind::Function | DeclKind::Variable) => {}
            NodeKind::Expr(ExprKind::Assign) => self.check_assign(node),
            NodeKind::Expr(ExprKind::BinaryOp(_)) => self.check_binary(node),
            NodeKind::Expr(ExprKind::Constant(_)) => node.ty = ExpType::Integer,
            NodeKind::Expr(ExprKind::Identifier) => self.check_identifier(node),
            NodeKind::Expr(ExprKind::Call) => self.check_call(node),
            NodeKind::Stmt(StmtKind::If | StmtKind::While) => self.check_condition(node),
            NodeKind::Stmt(StmtKind::Return) => self.check_return(node),
            NodeKind::Stmt(StmtKind::Compound) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;
    use crate::sema::declare::{enter_global, DeclarationPass};
    use crate::sema::walker::traverse;
    use pretty_assertions::assert_eq;

    fn check_with(decls: Vec<Node>, suppress_undetermined: bool) -> (Option<Box<Node>>, Vec<SemaError>) {
        let mut root = Node::chain(decls);
        let mut store = ScopeStore::new();
        let mut declared = Diagnostics::new();
        enter_global(&mut store).unwrap();
        traverse(root.as_deref_mut(), &mut DeclarationPass::new(&mut store, &mut declared)).unwrap();
        store.close_scope().unwrap();

        let mut checked = Diagnostics::new();
        traverse(
            root.as_deref_mut(),
            &mut TypeCheckPass::new(&store, &mut checked, suppress_undetermined),
        )
        .unwrap();
        (root, checked.as_slice().to_vec())
    }

    /// Type-check diagnostics only, with `int x; int a[]; void v(void)` in scope
    fn check_body(stmts: Vec<Node>) -> Vec<SemaError> {
        let decls = vec![
            Node::var("x", ExpType::Integer, 1),
            Node::var("a", ExpType::IntegerArray, 1),
            Node::function("v", ExpType::Void, vec![Node::void_param(2)], Node::compound(Vec::new(), Vec::new(), 2), 2),
            Node::function("main", ExpType::Void, vec![Node::void_param(3)], Node::compound(Vec::new(), stmts, 3), 3),
        ];
        check_with(decls, true).1
    }

    fn void_call(line: u32) -> Node {
        Node::call("v", Vec::new(), line)
    }

    #[test]
    fn test_well_typed_body_is_clean() {
        let errors = check_body(vec![
            Node::assign(Node::id("x", 4), Node::op(BinOp::Add, Node::id("x", 4), Node::constant(1, 4), 4), 4),
            Node::assign(Node::index("a", Node::id("x", 5), 5), Node::call("input", Vec::new(), 5), 5),
            Node::while_stmt(
                Node::op(BinOp::Lt, Node::index("a", Node::constant(0, 6), 6), Node::constant(10, 6), 6),
                Node::compound(Vec::new(), vec![Node::call("output", vec![Node::id("x", 7)], 7)], 6),
                6,
            ),
            Node::if_stmt(Node::id("x", 8), Node::return_stmt(None, 8), None, 8),
        ]);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_invalid_assignment_reports_value_line() {
        let errors = check_body(vec![Node::assign(Node::id("x", 4), void_call(5), 4)]);
        assert_eq!(errors, [SemaError::InvalidAssignment { line: 5 }]);
    }

    #[test]
    fn test_array_target_requires_int_value() {
        let errors = check_body(vec![Node::assign(Node::id("a", 4), void_call(4), 4)]);
        assert_eq!(errors, [SemaError::InvalidAssignment { line: 4 }]);
    }

    #[test]
    fn test_invalid_operation_still_yields_int() {
        let (root, errors) = check_with(
            vec![Node::function(
                "main",
                ExpType::Void,
                vec![Node::void_param(1)],
                Node::compound(
                    vec![Node::var("a", ExpType::IntegerArray, 2)],
                    vec![Node::assign(
                        Node::id("a", 3),
                        Node::op(BinOp::Mul, Node::id("a", 3), Node::constant(2, 3), 3),
                        3,
                    )],
                    2,
                ),
                1,
            )],
            true,
        );

        // Only the operator is reported; the assignment sees an int value
        assert_eq!(errors, [SemaError::InvalidOperation { line: 3 }]);
        let assign = root.unwrap().child(1).unwrap().child(1).unwrap().clone();
        assert_eq!(assign.child(1).unwrap().ty, ExpType::Integer);
        assert_eq!(assign.ty, ExpType::Integer);
    }

    #[test]
    fn test_indexing_scalar() {
        let errors = check_body(vec![Node::assign(Node::index("x", Node::constant(0, 4), 4), Node::constant(1, 4), 4)]);
        assert_eq!(
            errors,
            [SemaError::InvalidIndexTarget {
                name: "x".into(),
                line: 4,
            }]
        );
    }

    #[test]
    fn test_index_must_be_int() {
        let errors = check_body(vec![Node::assign(Node::index("a", Node::id("a", 5), 4), Node::constant(1, 4), 4)]);
        assert_eq!(
            errors,
            [SemaError::InvalidIndexType {
                name: "a".into(),
                line: 5,
            }]
        );
    }

    #[test]
    fn test_conditions_must_be_int() {
        let errors = check_body(vec![
            Node::if_stmt(void_call(4), Node::return_stmt(None, 4), None, 4),
            Node::while_stmt(Node::id("a", 6), Node::return_stmt(None, 6), 5),
        ]);
        assert_eq!(
            errors,
            [
                SemaError::InvalidCondition { line: 4 },
                SemaError::InvalidCondition { line: 6 },
            ]
        );
    }

    #[test]
    fn test_return_value_must_be_int() {
        let errors = check_body(vec![
            Node::return_stmt(Some(Node::id("a", 4)), 4),
            Node::return_stmt(Some(Node::id("x", 5)), 5),
        ]);
        assert_eq!(errors, [SemaError::InvalidReturn { line: 4 }]);
    }

    #[test]
    fn test_calling_a_variable() {
        let errors = check_body(vec![Node::call("x", Vec::new(), 4)]);
        assert_eq!(
            errors,
            [SemaError::NotAFunction {
                name: "x".into(),
                line: 4,
            }]
        );
    }

    #[test]
    fn test_named_void_parameter() {
        let f = Node::function(
            "f",
            ExpType::Void,
            vec![Node::param("p", ExpType::Void, 1)],
            Node::compound(Vec::new(), Vec::new(), 1),
            1,
        );
        let (_, errors) = check_with(vec![f], true);
        assert_eq!(
            errors,
            [SemaError::VoidParameter {
                name: "p".into(),
                line: 1,
            }]
        );
    }

    #[test]
    fn test_undetermined_suppression_toggle() {
        let body = || {
            vec![Node::function(
                "f",
                ExpType::Integer,
                vec![Node::void_param(1)],
                Node::compound(Vec::new(), vec![Node::return_stmt(Some(Node::id("y", 2)), 2)], 1),
                1,
            )]
        };

        let (_, suppressed) = check_with(body(), true);
        assert!(suppressed.is_empty(), "{suppressed:?}");

        let (_, reported) = check_with(body(), false);
        assert_eq!(reported, [SemaError::InvalidReturn { line: 2 }]);
    }

    #[test]
    fn test_constants_typed_int() {
        let (root, _) = check_with(vec![Node::function(
            "f",
            ExpType::Integer,
            vec![Node::void_param(1)],
            Node::compound(Vec::new(), vec![Node::return_stmt(Some(Node::constant(7, 1)), 1)], 1),
            1,
        )], true);

        let ret = root.unwrap().child(1).unwrap().child(1).unwrap().clone();
        assert_eq!(ret.child(0).unwrap().ty, ExpType::Integer);
    }

    #[test]
    fn test_callee_missing_from_store() {
        // The store only knows the built-ins; `g` was never declared
        let mut store = ScopeStore::new();
        enter_global(&mut store).unwrap();
        store.close_scope().unwrap();

        let mut call = Node::call("g", Vec::new(), 4);
        let mut diagnostics = Diagnostics::new();
        traverse(Some(&mut call), &mut TypeCheckPass::new(&store, &mut diagnostics, true)).unwrap();

        assert_eq!(
            diagnostics.as_slice(),
            [SemaError::FunctionNotDefined {
                name: "g".into(),
                line: 4,
            }]
        );
    }
}
