//! Syntax tree nodes
//!
//! The tree uses the classic C-Minus layout: every node has a fixed number of
//! child slots plus a sibling link that chains declarations, parameters,
//! statements and call arguments at the same level.
//!
//! Child slot conventions:
//!
//! | Node             | slot 0            | slot 1          | slot 2 |
//! |------------------|-------------------|-----------------|--------|
//! | Function         | parameters        | body (Compound) |        |
//! | Compound         | local declarations| statements      |        |
//! | If               | condition         | then            | else   |
//! | While            | condition         | body            |        |
//! | Return           | value             |                 |        |
//! | Identifier       | index             |                 |        |
//! | Call             | arguments         |                 |        |
//! | Assign           | target            | value           |        |
//! | BinaryOp         | left              | right           |        |

use std::fmt;

use super::ExpType;

/// Number of child slots carried by every node
pub const MAX_CHILDREN: usize = 3;

/// Declaration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Function,
    Variable,
    Parameter,
}

/// Statement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    Compound,
    If,
    While,
    Return,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        };
        f.write_str(s)
    }
}

/// Expression kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Identifier,
    Call,
    Assign,
    BinaryOp(BinOp),
    Constant(i64),
}

/// Node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Decl(DeclKind),
    Stmt(StmtKind),
    Expr(ExprKind),
}

/// Syntax tree node
///
/// Semantic analysis reads `kind`, `name`, `lineno` and the tree shape, and
/// writes only `ty`. For declarations `ty` holds the declared type (the return
/// type for functions); for expressions it holds the inferred type.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub children: [Option<Box<Node>>; MAX_CHILDREN],
    pub sibling: Option<Box<Node>>,
    pub lineno: u32,
    pub ty: ExpType,
}

impl Node {
    pub fn new(kind: NodeKind, lineno: u32) -> Self {
        Self {
            kind,
            name: None,
            children: [None, None, None],
            sibling: None,
            lineno,
            ty: ExpType::Undetermined,
        }
    }

    fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn typed(mut self, ty: ExpType) -> Self {
        self.ty = ty;
        self
    }

    fn with_child(mut self, slot: usize, child: Option<Box<Node>>) -> Self {
        self.children[slot] = child;
        self
    }

    /// Function declaration: `ret name(params) body`
    pub fn function(
        name: impl Into<String>,
        return_type: ExpType,
        params: Vec<Node>,
        body: Node,
        lineno: u32,
    ) -> Self {
        Self::new(NodeKind::Decl(DeclKind::Function), lineno)
            .named(name)
            .typed(return_type)
            .with_child(0, Self::chain(params))
            .with_child(1, Some(Box::new(body)))
    }

    /// Variable declaration: `ty name;` or `int name[N];` with `IntegerArray`
    pub fn var(name: impl Into<String>, ty: ExpType, lineno: u32) -> Self {
        Self::new(NodeKind::Decl(DeclKind::Variable), lineno)
            .named(name)
            .typed(ty)
    }

    /// Named parameter
    pub fn param(name: impl Into<String>, ty: ExpType, lineno: u32) -> Self {
        Self::new(NodeKind::Decl(DeclKind::Parameter), lineno)
            .named(name)
            .typed(ty)
    }

    /// The `(void)` parameter list marker
    pub fn void_param(lineno: u32) -> Self {
        Self::new(NodeKind::Decl(DeclKind::Parameter), lineno).typed(ExpType::Void)
    }

    /// Compound statement: `{ decls stmts }`
    pub fn compound(decls: Vec<Node>, stmts: Vec<Node>, lineno: u32) -> Self {
        Self::new(NodeKind::Stmt(StmtKind::Compound), lineno)
            .with_child(0, Self::chain(decls))
            .with_child(1, Self::chain(stmts))
    }

    pub fn if_stmt(condition: Node, then: Node, otherwise: Option<Node>, lineno: u32) -> Self {
        Self::new(NodeKind::Stmt(StmtKind::If), lineno)
            .with_child(0, Some(Box::new(condition)))
            .with_child(1, Some(Box::new(then)))
            .with_child(2, otherwise.map(Box::new))
    }

    pub fn while_stmt(condition: Node, body: Node, lineno: u32) -> Self {
        Self::new(NodeKind::Stmt(StmtKind::While), lineno)
            .with_child(0, Some(Box::new(condition)))
            .with_child(1, Some(Box::new(body)))
    }

    pub fn return_stmt(value: Option<Node>, lineno: u32) -> Self {
        Self::new(NodeKind::Stmt(StmtKind::Return), lineno).with_child(0, value.map(Box::new))
    }

    /// Identifier reference
    pub fn id(name: impl Into<String>, lineno: u32) -> Self {
        Self::new(NodeKind::Expr(ExprKind::Identifier), lineno).named(name)
    }

    /// Indexed identifier: `name[index]`
    pub fn index(name: impl Into<String>, index: Node, lineno: u32) -> Self {
        Self::id(name, lineno).with_child(0, Some(Box::new(index)))
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>, lineno: u32) -> Self {
        Self::new(NodeKind::Expr(ExprKind::Call), lineno)
            .named(name)
            .with_child(0, Self::chain(args))
    }

    pub fn assign(target: Node, value: Node, lineno: u32) -> Self {
        Self::new(NodeKind::Expr(ExprKind::Assign), lineno)
            .with_child(0, Some(Box::new(target)))
            .with_child(1, Some(Box::new(value)))
    }

    pub fn op(op: BinOp, left: Node, right: Node, lineno: u32) -> Self {
        Self::new(NodeKind::Expr(ExprKind::BinaryOp(op)), lineno)
            .with_child(0, Some(Box::new(left)))
            .with_child(1, Some(Box::new(right)))
    }

    pub fn constant(value: i64, lineno: u32) -> Self {
        Self::new(NodeKind::Expr(ExprKind::Constant(value)), lineno)
    }

    /// Link nodes into a sibling chain, preserving order.
    ///
    /// Any sibling already attached to one of the nodes is replaced.
    pub fn chain(nodes: Vec<Node>) -> Option<Box<Node>> {
        nodes.into_iter().rev().fold(None, |next, mut node| {
            node.sibling = next;
            Some(Box::new(node))
        })
    }

    pub fn child(&self, slot: usize) -> Option<&Node> {
        self.children.get(slot).and_then(|c| c.as_deref())
    }

    /// Iterate over this node and the siblings chained after it
    pub fn siblings(&self) -> Siblings<'_> {
        Siblings { next: Some(self) }
    }

    /// Name or the empty string for anonymous nodes
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// True for the anonymous `void` parameter that spells "no parameters"
    pub fn is_void_param_marker(&self) -> bool {
        self.kind == NodeKind::Decl(DeclKind::Parameter)
            && self.ty == ExpType::Void
            && self.name.as_deref().is_none_or(str::is_empty)
    }
}

/// Iterator over a sibling chain
pub struct Siblings<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Siblings<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.sibling.as_deref();
        Some(current)
    }
}
