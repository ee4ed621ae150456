//! Generic pre/post-order tree traversal

use crate::ast::{Node, NodeKind};
use crate::common::AnalysisResult;

/// Actions applied by [`traverse`].
///
/// `parent` is the kind of the node whose child slot holds `node`; siblings
/// share their head's parent, and the top-level chain has none. Both methods
/// default to doing nothing, so a pass overrides only the side it needs.
pub trait Visitor {
    fn pre_visit(&mut self, node: &mut Node, parent: Option<NodeKind>) -> AnalysisResult<()> {
        let _ = (node, parent);
        Ok(())
    }

    fn post_visit(&mut self, node: &mut Node, parent: Option<NodeKind>) -> AnalysisResult<()> {
        let _ = (node, parent);
        Ok(())
    }
}

/// Walk `node` and its sibling chain.
///
/// For each node: `pre_visit`, then every child slot in order, then
/// `post_visit`, then the next sibling. Absent nodes are skipped.
pub fn traverse<V: Visitor + ?Sized>(node: Option<&mut Node>, visitor: &mut V) -> AnalysisResult<()> {
    walk(node, None, visitor)
}

fn walk<V: Visitor + ?Sized>(
    mut node: Option<&mut Node>,
    parent: Option<NodeKind>,
    visitor: &mut V,
) -> AnalysisResult<()> {
    // Siblings are iterated rather than recursed so long statement lists stay shallow
    while let Some(current) = node {
        visitor.pre_visit(current, parent)?;
        let kind = current.kind;
        for child in &mut current.children {
            walk(child.as_deref_mut(), Some(kind), visitor)?;
        }
        visitor.post_visit(current, parent)?;
        node = current.sibling.as_deref_mut();
    }
    Ok(())
}

/// Closure-backed visitor; pass [`null_action`] for a one-sided walk.
pub struct Actions<Pre, Post> {
    pre: Pre,
    post: Post,
}

impl<Pre, Post> Actions<Pre, Post>
where
    Pre: FnMut(&mut Node),
    Post: FnMut(&mut Node),
{
    pub fn new(pre: Pre, post: Post) -> Self {
        Self { pre, post }
    }
}

impl<Pre, Post> Visitor for Actions<Pre, Post>
where
    Pre: FnMut(&mut Node),
    Post: FnMut(&mut Node),
{
    fn pre_visit(&mut self, node: &mut Node, _parent: Option<NodeKind>) -> AnalysisResult<()> {
        (self.pre)(node);
        Ok(())
    }

    fn post_visit(&mut self, node: &mut Node, _parent: Option<NodeKind>) -> AnalysisResult<()> {
        (self.post)(node);
        Ok(())
    }
}

pub fn null_action(_node: &mut Node) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, DeclKind, ExpType, StmtKind};
    use pretty_assertions::assert_eq;

    fn label(node: &Node) -> String {
        match node.kind {
            NodeKind::Expr(crate::ast::ExprKind::Constant(v)) => v.to_string(),
            NodeKind::Expr(crate::ast::ExprKind::BinaryOp(op)) => op.to_string(),
            _ => node.name_str().to_string(),
        }
    }

    // a = (1 + 2); b
    fn sample() -> Node {
        let head = Node::chain(vec![
            Node::assign(
                Node::id("a", 1),
                Node::op(BinOp::Add, Node::constant(1, 1), Node::constant(2, 1), 1),
                1,
            ),
            Node::id("b", 2),
        ]);
        *head.unwrap()
    }

    #[test]
    fn test_pre_and_post_order() {
        let mut tree = sample();
        let mut events = Vec::new();
        {
            let log = std::cell::RefCell::new(&mut events);
            let mut actions = Actions::new(
                |n: &mut Node| log.borrow_mut().push(format!("pre {}", label(n))),
                |n: &mut Node| log.borrow_mut().push(format!("post {}", label(n))),
            );
            traverse(Some(&mut tree), &mut actions).unwrap();
        }

        assert_eq!(
            events,
            [
                "pre ", "pre a", "post a", "pre +", "pre 1", "post 1", "pre 2", "post 2",
                "post +", "post ", "pre b", "post b",
            ]
        );
    }

    #[test]
    fn test_null_action_gives_postorder() {
        let mut tree = sample();
        let mut seen = Vec::new();
        let mut actions = Actions::new(null_action, |n: &mut Node| seen.push(label(n)));
        traverse(Some(&mut tree), &mut actions).unwrap();

        assert_eq!(seen, ["a", "1", "2", "+", "", "b"]);
    }

    #[test]
    fn test_absent_node_is_noop() {
        let mut count = 0;
        let mut actions = Actions::new(|_: &mut Node| count += 1, null_action);
        traverse(None, &mut actions).unwrap();
        assert_eq!(count, 0);
    }

    struct ParentRecorder(Vec<(String, Option<NodeKind>)>);

    impl Visitor for ParentRecorder {
        fn pre_visit(&mut self, node: &mut Node, parent: Option<NodeKind>) -> AnalysisResult<()> {
            self.0.push((node.name_str().to_string(), parent));
            Ok(())
        }
    }

    #[test]
    fn test_parent_kind_is_reported() {
        let mut tree = Node::function(
            "f",
            ExpType::Void,
            vec![Node::param("p", ExpType::Integer, 1), Node::param("q", ExpType::Integer, 1)],
            Node::compound(vec![Node::var("x", ExpType::Integer, 2)], Vec::new(), 1),
            1,
        );
        let mut recorder = ParentRecorder(Vec::new());
        traverse(Some(&mut tree), &mut recorder).unwrap();

        let function = Some(NodeKind::Decl(DeclKind::Function));
        let compound = Some(NodeKind::Stmt(StmtKind::Compound));
        assert_eq!(
            recorder.0,
            [
                ("f".to_string(), None),
                ("p".to_string(), function),
                ("q".to_string(), function),
                ("".to_string(), function),
                ("x".to_string(), compound),
            ]
        );
    }
}
