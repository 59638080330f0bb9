//! Traversal helpers over a forest of [`NodeHandle`]s: breadth-first walk
//! and parent-mapping construction, so upward walks (e.g. "enclosing
//! workflow/job/step") never need raw back-pointers.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::node::NodeHandle;

/// A node together with the handles of its direct children, as needed to
/// walk a heterogeneous mix of [`super::node::ControlFlowGraphNode`] and
/// [`super::node::InterpretationNode`] without downcasting.
pub trait Children {
    fn children(&self) -> Vec<NodeHandle>;
}

/// Breadth-first traversal starting from `roots`, visiting each reachable
/// node exactly once (nodes are compared by `Rc` pointer identity, not by
/// structural equality, since distinct statement nodes may hold equal
/// states). Returns nodes in visitation order.
pub fn traverse_bfs<F>(roots: Vec<NodeHandle>, children_of: F) -> Vec<NodeHandle>
where
    F: Fn(&NodeHandle) -> Vec<NodeHandle>,
{
    let mut visited: Vec<*const ()> = Vec::new();
    let mut order = Vec::new();
    let mut queue: VecDeque<NodeHandle> = roots.into_iter().collect();

    while let Some(node) = queue.pop_front() {
        let ptr = Rc::as_ptr(&node) as *const ();
        if visited.contains(&ptr) {
            continue;
        }
        visited.push(ptr);
        for child in children_of(&node) {
            queue.push_back(child);
        }
        order.push(node);
    }
    order
}

/// Builds a child -> parent map over a BFS-reachable forest. A node that
/// appears as a child of more than one parent (e.g. a reused subroutine
/// node) keeps only the first parent encountered during the traversal,
/// matching the original's last-write-wins-by-visitation-order semantics.
pub fn build_parent_mapping<F>(roots: Vec<NodeHandle>, children_of: F) -> HashMap<*const (), NodeHandle>
where
    F: Fn(&NodeHandle) -> Vec<NodeHandle>,
{
    let mut parent_of: HashMap<*const (), NodeHandle> = HashMap::new();
    let mut queue: VecDeque<NodeHandle> = roots.into_iter().collect();
    let mut visited: Vec<*const ()> = Vec::new();

    while let Some(node) = queue.pop_front() {
        let ptr = Rc::as_ptr(&node) as *const ();
        if visited.contains(&ptr) {
            continue;
        }
        visited.push(ptr);
        for child in children_of(&node) {
            let child_ptr = Rc::as_ptr(&child) as *const ();
            parent_of.entry(child_ptr).or_insert_with(|| node.clone());
            queue.push_back(child);
        }
    }
    parent_of
}

/// A root-tagged collection of independently-rooted trees (e.g. one per
/// GitHub Actions job), kept together so the check scheduler can
/// run reachability queries without re-deriving roots each time.
pub struct NodeForest {
    pub roots: Vec<NodeHandle>,
}

impl NodeForest {
    pub fn new(roots: Vec<NodeHandle>) -> Self {
        Self { roots }
    }

    pub fn traverse<F>(&self, children_of: F) -> Vec<NodeHandle>
    where
        F: Fn(&NodeHandle) -> Vec<NodeHandle>,
    {
        traverse_bfs(self.roots.clone(), children_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::node::StatementNode;
    use std::cell::RefCell;

    fn leaf() -> NodeHandle {
        Rc::new(RefCell::new(StatementNode::no_op()))
    }

    #[test]
    fn bfs_visits_each_node_once_even_with_shared_children() {
        let shared = leaf();
        let root_a: NodeHandle = leaf();
        let root_b: NodeHandle = leaf();
        let roots = vec![root_a.clone(), root_b.clone()];

        let shared_for_a = shared.clone();
        let shared_for_b = shared.clone();
        let order = traverse_bfs(roots, move |n| {
            if Rc::ptr_eq(n, &root_a) {
                vec![shared_for_a.clone()]
            } else if Rc::ptr_eq(n, &root_b) {
                vec![shared_for_b.clone()]
            } else {
                vec![]
            }
        });

        assert_eq!(order.len(), 3, "shared child must be visited exactly once");
    }
}
