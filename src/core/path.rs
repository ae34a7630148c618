//! Nearest-common-ancestor path resolution.
//!
//! Moving between two nodes exits every level from the source up to (but
//! not including) their nearest common ancestor, then enters every level
//! from just below that ancestor down to the target. All functions here
//! are pure.

use super::node::NodeId;
use super::registry::StateRegistry;
use super::state::State;

/// How many levels a transition exits and enters.
///
/// Level 0 is the state itself, so `exit_depth == 1` means only the
/// source is exited and `enter_depth == 0` means nothing is entered
/// (the target is the common ancestor).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathDepths {
    pub exit_depth: usize,
    pub enter_depth: usize,
}

/// Compute exit and enter depths between `from` and `to`.
///
/// Each ancestor of `from` (nearest first) is looked up in the chain of
/// `to` (nearest first); the first hit is the common ancestor. Disjoint
/// hierarchies have no hit, in which case both chains are walked in full.
pub fn resolve_path<T: State>(registry: &StateRegistry<T>, from: NodeId, to: NodeId) -> PathDepths {
    let to_chain: Vec<NodeId> = registry.chain(to).collect();
    let mut exit_depth = 0;

    for candidate in registry.chain(from) {
        if let Some(enter_depth) = to_chain.iter().position(|node| *node == candidate) {
            return PathDepths {
                exit_depth,
                enter_depth,
            };
        }
        exit_depth += 1;
    }

    PathDepths {
        exit_depth,
        enter_depth: to_chain.len(),
    }
}

/// Nodes whose hooks run for one state change, in dispatch order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPath {
    /// Innermost first: the source, then its ancestors.
    pub exits: Vec<NodeId>,
    /// Outermost first: ancestors below the common one, then the target.
    pub enters: Vec<NodeId>,
}

impl TransitionPath {
    /// Hook plan for a state change. With no source (initialization) the
    /// whole ancestor chain of `to` is entered, root first.
    pub fn plan<T: State>(registry: &StateRegistry<T>, from: Option<NodeId>, to: NodeId) -> Self {
        let depths = match from {
            Some(from) => resolve_path(registry, from, to),
            None => PathDepths {
                exit_depth: 0,
                enter_depth: registry.chain(to).count(),
            },
        };

        let exits = match from {
            Some(from) => registry.chain(from).take(depths.exit_depth).collect(),
            None => Vec::new(),
        };
        let mut enters: Vec<NodeId> = registry.chain(to).take(depths.enter_depth).collect();
        enters.reverse();

        Self { exits, enters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::StateDefinition;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum S {
        Initial,
        Open,
        OpenHalf,
        OpenCompletely,
        Close,
        CloseLocked,
        CloseUnlocked,
        Deep,
    }

    // Initial
    // Open -> OpenHalf, OpenCompletely
    // Close -> CloseLocked -> Deep
    //       -> CloseUnlocked
    fn registry() -> StateRegistry<S> {
        let mut registry = StateRegistry::new();
        for (state, parent) in [
            (S::Initial, None),
            (S::Open, None),
            (S::OpenHalf, Some(S::Open)),
            (S::OpenCompletely, Some(S::Open)),
            (S::Close, None),
            (S::CloseLocked, Some(S::Close)),
            (S::CloseUnlocked, Some(S::Close)),
            (S::Deep, Some(S::CloseLocked)),
        ] {
            let mut def = StateDefinition::new(state);
            def.parent = parent;
            registry.register(def).unwrap();
        }
        registry
    }

    fn depths(registry: &StateRegistry<S>, from: S, to: S) -> (usize, usize) {
        let from = registry.id_of(&from).unwrap();
        let to = registry.id_of(&to).unwrap();
        let depths = resolve_path(registry, from, to);
        (depths.exit_depth, depths.enter_depth)
    }

    fn plan(registry: &StateRegistry<S>, from: Option<S>, to: S) -> (Vec<S>, Vec<S>) {
        let from = from.map(|f| registry.id_of(&f).unwrap());
        let to = registry.id_of(&to).unwrap();
        let path = TransitionPath::plan(registry, from, to);
        let names = |ids: &[NodeId]| {
            ids.iter()
                .map(|id| registry.node_by_id(*id).unwrap().identity().clone())
                .collect::<Vec<_>>()
        };
        (names(&path.exits), names(&path.enters))
    }

    #[test]
    fn same_node_has_zero_depths() {
        let registry = registry();
        assert_eq!(depths(&registry, S::Open, S::Open), (0, 0));
    }

    #[test]
    fn siblings_meet_at_parent() {
        let registry = registry();
        assert_eq!(depths(&registry, S::OpenHalf, S::OpenCompletely), (1, 1));
    }

    #[test]
    fn child_to_parent_enters_nothing() {
        let registry = registry();
        assert_eq!(depths(&registry, S::OpenHalf, S::Open), (1, 0));
    }

    #[test]
    fn parent_to_child_exits_nothing() {
        let registry = registry();
        assert_eq!(depths(&registry, S::Close, S::Deep), (0, 2));
    }

    #[test]
    fn cousins_meet_at_grandparent() {
        let registry = registry();
        assert_eq!(depths(&registry, S::Deep, S::CloseUnlocked), (2, 1));
    }

    #[test]
    fn disjoint_trees_walk_both_chains() {
        let registry = registry();
        assert_eq!(depths(&registry, S::Deep, S::OpenHalf), (3, 2));
        assert_eq!(depths(&registry, S::Initial, S::Open), (1, 1));
    }

    #[test]
    fn plan_orders_exits_inside_out_and_enters_outside_in() {
        let registry = registry();

        let (exits, enters) = plan(&registry, Some(S::Deep), S::OpenHalf);

        assert_eq!(exits, vec![S::Deep, S::CloseLocked, S::Close]);
        assert_eq!(enters, vec![S::Open, S::OpenHalf]);
    }

    #[test]
    fn plan_skips_common_ancestor() {
        let registry = registry();

        let (exits, enters) = plan(&registry, Some(S::Deep), S::CloseUnlocked);

        assert_eq!(exits, vec![S::Deep, S::CloseLocked]);
        assert_eq!(enters, vec![S::CloseUnlocked]);
    }

    #[test]
    fn plan_without_source_enters_full_chain() {
        let registry = registry();

        let (exits, enters) = plan(&registry, None, S::Deep);

        assert!(exits.is_empty());
        assert_eq!(enters, vec![S::Close, S::CloseLocked, S::Deep]);
    }
}
