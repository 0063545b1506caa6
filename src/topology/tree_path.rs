//! Paths between two vertices of a [`SpanningTree`](super::spanning_tree::SpanningTree).

use crate::topology::bounds::GraphKey;
use itertools::Itertools;
use std::fmt;

/// Direction in which a tree edge is traversed along a path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathDirection {
    /// From child to parent (against the edge direction).
    Up,
    /// From parent to child (along the edge direction).
    Down,
}

/// The unique tree path between `source` and `target`.
///
/// `source_to_lca` lists the edges walked upward from `source` to the lowest
/// common ancestor; `target_to_lca` lists the edges walked upward from
/// `target`. The full walk is `source_to_lca` followed by `target_to_lca`
/// reversed (see [`TreePath::iter`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreePath<V: GraphKey, E: GraphKey> {
    source: V,
    target: V,
    source_to_lca: Vec<E>,
    target_to_lca: Vec<E>,
}

impl<V: GraphKey, E: GraphKey> TreePath<V, E> {
    pub(crate) fn new(source: V, target: V, source_to_lca: Vec<E>, target_to_lca: Vec<E>) -> Self {
        Self {
            source,
            target,
            source_to_lca,
            target_to_lca,
        }
    }

    #[inline]
    pub fn source(&self) -> V {
        self.source
    }

    #[inline]
    pub fn target(&self) -> V {
        self.target
    }

    #[inline]
    pub fn source_to_lca(&self) -> &[E] {
        &self.source_to_lca
    }

    #[inline]
    pub fn target_to_lca(&self) -> &[E] {
        &self.target_to_lca
    }

    /// Number of edges on the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.source_to_lca.len() + self.target_to_lca.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edges in walk order from `source` to `target`, with traversal direction.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (E, PathDirection)> + '_ {
        self.source_to_lca
            .iter()
            .map(|&e| (e, PathDirection::Up))
            .chain(
                self.target_to_lca
                    .iter()
                    .rev()
                    .map(|&e| (e, PathDirection::Down)),
            )
    }

    /// Direction in which `e` is traversed, or `None` if `e` is not on the path.
    pub fn direction_of(&self, e: E) -> Option<PathDirection> {
        if self.source_to_lca.contains(&e) {
            Some(PathDirection::Up)
        } else if self.target_to_lca.contains(&e) {
            Some(PathDirection::Down)
        } else {
            None
        }
    }
}

impl<V: GraphKey, E: GraphKey> fmt::Display for TreePath<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps = self
            .iter()
            .map(|(e, dir)| match dir {
                PathDirection::Up => format!("↑{e:?}"),
                PathDirection::Down => format!("↓{e:?}"),
            })
            .join(" ");
        write!(f, "{:?} → {:?} [{steps}]", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::{PathDirection, TreePath};

    #[test]
    fn walk_order_and_display() {
        let p = TreePath::new('d', 'e', vec![3, 1], vec![4]);
        let walk: Vec<_> = p.iter().collect();
        assert_eq!(
            walk,
            vec![
                (3, PathDirection::Up),
                (1, PathDirection::Up),
                (4, PathDirection::Down)
            ]
        );
        assert_eq!(p.direction_of(4), Some(PathDirection::Down));
        assert_eq!(p.direction_of(9), None);
        assert_eq!(p.to_string(), "'d' → 'e' [↑3 ↑1 ↓4]");
    }
}
