//! Rooted spanning-tree view over a [`DirectedGraph`].
//!
//! A [`SpanningTree`] selects `n - 1` edges of a graph so that every tree
//! vertex except the root has exactly one designated in-edge (its edge to the
//! parent). Edges are stored in construction order, which is always
//! parent-before-child; [`SpanningTree::tree_index`] is the depth of a vertex
//! (root = 1) and is therefore strictly increasing along every root-to-leaf
//! path. Ancestor, lowest-common-ancestor and path queries walk parent links
//! and cost **O(depth)**.
//!
//! The tree copies the endpoints of its edges at construction time, so it
//! stays valid as a snapshot even if the underlying graph is mutated
//! afterwards; rebuild it after any topology change.

use crate::debug_invariants::DebugInvariants;
use crate::mechanism_error::MechanismError;
use crate::topology::bounds::GraphKey;
use crate::topology::graph::DirectedGraph;
use crate::topology::tree_path::TreePath;
use hashbrown::{HashMap, HashSet};

/// Which frontier edge [`SpanningTree::from_root`] expands next.
///
/// Only the resulting parent/child relation is meaningful; the intra-level
/// order of the tree's edges is an implementation detail of the policy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FrontierPolicy {
    /// Expand the oldest frontier edge first (first available, insertion order).
    #[default]
    BreadthFirst,
    /// Expand the most recently discovered frontier edge first.
    DepthFirst,
}

/// A rooted tree over a subset of a graph's edges.
#[derive(Clone, Debug)]
pub struct SpanningTree<V: GraphKey, E: GraphKey> {
    root: V,
    /// Tree edges in construction (parent-before-child) order.
    edges: Vec<E>,
    sources: Vec<V>,
    targets: Vec<V>,
    /// Position of each tree edge in `edges`.
    edge_tree_index: HashMap<E, usize>,
    /// Root followed by the target of each edge in `edges`.
    vertices: Vec<V>,
    edge_to_parent: HashMap<V, E>,
    edges_to_children: HashMap<V, Vec<E>>,
    /// Depth of each tree vertex, root = 1.
    depth: HashMap<V, usize>,
}

impl<V: GraphKey, E: GraphKey> SpanningTree<V, E> {
    fn with_root(root: V, capacity: usize) -> Self {
        let mut depth = HashMap::with_capacity(capacity + 1);
        depth.insert(root, 1);
        let mut edges_to_children = HashMap::with_capacity(capacity + 1);
        edges_to_children.insert(root, Vec::new());
        Self {
            root,
            edges: Vec::with_capacity(capacity),
            sources: Vec::with_capacity(capacity),
            targets: Vec::with_capacity(capacity),
            edge_tree_index: HashMap::with_capacity(capacity),
            vertices: vec![root],
            edge_to_parent: HashMap::with_capacity(capacity),
            edges_to_children,
            depth,
        }
    }

    /// Appends `e: src → tgt`; `src` must already be a tree vertex and `tgt` must not.
    pub(crate) fn push_edge(&mut self, e: E, src: V, tgt: V) -> Result<(), MechanismError> {
        let parent_depth = match self.depth.get(&src) {
            Some(d) => *d,
            None => return Err(MechanismError::TreeEdgeOutOfOrder(format!("{e:?}"))),
        };
        if self.depth.contains_key(&tgt) {
            return Err(MechanismError::TreeEdgeRevisitsVertex(format!("{e:?}")));
        }
        self.edge_tree_index.insert(e, self.edges.len());
        self.edges.push(e);
        self.sources.push(src);
        self.targets.push(tgt);
        self.vertices.push(tgt);
        self.edge_to_parent.insert(tgt, e);
        self.edges_to_children.entry(src).or_default().push(e);
        self.edges_to_children.insert(tgt, Vec::new());
        self.depth.insert(tgt, parent_depth + 1);
        Ok(())
    }

    /// Builds a tree from an explicit edge sequence in parent-before-child order.
    ///
    /// The root is the source of the first edge (or the only vertex of a
    /// single-vertex graph).
    ///
    /// # Errors
    /// - [`MechanismError::EmptyGraph`] if the graph has no vertices.
    /// - [`MechanismError::WrongTreeEdgeCount`] unless `edges.len() == n - 1`.
    /// - [`MechanismError::MissingEdge`] if an edge is not in the graph.
    /// - [`MechanismError::TreeEdgeOutOfOrder`] if an edge's source has not
    ///   been reached by an earlier edge.
    /// - [`MechanismError::TreeEdgeRevisitsVertex`] if an edge's target is
    ///   already in the tree.
    pub fn new<I>(graph: &DirectedGraph<V, E>, edges: I) -> Result<Self, MechanismError>
    where
        I: IntoIterator<Item = E>,
    {
        let edges: Vec<E> = edges.into_iter().collect();
        let n = graph.num_vertices();
        if n == 0 {
            return Err(MechanismError::EmptyGraph);
        }
        if edges.len() != n - 1 {
            return Err(MechanismError::WrongTreeEdgeCount {
                expected: n - 1,
                found: edges.len(),
            });
        }
        let root = match edges.first() {
            Some(&e) => graph.source(e)?,
            None => graph.vertices()[0],
        };
        let mut tree = Self::with_root(root, edges.len());
        for e in edges {
            tree.push_edge(e, graph.source(e)?, graph.target(e)?)?;
        }
        log::debug!(
            "spanning tree built from edge list: root={root:?}, {} vertices",
            tree.vertices.len()
        );
        tree.debug_assert_invariants();
        Ok(tree)
    }

    /// Grows a tree from `root` by frontier expansion using a built-in policy.
    ///
    /// # Example
    /// ```rust
    /// use multibody_tree::topology::graph::DirectedGraph;
    /// use multibody_tree::topology::spanning_tree::{FrontierPolicy, SpanningTree};
    /// let g = DirectedGraph::<u32, u32>::from_edges([(1, 2, 10), (2, 3, 11)]).unwrap();
    /// let t = SpanningTree::from_root(&g, 1, FrontierPolicy::default()).unwrap();
    /// assert_eq!(t.tree_index(3).unwrap(), 3);
    /// ```
    pub fn from_root(
        graph: &DirectedGraph<V, E>,
        root: V,
        policy: FrontierPolicy,
    ) -> Result<Self, MechanismError> {
        match policy {
            FrontierPolicy::BreadthFirst => Self::from_root_with(graph, root, |_| 0),
            FrontierPolicy::DepthFirst => {
                Self::from_root_with(graph, root, |frontier| frontier.len() - 1)
            }
        }
    }

    /// Grows a tree from `root`; `select` picks the index of the next frontier
    /// edge to add. It is only called with a non-empty frontier and must
    /// return an index into it.
    ///
    /// The tree spans every vertex reachable from `root`.
    pub fn from_root_with<F>(
        graph: &DirectedGraph<V, E>,
        root: V,
        mut select: F,
    ) -> Result<Self, MechanismError>
    where
        F: FnMut(&[E]) -> usize,
    {
        let mut frontier: Vec<E> = graph.out_edges(root)?.to_vec();
        let mut tree = Self::with_root(root, graph.num_vertices().saturating_sub(1));
        // self loops on the root never enter the tree
        frontier.retain(|&e| graph.target(e).map_or(false, |t| t != root));

        while !frontier.is_empty() {
            let pick = select(&frontier).min(frontier.len() - 1);
            let e = frontier.remove(pick);
            let (src, child) = (graph.source(e)?, graph.target(e)?);
            tree.push_edge(e, src, child)?;

            let child_in = graph.in_edges(child)?;
            frontier.retain(|f| !child_in.contains(f));
            for &out in graph.out_edges(child)? {
                if !tree.depth.contains_key(&graph.target(out)?) {
                    frontier.push(out);
                }
            }
        }

        if tree.vertices.len() != graph.num_vertices() {
            log::warn!(
                "spanning tree rooted at {root:?} reaches {} of {} graph vertices",
                tree.vertices.len(),
                graph.num_vertices()
            );
        } else {
            log::debug!(
                "spanning tree grown from root={root:?}, {} vertices",
                tree.vertices.len()
            );
        }
        tree.debug_assert_invariants();
        Ok(tree)
    }

    #[inline]
    pub fn root(&self) -> V {
        self.root
    }

    /// Tree edges in parent-before-child order.
    #[inline]
    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    /// Tree vertices in parent-before-child order, root first.
    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn contains_vertex(&self, v: V) -> bool {
        self.depth.contains_key(&v)
    }

    #[inline]
    pub fn contains_edge(&self, e: E) -> bool {
        self.edge_tree_index.contains_key(&e)
    }

    fn not_in_tree<K: std::fmt::Debug>(k: K) -> MechanismError {
        MechanismError::NotInTree(format!("{k:?}"))
    }

    /// Position of `e` in [`edges`](Self::edges).
    pub fn edge_tree_index(&self, e: E) -> Result<usize, MechanismError> {
        self.edge_tree_index
            .get(&e)
            .copied()
            .ok_or_else(|| Self::not_in_tree(e))
    }

    pub fn source(&self, e: E) -> Result<V, MechanismError> {
        Ok(self.sources[self.edge_tree_index(e)?])
    }

    pub fn target(&self, e: E) -> Result<V, MechanismError> {
        Ok(self.targets[self.edge_tree_index(e)?])
    }

    /// Depth of `v` in the tree: 1 for the root, `tree_index(parent) + 1` otherwise.
    pub fn tree_index(&self, v: V) -> Result<usize, MechanismError> {
        self.depth.get(&v).copied().ok_or_else(|| Self::not_in_tree(v))
    }

    /// The edge from `v`'s parent to `v`; `None` for the root.
    pub fn edge_to_parent(&self, v: V) -> Result<Option<E>, MechanismError> {
        if !self.contains_vertex(v) {
            return Err(Self::not_in_tree(v));
        }
        Ok(self.edge_to_parent.get(&v).copied())
    }

    pub fn parent(&self, v: V) -> Result<Option<V>, MechanismError> {
        match self.edge_to_parent(v)? {
            Some(e) => Ok(Some(self.source(e)?)),
            None => Ok(None),
        }
    }

    /// Tree edges from `v` to its children, in tree order.
    pub fn edges_to_children(&self, v: V) -> Result<&[E], MechanismError> {
        self.edges_to_children
            .get(&v)
            .map(Vec::as_slice)
            .ok_or_else(|| Self::not_in_tree(v))
    }

    pub fn children(&self, v: V) -> Result<impl Iterator<Item = V> + Clone + '_, MechanismError> {
        let edges = self.edges_to_children(v)?;
        Ok(edges
            .iter()
            .map(move |e| self.targets[self.edge_tree_index[e]]))
    }

    fn parent_unchecked(&self, v: V) -> Result<V, MechanismError> {
        self.parent(v)?.ok_or_else(|| Self::not_in_tree(v))
    }

    /// `v`, its parent, …, up to and including the root.
    pub fn ancestors(&self, v: V) -> Result<Vec<V>, MechanismError> {
        let mut out = Vec::with_capacity(self.tree_index(v)?);
        let mut cur = Some(v);
        while let Some(x) = cur {
            out.push(x);
            cur = self.parent(x)?;
        }
        Ok(out)
    }

    /// `v` and all of its descendants, in tree order.
    pub fn subtree_vertices(&self, v: V) -> Result<Vec<V>, MechanismError> {
        let mut out = vec![v];
        let mut next = 0;
        self.tree_index(v)?;
        while next < out.len() {
            let cur = out[next];
            out.extend(self.children(cur)?);
            next += 1;
        }
        Ok(out)
    }

    /// Deepest vertex that is an ancestor of (or equal to) both `v1` and `v2`.
    ///
    /// Repeatedly replaces whichever vertex has the larger tree index by its
    /// parent (moving `v1` on ties) until both coincide.
    pub fn lowest_common_ancestor(&self, mut v1: V, mut v2: V) -> Result<V, MechanismError> {
        while v1 != v2 {
            if self.tree_index(v1)? >= self.tree_index(v2)? {
                v1 = self.parent_unchecked(v1)?;
            } else {
                v2 = self.parent_unchecked(v2)?;
            }
        }
        Ok(v1)
    }

    /// The unique tree path from `src` to `target`.
    ///
    /// # Example
    /// ```rust
    /// use multibody_tree::topology::graph::DirectedGraph;
    /// use multibody_tree::topology::spanning_tree::{FrontierPolicy, SpanningTree};
    /// let g = DirectedGraph::<char, u32>::from_edges([('a', 'b', 1), ('b', 'c', 2)]).unwrap();
    /// let t = SpanningTree::from_root(&g, 'a', FrontierPolicy::default()).unwrap();
    /// let p = t.path('c', 'a').unwrap();
    /// assert_eq!(p.source_to_lca(), &[2, 1]);
    /// assert!(p.target_to_lca().is_empty());
    /// ```
    pub fn path(&self, src: V, target: V) -> Result<TreePath<V, E>, MechanismError> {
        let mut source_to_lca = Vec::new();
        let mut target_to_lca = Vec::new();
        let (mut a, mut b) = (src, target);
        while a != b {
            if self.tree_index(a)? >= self.tree_index(b)? {
                let e = self.edge_to_parent(a)?.ok_or_else(|| Self::not_in_tree(a))?;
                source_to_lca.push(e);
                a = self.source(e)?;
            } else {
                let e = self.edge_to_parent(b)?.ok_or_else(|| Self::not_in_tree(b))?;
                target_to_lca.push(e);
                b = self.source(e)?;
            }
        }
        Ok(TreePath::new(src, target, source_to_lca, target_to_lca))
    }
}

impl<V: GraphKey, E: GraphKey> DebugInvariants for SpanningTree<V, E> {
    fn validate_invariants(&self) -> Result<(), MechanismError> {
        if self.vertices.len() != self.edges.len() + 1 {
            return Err(MechanismError::WrongTreeEdgeCount {
                expected: self.vertices.len().saturating_sub(1),
                found: self.edges.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if !seen.insert(*v) {
                return Err(MechanismError::DuplicateVertex(format!("{v:?}")));
            }
        }
        for (i, e) in self.edges.iter().enumerate() {
            let (src, tgt) = (self.sources[i], self.targets[i]);
            if self.edge_tree_index.get(e) != Some(&i) || self.edge_to_parent.get(&tgt) != Some(e)
            {
                return Err(Self::not_in_tree(*e));
            }
            if self.tree_index(tgt)? != self.tree_index(src)? + 1 {
                return Err(MechanismError::TreeEdgeOutOfOrder(format!("{e:?}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FrontierPolicy, SpanningTree};
    use crate::mechanism_error::MechanismError;
    use crate::topology::graph::DirectedGraph;

    fn chain() -> DirectedGraph<char, u32> {
        DirectedGraph::from_edges([('a', 'b', 1), ('b', 'c', 2)]).unwrap()
    }

    /// a → b → {c, d}, a → e, plus a non-tree edge c → e.
    fn branched() -> DirectedGraph<char, u32> {
        DirectedGraph::from_edges([
            ('a', 'b', 1),
            ('b', 'c', 2),
            ('b', 'd', 3),
            ('a', 'e', 4),
            ('c', 'e', 5),
        ])
        .unwrap()
    }

    #[test]
    fn chain_tree_indices_lca_and_path() {
        let g = chain();
        let t = SpanningTree::from_root(&g, 'a', FrontierPolicy::default()).unwrap();
        assert_eq!(t.tree_index('a').unwrap(), 1);
        assert_eq!(t.tree_index('b').unwrap(), 2);
        assert_eq!(t.tree_index('c').unwrap(), 3);
        assert_eq!(t.lowest_common_ancestor('b', 'c').unwrap(), 'b');
        let p = t.path('c', 'a').unwrap();
        assert_eq!(p.source_to_lca(), &[2, 1]);
        assert!(p.target_to_lca().is_empty());
    }

    #[test]
    fn explicit_edge_list_validation() {
        let g = chain();
        assert_eq!(
            SpanningTree::new(&g, [1]).unwrap_err(),
            MechanismError::WrongTreeEdgeCount {
                expected: 2,
                found: 1
            }
        );
        assert!(matches!(
            SpanningTree::new(&g, [2, 1]),
            Err(MechanismError::TreeEdgeOutOfOrder(_))
        ));
        let t = SpanningTree::new(&g, [1, 2]).unwrap();
        assert_eq!(t.root(), 'a');
        assert_eq!(t.edge_tree_index(2).unwrap(), 1);
    }

    #[test]
    fn frontier_growth_skips_redundant_edges() {
        let g = branched();
        for policy in [FrontierPolicy::BreadthFirst, FrontierPolicy::DepthFirst] {
            let t = SpanningTree::from_root(&g, 'a', policy).unwrap();
            assert_eq!(t.num_vertices(), 5);
            assert_eq!(t.num_edges(), 4);
            assert_eq!(t.parent('c').unwrap(), Some('b'));
            assert_eq!(t.parent('a').unwrap(), None);
            // e is reached either directly from a or through c
            let pe = t.parent('e').unwrap().unwrap();
            assert!(pe == 'a' || pe == 'c');
        }
        let bfs = SpanningTree::from_root(&g, 'a', FrontierPolicy::BreadthFirst).unwrap();
        assert_eq!(bfs.parent('e').unwrap(), Some('a'));
    }

    #[test]
    fn custom_selector_is_honored() {
        let g = branched();
        // prefer the non-tree-shortcut edge 5 whenever available
        let t = SpanningTree::from_root_with(&g, 'a', |frontier| {
            frontier.iter().position(|&e| e == 5).unwrap_or(0)
        })
        .unwrap();
        // with BFS order e is reached from a before c is expanded
        assert_eq!(t.parent('e').unwrap(), Some('a'));
        let dfs_like = SpanningTree::from_root_with(&g, 'a', |frontier| {
            frontier.iter().position(|&e| e != 4).unwrap_or(0)
        })
        .unwrap();
        assert_eq!(dfs_like.parent('e').unwrap(), Some('c'));
    }

    #[test]
    fn ancestors_subtree_and_children() {
        let g = branched();
        let t = SpanningTree::from_root(&g, 'a', FrontierPolicy::BreadthFirst).unwrap();
        assert_eq!(t.ancestors('d').unwrap(), vec!['d', 'b', 'a']);
        let mut sub = t.subtree_vertices('b').unwrap();
        sub.sort();
        assert_eq!(sub, vec!['b', 'c', 'd']);
        let kids: Vec<_> = t.children('b').unwrap().collect();
        assert_eq!(kids, vec!['c', 'd']);
        assert_eq!(t.lowest_common_ancestor('c', 'd').unwrap(), 'b');
        assert_eq!(t.lowest_common_ancestor('d', 'e').unwrap(), 'a');
    }

    #[test]
    fn path_between_cousins() {
        let g = branched();
        let t = SpanningTree::from_root(&g, 'a', FrontierPolicy::BreadthFirst).unwrap();
        let p = t.path('d', 'e').unwrap();
        assert_eq!(p.source_to_lca(), &[3, 1]);
        assert_eq!(p.target_to_lca(), &[4]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn unknown_vertex_is_reported() {
        let g = chain();
        let t = SpanningTree::from_root(&g, 'a', FrontierPolicy::default()).unwrap();
        assert!(matches!(t.tree_index('z'), Err(MechanismError::NotInTree(_))));
        assert!(t.path('a', 'z').is_err());
    }
}
