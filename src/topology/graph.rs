//! Indexed directed graph over abstract vertex/edge handles.
//!
//! [`DirectedGraph`] stores vertices and edges in dense arrays and keeps a
//! handle → index map for each, so every lookup is **O(1)**. Per-edge
//! endpoints and per-vertex incident edge lists are parallel arrays indexed by
//! those dense indices.
//!
//! # Invariants
//! - `vertex_index(v)` is `Some(i)` iff `v` is a member, and `vertices()[i] == v`;
//!   indices are dense in `0..num_vertices()`. Same for edges.
//! - Every edge's source and target are members of the vertex list.
//! - `e ∈ out_edges(source(e))` and `e ∈ in_edges(target(e))`, and no other
//!   incident list mentions `e`.
//!
//! Removal compacts the arrays and re-stamps every index above the removed one.
//! That is **O(n)**; mechanism topologies are built once and rarely mutated.

use crate::debug_invariants::DebugInvariants;
use crate::mechanism_error::MechanismError;
use crate::topology::bounds::GraphKey;
use hashbrown::HashMap;

/// Mutable directed multigraph with O(1) index-based lookups.
#[derive(Clone, Debug)]
pub struct DirectedGraph<V: GraphKey, E: GraphKey> {
    vertices: Vec<V>,
    vertex_index: HashMap<V, usize>,
    edges: Vec<E>,
    edge_index: HashMap<E, usize>,
    /// Source vertex per edge index.
    sources: Vec<V>,
    /// Target vertex per edge index.
    targets: Vec<V>,
    /// Incoming edges per vertex index.
    in_edges: Vec<Vec<E>>,
    /// Outgoing edges per vertex index.
    out_edges: Vec<Vec<E>>,
}

impl<V: GraphKey, E: GraphKey> Default for DirectedGraph<V, E> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            vertex_index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            sources: Vec::new(),
            targets: Vec::new(),
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }
}

impl<V: GraphKey, E: GraphKey> DirectedGraph<V, E> {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(source, target, edge)` triples, adding endpoints as needed.
    ///
    /// # Example
    /// ```rust
    /// use multibody_tree::topology::graph::DirectedGraph;
    /// let g = DirectedGraph::<u32, char>::from_edges([(1, 2, 'a'), (2, 3, 'b')]).unwrap();
    /// assert_eq!(g.num_vertices(), 3);
    /// assert_eq!(g.source('b').unwrap(), 2);
    /// ```
    pub fn from_edges<I>(edges: I) -> Result<Self, MechanismError>
    where
        I: IntoIterator<Item = (V, V, E)>,
    {
        let mut g = Self::default();
        for (src, tgt, e) in edges {
            g.add_edge(src, tgt, e)?;
        }
        Ok(g)
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// All vertices, in index order.
    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// All edges, in index order.
    #[inline]
    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    /// Dense index of `v`, or `None` if `v` is not a member.
    #[inline]
    pub fn vertex_index(&self, v: V) -> Option<usize> {
        self.vertex_index.get(&v).copied()
    }

    /// Dense index of `e`, or `None` if `e` is not a member.
    #[inline]
    pub fn edge_index(&self, e: E) -> Option<usize> {
        self.edge_index.get(&e).copied()
    }

    #[inline]
    pub fn contains_vertex(&self, v: V) -> bool {
        self.vertex_index.contains_key(&v)
    }

    #[inline]
    pub fn contains_edge(&self, e: E) -> bool {
        self.edge_index.contains_key(&e)
    }

    fn require_vertex(&self, v: V) -> Result<usize, MechanismError> {
        self.vertex_index(v)
            .ok_or_else(|| MechanismError::MissingVertex(format!("{v:?}")))
    }

    fn require_edge(&self, e: E) -> Result<usize, MechanismError> {
        self.edge_index(e)
            .ok_or_else(|| MechanismError::MissingEdge(format!("{e:?}")))
    }

    pub fn source(&self, e: E) -> Result<V, MechanismError> {
        Ok(self.sources[self.require_edge(e)?])
    }

    pub fn target(&self, e: E) -> Result<V, MechanismError> {
        Ok(self.targets[self.require_edge(e)?])
    }

    pub fn in_edges(&self, v: V) -> Result<&[E], MechanismError> {
        Ok(&self.in_edges[self.require_vertex(v)?])
    }

    pub fn out_edges(&self, v: V) -> Result<&[E], MechanismError> {
        Ok(&self.out_edges[self.require_vertex(v)?])
    }

    /// Lazy sequence of targets of `v`'s out-edges. The iterator is `Clone`, so
    /// it can be restarted.
    ///
    /// # Example
    /// ```rust
    /// use multibody_tree::topology::graph::DirectedGraph;
    /// let g = DirectedGraph::<u32, u32>::from_edges([(1, 2, 10), (1, 3, 11)]).unwrap();
    /// let mut n: Vec<_> = g.out_neighbors(1).unwrap().collect();
    /// n.sort();
    /// assert_eq!(n, vec![2, 3]);
    /// ```
    pub fn out_neighbors(
        &self,
        v: V,
    ) -> Result<impl Iterator<Item = V> + Clone + '_, MechanismError> {
        let edges = self.out_edges(v)?;
        Ok(edges.iter().map(move |e| self.targets[self.edge_index[e]]))
    }

    /// Lazy sequence of sources of `v`'s in-edges.
    pub fn in_neighbors(
        &self,
        v: V,
    ) -> Result<impl Iterator<Item = V> + Clone + '_, MechanismError> {
        let edges = self.in_edges(v)?;
        Ok(edges.iter().map(move |e| self.sources[self.edge_index[e]]))
    }

    /// Appends `v` with a fresh index and empty incident edge lists.
    ///
    /// # Errors
    /// [`MechanismError::DuplicateVertex`] if `v` is already a member.
    pub fn add_vertex(&mut self, v: V) -> Result<(), MechanismError> {
        if self.contains_vertex(v) {
            return Err(MechanismError::DuplicateVertex(format!("{v:?}")));
        }
        self.vertex_index.insert(v, self.vertices.len());
        self.vertices.push(v);
        self.in_edges.push(Vec::new());
        self.out_edges.push(Vec::new());
        Ok(())
    }

    /// Adds edge `e` from `src` to `tgt`, adding either endpoint if absent.
    ///
    /// # Errors
    /// [`MechanismError::DuplicateEdge`] if `e` is already a member; the graph
    /// is not modified in that case.
    pub fn add_edge(&mut self, src: V, tgt: V, e: E) -> Result<(), MechanismError> {
        if self.contains_edge(e) {
            return Err(MechanismError::DuplicateEdge(format!("{e:?}")));
        }
        if !self.contains_vertex(src) {
            self.add_vertex(src)?;
        }
        if !self.contains_vertex(tgt) {
            self.add_vertex(tgt)?;
        }
        self.edge_index.insert(e, self.edges.len());
        self.edges.push(e);
        self.sources.push(src);
        self.targets.push(tgt);
        let (si, ti) = (self.vertex_index[&src], self.vertex_index[&tgt]);
        self.out_edges[si].push(e);
        self.in_edges[ti].push(e);
        self.debug_assert_invariants();
        Ok(())
    }

    /// Removes a fully disconnected vertex and compacts vertex indices.
    ///
    /// # Errors
    /// - [`MechanismError::MissingVertex`] if `v` is not a member.
    /// - [`MechanismError::VertexHasIncidentEdges`] if `v` still has in- or
    ///   out-edges; the graph is not modified.
    pub fn remove_vertex(&mut self, v: V) -> Result<(), MechanismError> {
        let idx = self.require_vertex(v)?;
        let (n_in, n_out) = (self.in_edges[idx].len(), self.out_edges[idx].len());
        if n_in > 0 || n_out > 0 {
            return Err(MechanismError::VertexHasIncidentEdges {
                vertex: format!("{v:?}"),
                in_edges: n_in,
                out_edges: n_out,
            });
        }
        self.vertices.remove(idx);
        self.in_edges.remove(idx);
        self.out_edges.remove(idx);
        self.vertex_index.remove(&v);
        for (i, moved) in self.vertices.iter().enumerate().skip(idx) {
            self.vertex_index.insert(*moved, i);
        }
        self.debug_assert_invariants();
        Ok(())
    }

    /// Detaches `e` from its endpoints and compacts edge indices.
    pub fn remove_edge(&mut self, e: E) -> Result<(), MechanismError> {
        let idx = self.require_edge(e)?;
        let (src, tgt) = (self.sources[idx], self.targets[idx]);
        self.detach(e, src, tgt);
        self.edges.remove(idx);
        self.sources.remove(idx);
        self.targets.remove(idx);
        self.edge_index.remove(&e);
        for (i, moved) in self.edges.iter().enumerate().skip(idx) {
            self.edge_index.insert(*moved, i);
        }
        self.debug_assert_invariants();
        Ok(())
    }

    /// Moves `e`'s incidence records to `(new_src, new_tgt)`, keeping its index.
    ///
    /// # Errors
    /// [`MechanismError::MissingEdge`] / [`MechanismError::MissingVertex`] if
    /// `e` or one of the new endpoints is not a member; nothing is modified.
    pub fn rewire(&mut self, e: E, new_src: V, new_tgt: V) -> Result<(), MechanismError> {
        let idx = self.require_edge(e)?;
        let si = self.require_vertex(new_src)?;
        let ti = self.require_vertex(new_tgt)?;
        let (old_src, old_tgt) = (self.sources[idx], self.targets[idx]);
        self.detach(e, old_src, old_tgt);
        self.sources[idx] = new_src;
        self.targets[idx] = new_tgt;
        self.out_edges[si].push(e);
        self.in_edges[ti].push(e);
        self.debug_assert_invariants();
        Ok(())
    }

    /// Swaps the endpoints of `e`.
    pub fn reverse_edge(&mut self, e: E) -> Result<(), MechanismError> {
        let (src, tgt) = (self.source(e)?, self.target(e)?);
        self.rewire(e, tgt, src)
    }

    fn detach(&mut self, e: E, src: V, tgt: V) {
        let (si, ti) = (self.vertex_index[&src], self.vertex_index[&tgt]);
        if let Some(pos) = self.out_edges[si].iter().position(|x| *x == e) {
            self.out_edges[si].remove(pos);
        }
        if let Some(pos) = self.in_edges[ti].iter().position(|x| *x == e) {
            self.in_edges[ti].remove(pos);
        }
    }
}

impl<V: GraphKey, E: GraphKey> DebugInvariants for DirectedGraph<V, E> {
    fn validate_invariants(&self) -> Result<(), MechanismError> {
        let nv = self.vertices.len();
        let ne = self.edges.len();
        if self.vertex_index.len() != nv || self.in_edges.len() != nv || self.out_edges.len() != nv
        {
            return Err(MechanismError::dims("vertex arrays", nv, self.vertex_index.len()));
        }
        if self.edge_index.len() != ne || self.sources.len() != ne || self.targets.len() != ne {
            return Err(MechanismError::dims("edge arrays", ne, self.edge_index.len()));
        }
        for (i, v) in self.vertices.iter().enumerate() {
            if self.vertex_index.get(v) != Some(&i) {
                return Err(MechanismError::MissingVertex(format!("{v:?}")));
            }
        }
        for (i, e) in self.edges.iter().enumerate() {
            if self.edge_index.get(e) != Some(&i) {
                return Err(MechanismError::MissingEdge(format!("{e:?}")));
            }
            let si = self.require_vertex(self.sources[i])?;
            let ti = self.require_vertex(self.targets[i])?;
            if !self.out_edges[si].contains(e) || !self.in_edges[ti].contains(e) {
                return Err(MechanismError::MissingEdge(format!("{e:?}")));
            }
        }
        let incident: usize = self.out_edges.iter().map(Vec::len).sum();
        let incoming: usize = self.in_edges.iter().map(Vec::len).sum();
        if incident != ne || incoming != ne {
            return Err(MechanismError::dims("incident edge records", ne, incident.max(incoming)));
        }
        Ok(())
    }
}
