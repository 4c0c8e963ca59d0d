//! Graph model shared by the DOT parser and the IR extractor.
//!
//! Vertices are keyed by name and kept in insertion order; edges refer to
//! vertices by [`VertexId`], which can only be obtained from the graph that
//! owns the vertex, so an edge can never point at a missing vertex.

use indexmap::IndexMap;

/// Insertion index of a vertex within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub name: String,
    /// Text shown for the vertex; starts out equal to the name.
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub src: VertexId,
    pub dst: VertexId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    vertices: IndexMap<String, Vertex>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a vertex by name, creating it on first use.
    pub fn vertex(&mut self, name: &str) -> VertexId {
        if let Some(index) = self.vertices.get_index_of(name) {
            return VertexId(index);
        }
        let (index, _) = self.vertices.insert_full(
            name.to_owned(),
            Vertex {
                name: name.to_owned(),
                label: name.to_owned(),
            },
        );
        VertexId(index)
    }

    /// Append an edge. Repeated edges are kept.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId) {
        self.edges.push(Edge { src, dst });
    }

    pub fn set_label(&mut self, id: VertexId, label: impl Into<String>) {
        if let Some((_, vertex)) = self.vertices.get_index_mut(id.0) {
            vertex.label = label.into();
        }
    }

    pub fn get(&self, name: &str) -> Option<&Vertex> {
        self.vertices.get(name)
    }

    pub fn id_of(&self, name: &str) -> Option<VertexId> {
        self.vertices.get_index_of(name).map(VertexId)
    }

    pub fn vertex_at(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.values().enumerate().map(|(i, v)| (VertexId(i), v))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges as `(src name, dst name)` pairs, in insertion order.
    pub fn edge_names(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|e| {
                (
                    self.vertex_at(e.src).name.as_str(),
                    self.vertex_at(e.dst).name.as_str(),
                )
            })
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }
}
