//! Core graph capabilities.
//!
//! Every algorithm in this crate is written against the smallest sufficient
//! composition of the traits below, so a single generic routine serves every
//! graph that satisfies them. Concrete graphs live in [`crate::adjacency`]
//! and [`crate::grid`]; property maps, which decouple per-vertex and
//! per-edge state from the graph's own storage, live in [`crate::property`].

use std::fmt::Debug;
use std::hash::Hash;

use noisy_float::prelude::N64;

/// Raw identifier usable as a dense array index.
///
/// Table property maps, mailboxes, and the adjacency lists are all indexed
/// by values of a `DenseId` type. Conversions are infallible within the
/// graph that issued the id; converting an id the graph never issued is a
/// programmer error.
pub trait DenseId: Copy + Eq + Ord + Hash + Debug {
	fn from_usize(index: usize) -> Self;
	fn index(self) -> usize;
}

macro_rules! dense_id {
	($($t:ty),*) => {
		$(impl DenseId for $t {
			fn from_usize(index: usize) -> Self {
				index as $t
			}
			fn index(self) -> usize {
				self as usize
			}
		})*
	};
}
dense_id!(u8, u16, u32, u64, usize);

/// A graph: a namespace of vertex and edge identifiers.
///
/// Identifiers are opaque equatable values issued by the graph itself;
/// algorithms never synthesize them. Ids are stable across additions but
/// may be invalidated by removals.
pub trait Graph {
	/// Vertex identifier
	type VId: Copy + Eq;
	/// Edge identifier
	type EId: Copy + Eq;
}

/// A graph that can enumerate its vertices.
pub trait VertexList: Graph {
	type Vertices<'g>: Iterator<Item = Self::VId>
	where
		Self: 'g;
	/// All vertices, in the graph's canonical order
	fn vertices(&self) -> Self::Vertices<'_>;
	/// Number of vertices
	fn vertex_count(&self) -> usize {
		self.vertices().count()
	}
}

/// A graph that can enumerate the outgoing edges of a vertex.
pub trait Incidence: Graph {
	type OutEdges<'g>: Iterator<Item = Self::EId>
	where
		Self: 'g;
	/// Outgoing edges of `vertex`, lazily
	fn edges_from(&self, vertex: Self::VId) -> Self::OutEdges<'_>;
	/// Originating vertex of `edge`
	fn source(&self, edge: Self::EId) -> Self::VId;
	/// Vertex `edge` points at
	fn destination(&self, edge: Self::EId) -> Self::VId;
	/// Number of outgoing edges of `vertex`
	fn out_degree(&self, vertex: Self::VId) -> usize {
		self.edges_from(vertex).count()
	}
}

/// A graph that can enumerate all of its edges.
///
/// `edge_count` may cost O(V+E).
pub trait EdgeList: Incidence {
	type Edges<'g>: Iterator<Item = Self::EId>
	where
		Self: 'g;
	/// All edges, lazily
	fn edges(&self) -> Self::Edges<'_>;
	/// Number of edges
	fn edge_count(&self) -> usize {
		self.edges().count()
	}
}

/// A graph that also knows the edges pointing *at* a vertex.
pub trait Bidirectional: Incidence {
	type InEdges<'g>: Iterator<Item = Self::EId>
	where
		Self: 'g;
	/// Incoming edges of `vertex`
	fn edges_to(&self, vertex: Self::VId) -> Self::InEdges<'_>;
	/// Number of incoming edges of `vertex`
	fn in_degree(&self, vertex: Self::VId) -> usize {
		self.edges_to(vertex).count()
	}
	/// Total number of edges incident to `vertex`
	fn degree(&self, vertex: Self::VId) -> usize {
		self.in_degree(vertex) + self.out_degree(vertex)
	}
}

/// A graph whose structure can be changed.
///
/// Additions preserve outstanding identifiers; removals may invalidate
/// them, and each concrete graph documents exactly how.
pub trait Mutable: Graph {
	/// Adds a vertex with a default payload (where the graph stores one)
	fn add_vertex(&mut self) -> Self::VId;
	/// Adds an edge `source` → `destination` with a default payload
	fn add_edge(&mut self, source: Self::VId, destination: Self::VId) -> Self::EId;
	/// Removes every edge `source` → `destination`; whether any existed
	fn remove_edge(&mut self, source: Self::VId, destination: Self::VId) -> bool;
	/// Removes one edge by id
	fn remove_edge_by_id(&mut self, edge: Self::EId);
	/// Removes a vertex and every edge incident to it
	fn remove_vertex(&mut self, vertex: Self::VId);
	/// Removes every edge incident to `vertex`, keeping the vertex
	fn clear_vertex(&mut self, vertex: Self::VId);
	/// Removes every edge matching the predicate.
	///
	/// The predicate is invoked in edge order with pre-removal ids, so the
	/// caller can compute stable indices.
	fn remove_edges_where<F: FnMut(Self::EId) -> bool>(&mut self, predicate: F);
	/// Removes the outgoing edges of `vertex` matching the predicate, with
	/// the same in-order guarantee as [`Mutable::remove_edges_where`].
	fn remove_edges_from<F: FnMut(Self::EId) -> bool>(&mut self, vertex: Self::VId, predicate: F);
}

/// Read access to per-edge payloads.
///
/// Split out of [`Property`] so that read-only structural views (the
/// parallel projection) can expose edge payloads without vertex payloads.
pub trait EdgeProperty: Graph {
	type Edge;
	fn edge(&self, edge: Self::EId) -> &Self::Edge;
}

/// Per-vertex and per-edge payloads stored in the graph itself.
pub trait Property: EdgeProperty {
	type Vertex;
	fn vertex(&self, vertex: Self::VId) -> &Self::Vertex;
	fn vertex_mut(&mut self, vertex: Self::VId) -> &mut Self::Vertex;
	fn edge_mut(&mut self, edge: Self::EId) -> &mut Self::Edge;
}

/// Mutability with explicit payloads.
pub trait MutableProperty: Mutable + Property {
	fn add_vertex_with(&mut self, payload: Self::Vertex) -> Self::VId;
	fn add_edge_with(
		&mut self,
		source: Self::VId,
		destination: Self::VId,
		payload: Self::Edge,
	) -> Self::EId;
}

/// Vertex visitation state used by the searches.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VertexColor {
	/// Not yet discovered
	White,
	/// Discovered, not yet finished
	Gray,
	/// Finished
	Black,
}

impl Default for VertexColor {
	fn default() -> Self {
		VertexColor::White
	}
}

/// A graph that knows which color-map representation fits it best.
///
/// Dense integer-id graphs pick a flat table; graphs with structured ids
/// (grids) pick a dictionary with a default value.
pub trait SearchDefaults: Incidence + Sized {
	type DefaultColorMap: crate::property::PropertyMap<Self, Self::VId, Value = VertexColor>;
	fn make_default_color_map(&self, repeating: VertexColor) -> Self::DefaultColorMap;
}

/// Edge payloads that expose a scalar weight.
pub trait Weighted {
	fn weight(&self) -> N64;
}

impl Weighted for N64 {
	fn weight(&self) -> N64 {
		*self
	}
}

impl<'a, G: Graph> Graph for &'a G {
	type VId = G::VId;
	type EId = G::EId;
}

impl<'a, G: VertexList> VertexList for &'a G {
	type Vertices<'g> = G::Vertices<'g> where Self: 'g;
	fn vertices(&self) -> Self::Vertices<'_> {
		(**self).vertices()
	}
	fn vertex_count(&self) -> usize {
		(**self).vertex_count()
	}
}

impl<'a, G: Incidence> Incidence for &'a G {
	type OutEdges<'g> = G::OutEdges<'g> where Self: 'g;
	fn edges_from(&self, vertex: Self::VId) -> Self::OutEdges<'_> {
		(**self).edges_from(vertex)
	}
	fn source(&self, edge: Self::EId) -> Self::VId {
		(**self).source(edge)
	}
	fn destination(&self, edge: Self::EId) -> Self::VId {
		(**self).destination(edge)
	}
	fn out_degree(&self, vertex: Self::VId) -> usize {
		(**self).out_degree(vertex)
	}
}

impl<'a, G: EdgeList> EdgeList for &'a G {
	type Edges<'g> = G::Edges<'g> where Self: 'g;
	fn edges(&self) -> Self::Edges<'_> {
		(**self).edges()
	}
	fn edge_count(&self) -> usize {
		(**self).edge_count()
	}
}

impl<'a, G: Bidirectional> Bidirectional for &'a G {
	type InEdges<'g> = G::InEdges<'g> where Self: 'g;
	fn edges_to(&self, vertex: Self::VId) -> Self::InEdges<'_> {
		(**self).edges_to(vertex)
	}
	fn in_degree(&self, vertex: Self::VId) -> usize {
		(**self).in_degree(vertex)
	}
	fn degree(&self, vertex: Self::VId) -> usize {
		(**self).degree(vertex)
	}
}

impl<'a, G: EdgeProperty> EdgeProperty for &'a G {
	type Edge = G::Edge;
	fn edge(&self, edge: Self::EId) -> &Self::Edge {
		(**self).edge(edge)
	}
}
