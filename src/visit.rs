//! Search events, early-termination control, and predecessor recorders.
//!
//! Each search emits a fixed event enum through a single callback
//! `(event, &mut graph) -> Result<(), SearchError<E>>`. Raising
//! [`SearchError::StopSearch`] aborts the search silently; every other
//! error propagates to the caller unchanged.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::graph::{DenseId, Incidence};

/// Events emitted by depth-first search, in the order defined by the
/// traversal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DfsEvent<V, E> {
	/// A new search tree starts at this vertex
	Start(V),
	/// First visit of a vertex
	Discover(V),
	/// An outgoing edge is looked at
	Examine(E),
	/// The edge leads to an undiscovered vertex
	TreeEdge(E),
	/// The edge leads to a vertex on the current stack
	BackEdge(E),
	/// The edge leads to an already finished vertex
	ForwardOrCrossEdge(E),
	/// Every outgoing edge of the vertex has been examined
	Finish(V),
}

/// Events emitted by breadth-first search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BfsEvent<V, E> {
	Start(V),
	Discover(V),
	ExamineVertex(V),
	ExamineEdge(E),
	TreeEdge(E),
	NonTreeEdge(E),
	/// Follows `NonTreeEdge` when the destination is gray
	GrayDestination(E),
	/// Follows `NonTreeEdge` when the destination is black
	BlackDestination(E),
	Finish(V),
}

/// Events emitted by Dijkstra's search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DijkstraEvent<V, E> {
	Start(V),
	Discover(V),
	ExamineVertex(V),
	ExamineEdge(E),
	/// The edge yielded a shorter path to its destination
	EdgeRelaxed(E),
	EdgeNotRelaxed(E),
	Finish(V),
}

/// Errors a search callback may raise.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchError<E> {
	/// Terminate the search early; converted to a normal return by the
	/// algorithm wrapper and never observed outside it
	StopSearch,
	/// Caller error, propagated unchanged
	Caller(E),
}

impl<E> From<E> for SearchError<E> {
	fn from(error: E) -> Self {
		SearchError::Caller(error)
	}
}

/// Records `predecessor[destination] = source` for tree or relaxed edges,
/// backed by a flat table over dense vertex ids.
///
/// Subscribe it to `TreeEdge` (DFS/BFS) or `EdgeRelaxed` (Dijkstra) events
/// and read paths back afterwards.
#[derive(Clone, Debug)]
pub struct TablePredecessorRecorder<V> {
	predecessors: Vec<Option<V>>,
}

impl<V: DenseId> TablePredecessorRecorder<V> {
	pub fn new(vertex_count: usize) -> Self {
		Self { predecessors: vec![None; vertex_count] }
	}

	pub fn record<G: Incidence<VId = V>>(&mut self, graph: &G, edge: G::EId) {
		self.predecessors[graph.destination(edge).index()] = Some(graph.source(edge));
	}

	pub fn predecessor(&self, vertex: V) -> Option<V> {
		self.predecessors[vertex.index()]
	}

	/// The recorded path ending at `vertex`, root first.
	///
	/// A vertex without a recorded predecessor yields the one-element path;
	/// distances or colors tell reachability apart.
	pub fn path(&self, vertex: V) -> Vec<V> {
		path_to(vertex, |v| self.predecessor(v))
	}
}

/// Predecessor recorder for graphs whose vertex ids are not densely
/// indexable; backed by a hash table.
#[derive(Clone, Debug, Default)]
pub struct DictionaryPredecessorRecorder<V: Hash + Eq> {
	predecessors: IndexMap<V, V>,
}

impl<V: Hash + Eq + Copy> DictionaryPredecessorRecorder<V> {
	pub fn new() -> Self {
		Self { predecessors: IndexMap::new() }
	}

	pub fn record<G: Incidence<VId = V>>(&mut self, graph: &G, edge: G::EId) {
		self.predecessors.insert(graph.destination(edge), graph.source(edge));
	}

	pub fn predecessor(&self, vertex: V) -> Option<V> {
		self.predecessors.get(&vertex).copied()
	}

	/// The recorded path ending at `vertex`, root first.
	pub fn path(&self, vertex: V) -> Vec<V> {
		path_to(vertex, |v| self.predecessor(v))
	}
}

fn path_to<V: Copy>(vertex: V, predecessor: impl Fn(V) -> Option<V>) -> Vec<V> {
	let mut path = vec![vertex];
	let mut current = vertex;
	while let Some(previous) = predecessor(current) {
		path.push(previous);
		current = previous;
	}
	path.reverse();
	path
}
