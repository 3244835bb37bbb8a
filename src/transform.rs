//! Copying graphs across representations and filtering edges lazily.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::graph::{
	Bidirectional, EdgeList, Graph, Incidence, Mutable, MutableProperty, VertexList,
};
use crate::property::PropertyMap;

/// Rebuilds `source` inside `target`, returning the vertex id remapping.
///
/// Visits every source vertex, adds a counterpart to `target`, then
/// translates every edge through the recorded mapping. Up to that
/// remapping the copy has the same vertex count and the same edge multiset.
pub fn copy_graph<S, T>(source: &S, target: &mut T) -> IndexMap<S::VId, T::VId>
where
	S: VertexList + Incidence,
	S::VId: Hash,
	T: Mutable,
{
	let mut mapping = IndexMap::with_capacity(source.vertex_count());
	for vertex in source.vertices() {
		mapping.insert(vertex, target.add_vertex());
	}
	for vertex in source.vertices() {
		for edge in source.edges_from(vertex) {
			target.add_edge(mapping[&vertex], mapping[&source.destination(edge)]);
		}
	}
	mapping
}

/// [`copy_graph`] that also carries payloads across, reading them through
/// the given property maps.
pub fn copy_property_graph<S, T, VP, EP>(
	source: &S,
	target: &mut T,
	vertex_properties: &VP,
	edge_properties: &EP,
) -> IndexMap<S::VId, T::VId>
where
	S: VertexList + Incidence,
	S::VId: Hash,
	T: MutableProperty,
	VP: PropertyMap<S, S::VId, Value = T::Vertex>,
	EP: PropertyMap<S, S::EId, Value = T::Edge>,
{
	let mut mapping = IndexMap::with_capacity(source.vertex_count());
	for vertex in source.vertices() {
		mapping.insert(vertex, target.add_vertex_with(vertex_properties.get(source, vertex)));
	}
	for vertex in source.vertices() {
		for edge in source.edges_from(vertex) {
			target.add_edge_with(
				mapping[&vertex],
				mapping[&source.destination(edge)],
				edge_properties.get(source, edge),
			);
		}
	}
	mapping
}

/// Decides which edges an [`EdgeFiltered`] adapter keeps.
pub trait EdgeFilter<G: Graph> {
	fn keep(&self, graph: &G, edge: G::EId) -> bool;
}

/// Adapts a closure `(graph, edge) -> bool` into an [`EdgeFilter`].
#[derive(Clone, Copy, Debug)]
pub struct FilterFn<F>(pub F);

impl<G: Graph, F: Fn(&G, G::EId) -> bool> EdgeFilter<G> for FilterFn<F> {
	fn keep(&self, graph: &G, edge: G::EId) -> bool {
		(self.0)(graph, edge)
	}
}

/// Keeps edges whose source and destination differ.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSelfLoops;

impl<G: Incidence> EdgeFilter<G> for NoSelfLoops {
	fn keep(&self, graph: &G, edge: G::EId) -> bool {
		graph.source(edge) != graph.destination(edge)
	}
}

/// A graph adapter whose edge collections skip edges failing a filter.
///
/// Iteration is lazy and ids pass through unchanged, so applying the same
/// filter twice yields the same edges as applying it once.
#[derive(Clone, Copy, Debug)]
pub struct EdgeFiltered<G, F> {
	graph: G,
	filter: F,
}

impl<G, F> EdgeFiltered<G, F> {
	pub fn new(graph: G, filter: F) -> Self {
		Self { graph, filter }
	}
	pub fn inner(&self) -> &G {
		&self.graph
	}
	pub fn into_inner(self) -> G {
		self.graph
	}
}

/// Iterator adapter dropping filtered-out edges.
pub struct FilteredEdges<'g, G, F, I> {
	inner: I,
	graph: &'g G,
	filter: &'g F,
}

impl<'g, G, F, I> Iterator for FilteredEdges<'g, G, F, I>
where
	G: Graph,
	F: EdgeFilter<G>,
	I: Iterator<Item = G::EId>,
{
	type Item = G::EId;
	fn next(&mut self) -> Option<G::EId> {
		loop {
			let edge = self.inner.next()?;
			if self.filter.keep(self.graph, edge) {
				return Some(edge);
			}
		}
	}
}

impl<G: Graph, F> Graph for EdgeFiltered<G, F> {
	type VId = G::VId;
	type EId = G::EId;
}

impl<G: VertexList, F> VertexList for EdgeFiltered<G, F> {
	type Vertices<'g> = G::Vertices<'g> where Self: 'g;
	fn vertices(&self) -> Self::Vertices<'_> {
		self.graph.vertices()
	}
	fn vertex_count(&self) -> usize {
		self.graph.vertex_count()
	}
}

impl<G: Incidence, F: EdgeFilter<G>> Incidence for EdgeFiltered<G, F> {
	type OutEdges<'g> = FilteredEdges<'g, G, F, G::OutEdges<'g>> where Self: 'g;
	fn edges_from(&self, vertex: Self::VId) -> Self::OutEdges<'_> {
		FilteredEdges {
			inner: self.graph.edges_from(vertex),
			graph: &self.graph,
			filter: &self.filter,
		}
	}
	fn source(&self, edge: Self::EId) -> Self::VId {
		self.graph.source(edge)
	}
	fn destination(&self, edge: Self::EId) -> Self::VId {
		self.graph.destination(edge)
	}
}

impl<G: EdgeList, F: EdgeFilter<G>> EdgeList for EdgeFiltered<G, F> {
	type Edges<'g> = FilteredEdges<'g, G, F, G::Edges<'g>> where Self: 'g;
	fn edges(&self) -> Self::Edges<'_> {
		FilteredEdges { inner: self.graph.edges(), graph: &self.graph, filter: &self.filter }
	}
}

impl<G: Bidirectional, F: EdgeFilter<G>> Bidirectional for EdgeFiltered<G, F> {
	type InEdges<'g> = FilteredEdges<'g, G, F, G::InEdges<'g>> where Self: 'g;
	fn edges_to(&self, vertex: Self::VId) -> Self::InEdges<'_> {
		FilteredEdges {
			inner: self.graph.edges_to(vertex),
			graph: &self.graph,
			filter: &self.filter,
		}
	}
}

/// Entry points for wrapping a borrowed graph in an [`EdgeFiltered`] view.
pub trait FilterEdges: Graph + Sized {
	/// View of this graph without the edges failing `filter`
	fn filter_edges<F>(&self, filter: F) -> EdgeFiltered<&Self, FilterFn<F>>
	where
		F: Fn(&&Self, Self::EId) -> bool,
	{
		EdgeFiltered::new(self, FilterFn(filter))
	}

	/// View of this graph without its self-loops
	fn excluding_self_loops(&self) -> EdgeFiltered<&Self, NoSelfLoops>
	where
		Self: Incidence,
	{
		EdgeFiltered::new(self, NoSelfLoops)
	}
}

impl<G: Graph> FilterEdges for G {}

#[cfg(test)]
mod test {
	use super::*;
	use crate::adjacency::{BidirectionalAdjacencyList, DirectedAdjacencyList};
	use crate::graph::{EdgeProperty, MutableProperty, Property};
	use crate::property::{InternalEdgePropertyMap, InternalVertexPropertyMap};

	fn sample() -> DirectedAdjacencyList<u64, u64> {
		let mut g = DirectedAdjacencyList::new();
		for i in 0..4u64 {
			g.add_vertex_with(i * 10);
		}
		g.add_edge_with(0, 1, 1);
		g.add_edge_with(1, 1, 2);
		g.add_edge_with(1, 2, 3);
		g.add_edge_with(2, 3, 4);
		g.add_edge_with(3, 0, 5);
		g
	}

	#[test]
	fn copy_round_trips_structure_and_payloads() {
		let g = sample();
		let mut copy: BidirectionalAdjacencyList<u64, u64> = BidirectionalAdjacencyList::new();
		let mapping = copy_property_graph(
			&g,
			&mut copy,
			&InternalVertexPropertyMap,
			&InternalEdgePropertyMap,
		);
		assert_eq!(copy.vertex_count(), g.vertex_count());
		assert_eq!(copy.edge_count(), g.edge_count());
		let mut original: Vec<(u64, u64, u64)> = g
			.edges()
			.map(|e| (*g.vertex(g.source(e)), *g.vertex(g.destination(e)), *g.edge(e)))
			.collect();
		let mut copied: Vec<(u64, u64, u64)> = copy
			.edges()
			.map(|e| (*copy.vertex(copy.source(e)), *copy.vertex(copy.destination(e)), *copy.edge(e)))
			.collect();
		original.sort_unstable();
		copied.sort_unstable();
		assert_eq!(original, copied);
		for (from, to) in &mapping {
			assert_eq!(g.vertex(*from), copy.vertex(*to));
		}
		copy.check_invariants();
	}

	#[test]
	fn plain_copy_translates_endpoints() {
		let g = sample();
		let mut copy: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		let mapping = copy_graph(&g, &mut copy);
		assert_eq!(copy.vertex_count(), 4);
		assert_eq!(copy.edge_count(), 5);
		let translated: Vec<_> = g
			.edges()
			.map(|e| (mapping[&g.source(e)], mapping[&g.destination(e)]))
			.collect();
		let copied: Vec<_> = copy.edges().map(|e| (copy.source(e), copy.destination(e))).collect();
		assert_eq!(translated, copied);
	}

	#[test]
	fn self_loops_are_filtered_out() {
		let g = sample();
		let filtered = g.excluding_self_loops();
		assert_eq!(filtered.edge_count(), 4);
		assert!(filtered.edges().all(|e| filtered.source(e) != filtered.destination(e)));
		// underlying ids pass through unchanged
		assert_eq!(filtered.out_degree(1), 1);
		assert_eq!(g.out_degree(1), 2);
	}

	#[test]
	fn filtering_twice_equals_filtering_once() {
		let g = sample();
		let once = g.excluding_self_loops();
		let twice = once.excluding_self_loops();
		let a: Vec<_> = once.edges().collect();
		let b: Vec<_> = twice.edges().collect();
		assert_eq!(a, b);
	}

	#[test]
	fn closure_filters_see_the_graph() {
		let g = sample();
		let heavy = g.filter_edges(|g: &&DirectedAdjacencyList<u64, u64>, e| *g.edge(e) >= 3);
		assert_eq!(heavy.edge_count(), 3);
		let light: Vec<_> = heavy.edges().map(|e| *heavy.inner().edge(e)).collect();
		assert_eq!(light, vec![3, 4, 5]);
	}
}
