//! Dijkstra's shortest paths, expressed as a priority-queue-driven
//! breadth-first search with relaxation in the event callbacks.

use std::cmp::Reverse;
use std::hash::Hash;
use std::ops::Add;

use noisy_float::prelude::{n64, Float, N64};
use priority_queue::PriorityQueue;

use crate::bfs::{breadth_first_search_with_queue, VertexQueue};
use crate::graph::{Incidence, SearchDefaults, VertexColor};
use crate::property::{DictionaryPropertyMap, PropertyMap};
use crate::visit::{BfsEvent, DictionaryPredecessorRecorder, DijkstraEvent, SearchError};

/// Totally ordered additive measure with a zero and a largest value.
///
/// `effective_infinity` marks unreached vertices; relaxation never adds to
/// it, so the sum of real edge lengths along any path must stay below it.
pub trait Distance: Copy + Ord + Add<Self, Output = Self> {
	fn zero() -> Self;
	fn effective_infinity() -> Self;
}

macro_rules! integer_distance {
	($($t:ty),*) => {
		$(impl Distance for $t {
			fn zero() -> Self {
				0
			}
			fn effective_infinity() -> Self {
				<$t>::MAX
			}
		})*
	};
}
integer_distance!(u8, u16, u32, u64, u128, usize, i16, i32, i64, i128, isize);

impl Distance for N64 {
	fn zero() -> Self {
		n64(0.0)
	}
	fn effective_infinity() -> Self {
		N64::infinity()
	}
}

/// Indexed min-first priority queue over `(priority, vertex)`.
///
/// `push` enqueues at `effective_infinity`, which is what lets the plain
/// BFS loop drive Dijkstra: discovery inserts the vertex, the relaxation
/// callback immediately lowers its priority with [`DijkstraQueue::update`].
/// The locator is hash-indexed.
pub struct DijkstraQueue<V: Hash + Eq, D: Distance> {
	queue: PriorityQueue<V, Reverse<D>>,
}

impl<V: Hash + Eq, D: Distance> DijkstraQueue<V, D> {
	pub fn new() -> Self {
		Self { queue: PriorityQueue::new() }
	}
	/// Lower `vertex`'s priority to `priority`; keeps the better of the two
	pub fn update(&mut self, vertex: V, priority: D) {
		self.queue.push_increase(vertex, Reverse(priority));
	}
	pub fn len(&self) -> usize {
		self.queue.len()
	}
	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}
}

impl<V: Hash + Eq, D: Distance> Default for DijkstraQueue<V, D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<V: Hash + Eq, D: Distance> VertexQueue<V> for DijkstraQueue<V, D> {
	fn push(&mut self, vertex: V) {
		self.queue.push_increase(vertex, Reverse(D::effective_infinity()));
	}
	fn pop(&mut self) -> Option<V> {
		self.queue.pop().map(|(vertex, _)| vertex)
	}
}

/// Runs Dijkstra's search from `start`, emitting [`DijkstraEvent`]s.
///
/// `distances` must be initialized to `effective_infinity` everywhere; the
/// start's distance is set to zero in here. On return, every examined
/// vertex holds the length of the shortest path from `start` to it.
/// Negative edge lengths are tolerated by the full search but break the
/// early-exit variant.
pub fn dijkstra_search<G, D, C, DM, LM, F, Err>(
	graph: &mut G,
	start: G::VId,
	colors: &mut C,
	distances: &mut DM,
	edge_lengths: &LM,
	callback: &mut F,
) -> Result<(), Err>
where
	G: Incidence,
	G::VId: Hash,
	D: Distance,
	C: PropertyMap<G, G::VId, Value = VertexColor>,
	DM: PropertyMap<G, G::VId, Value = D>,
	LM: PropertyMap<G, G::EId, Value = D>,
	F: FnMut(DijkstraEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	distances.set(graph, start, D::zero());
	let mut queue: DijkstraQueue<G::VId, D> = DijkstraQueue::new();
	breadth_first_search_with_queue(graph, &[start], colors, &mut queue, &mut |event, graph, queue| {
		match event {
			BfsEvent::Start(v) => callback(DijkstraEvent::Start(v), graph),
			BfsEvent::Discover(v) => callback(DijkstraEvent::Discover(v), graph),
			BfsEvent::ExamineVertex(v) => callback(DijkstraEvent::ExamineVertex(v), graph),
			BfsEvent::ExamineEdge(e) => callback(DijkstraEvent::ExamineEdge(e), graph),
			BfsEvent::Finish(v) => callback(DijkstraEvent::Finish(v), graph),
			BfsEvent::NonTreeEdge(_) => Ok(()),
			BfsEvent::TreeEdge(e) | BfsEvent::GrayDestination(e) => {
				let source = graph.source(e);
				let destination = graph.destination(e);
				let candidate = distances.get(graph, source) + edge_lengths.get(graph, e);
				if candidate < distances.get(graph, destination) {
					distances.set(graph, destination, candidate);
					queue.update(destination, candidate);
					callback(DijkstraEvent::EdgeRelaxed(e), graph)
				} else {
					callback(DijkstraEvent::EdgeNotRelaxed(e), graph)
				}
			}
			BfsEvent::BlackDestination(e) => callback(DijkstraEvent::EdgeNotRelaxed(e), graph),
		}
	})
}

/// [`dijkstra_search`] that stops as soon as `goal` is popped from the
/// queue, at which point its distance is final. Assumes non-negative edge
/// lengths.
pub fn dijkstra_search_to<G, D, C, DM, LM, F, Err>(
	graph: &mut G,
	start: G::VId,
	goal: G::VId,
	colors: &mut C,
	distances: &mut DM,
	edge_lengths: &LM,
	callback: &mut F,
) -> Result<(), Err>
where
	G: Incidence,
	G::VId: Hash,
	D: Distance,
	C: PropertyMap<G, G::VId, Value = VertexColor>,
	DM: PropertyMap<G, G::VId, Value = D>,
	LM: PropertyMap<G, G::EId, Value = D>,
	F: FnMut(DijkstraEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	dijkstra_search(graph, start, colors, distances, edge_lengths, &mut |event, graph| {
		callback(event, graph)?;
		if matches!(event, DijkstraEvent::ExamineVertex(v) if v == goal) {
			return Err(SearchError::StopSearch);
		}
		Ok(())
	})
}

/// Shortest path from `start` to `goal`: the vertex sequence and its
/// length, or `None` when `goal` is unreachable.
pub fn dijkstra_shortest_path<G, D, LM, F, Err>(
	graph: &mut G,
	start: G::VId,
	goal: G::VId,
	edge_lengths: &LM,
	callback: &mut F,
) -> Result<Option<(Vec<G::VId>, D)>, Err>
where
	G: Incidence + SearchDefaults,
	G::VId: Hash,
	D: Distance,
	LM: PropertyMap<G, G::EId, Value = D>,
	F: FnMut(DijkstraEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	let mut colors = graph.make_default_color_map(VertexColor::White);
	let mut distances: DictionaryPropertyMap<G::VId, D> =
		DictionaryPropertyMap::repeating(D::effective_infinity());
	let mut recorder = DictionaryPredecessorRecorder::new();
	dijkstra_search_to(graph, start, goal, &mut colors, &mut distances, edge_lengths, &mut |event, graph| {
		if let DijkstraEvent::EdgeRelaxed(e) = event {
			recorder.record(&*graph, e);
		}
		callback(event, graph)
	})?;
	let best = distances.get(graph, goal);
	if best == D::effective_infinity() {
		Ok(None)
	} else {
		Ok(Some((recorder.path(goal), best)))
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::adjacency::DirectedAdjacencyList;
	use crate::graph::MutableProperty;
	use crate::property::{InternalEdgePropertyMap, TablePropertyMap};
	use crate::visit::TablePredecessorRecorder;

	fn triangle() -> DirectedAdjacencyList<(), u32> {
		// 0 →10→ 1, 0 →3→ 2, 2 →1→ 1
		let mut g = DirectedAdjacencyList::new();
		for _ in 0..3 {
			g.add_vertex_with(());
		}
		g.add_edge_with(0, 1, 10);
		g.add_edge_with(0, 2, 3);
		g.add_edge_with(2, 1, 1);
		g
	}

	#[test]
	fn weighted_triangle_distances_and_predecessors() {
		let mut g = triangle();
		let mut colors = g.make_default_color_map(VertexColor::White);
		let mut distances: TablePropertyMap<u32, u32> = TablePropertyMap::repeating(3, u32::MAX);
		let mut recorder = TablePredecessorRecorder::new(3);
		dijkstra_search::<_, u32, _, _, _, _, ()>(
			&mut g,
			0,
			&mut colors,
			&mut distances,
			&InternalEdgePropertyMap,
			&mut |event, graph| {
				if let DijkstraEvent::EdgeRelaxed(e) = event {
					recorder.record(&*graph, e);
				}
				Ok(())
			},
		)
		.unwrap();
		assert_eq!(distances.values(), &[0, 4, 3][..]);
		assert_eq!(recorder.path(1), vec![0, 2, 1]);
	}

	#[test]
	fn relaxation_events_match_the_tighter_paths() {
		let mut g = triangle();
		g.add_edge_with(1, 0, 100);
		let mut colors = g.make_default_color_map(VertexColor::White);
		let mut distances: TablePropertyMap<u32, u32> = TablePropertyMap::repeating(4, u32::MAX);
		let mut relaxed = 0;
		let mut not_relaxed = 0;
		dijkstra_search::<_, u32, _, _, _, _, ()>(
			&mut g,
			0,
			&mut colors,
			&mut distances,
			&InternalEdgePropertyMap,
			&mut |event, _| {
				match event {
					DijkstraEvent::EdgeRelaxed(_) => relaxed += 1,
					DijkstraEvent::EdgeNotRelaxed(_) => not_relaxed += 1,
					_ => {}
				}
				Ok(())
			},
		)
		.unwrap();
		assert_eq!(relaxed, 3);
		// 1 → 0 arrives when 0 is already black
		assert_eq!(not_relaxed, 1);
	}

	#[test]
	fn goal_stop_leaves_the_rest_unexamined() {
		let mut g = triangle();
		let mut colors = g.make_default_color_map(VertexColor::White);
		let mut distances: TablePropertyMap<u32, u32> = TablePropertyMap::repeating(3, u32::MAX);
		let mut examined = Vec::new();
		dijkstra_search_to::<_, u32, _, _, _, _, ()>(
			&mut g,
			0,
			2,
			&mut colors,
			&mut distances,
			&InternalEdgePropertyMap,
			&mut |event, _| {
				if let DijkstraEvent::ExamineVertex(v) = event {
					examined.push(v);
				}
				Ok(())
			},
		)
		.unwrap();
		// 2 is nearer than 1, so 1 is never popped
		assert_eq!(examined, vec![0, 2]);
		assert_eq!(distances.values(), &[0, 10, 3][..]);
	}

	#[test]
	fn shortest_path_reconstructs_the_chain() {
		let mut g: DirectedAdjacencyList<(), N64> = DirectedAdjacencyList::new();
		for _ in 0..3 {
			g.add_vertex_with(());
		}
		g.add_edge_with(0, 1, n64(10.0));
		g.add_edge_with(0, 2, n64(3.0));
		g.add_edge_with(2, 1, n64(1.0));
		let found = dijkstra_shortest_path::<_, N64, _, _, ()>(
			&mut g,
			0,
			1,
			&InternalEdgePropertyMap,
			&mut |_, _| Ok(()),
		)
		.unwrap();
		let (path, length) = found.unwrap();
		assert_eq!(path, vec![0, 2, 1]);
		assert_eq!(length, n64(4.0));
	}

	#[test]
	fn unreachable_goal_is_none() {
		let mut g: DirectedAdjacencyList<(), u32> = DirectedAdjacencyList::new();
		for _ in 0..2 {
			g.add_vertex_with(());
		}
		let found = dijkstra_shortest_path::<_, u32, _, _, ()>(
			&mut g,
			0,
			1,
			&InternalEdgePropertyMap,
			&mut |_, _| Ok(()),
		)
		.unwrap();
		assert!(found.is_none());
	}
}
