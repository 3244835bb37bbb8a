//! Breadth-first search over an abstract queue.
//!
//! The queue is a seam: a FIFO deque gives plain BFS, the indexed priority
//! queue of [`crate::dijkstra`] turns the same loop into Dijkstra's
//! algorithm. Relaxation needs write access to the queue from inside the
//! event callback, so the inner driver hands the queue to the callback;
//! the public wrapper hides it again.

use std::collections::VecDeque;

use crate::graph::{Incidence, SearchDefaults, VertexColor};
use crate::property::PropertyMap;
use crate::visit::{BfsEvent, SearchError};

/// The two queue operations breadth-first search relies on.
pub trait VertexQueue<V> {
	fn push(&mut self, vertex: V);
	fn pop(&mut self) -> Option<V>;
}

impl<V> VertexQueue<V> for VecDeque<V> {
	fn push(&mut self, vertex: V) {
		self.push_back(vertex);
	}
	fn pop(&mut self) -> Option<V> {
		self.pop_front()
	}
}

/// BFS core: the callback additionally receives the queue.
pub(crate) fn breadth_first_search_with_queue<G, C, Q, F, Err>(
	graph: &mut G,
	starts: &[G::VId],
	colors: &mut C,
	queue: &mut Q,
	callback: &mut F,
) -> Result<(), Err>
where
	G: Incidence,
	C: PropertyMap<G, G::VId, Value = VertexColor>,
	Q: VertexQueue<G::VId>,
	F: FnMut(BfsEvent<G::VId, G::EId>, &mut G, &mut Q) -> Result<(), SearchError<Err>>,
{
	assert!(!starts.is_empty(), "breadth-first search needs at least one start vertex");
	macro_rules! emit {
		($event:expr) => {
			match callback($event, graph, queue) {
				Ok(()) => {}
				Err(SearchError::StopSearch) => return Ok(()),
				Err(SearchError::Caller(error)) => return Err(error),
			}
		};
	}
	for &start in starts {
		colors.set(graph, start, VertexColor::Gray);
		emit!(BfsEvent::Start(start));
		emit!(BfsEvent::Discover(start));
		queue.push(start);
	}
	while let Some(vertex) = queue.pop() {
		emit!(BfsEvent::ExamineVertex(vertex));
		let edges: Vec<_> = graph.edges_from(vertex).collect();
		for edge in edges {
			emit!(BfsEvent::ExamineEdge(edge));
			let next = graph.destination(edge);
			match colors.get(graph, next) {
				VertexColor::White => {
					emit!(BfsEvent::Discover(next));
					emit!(BfsEvent::TreeEdge(edge));
					colors.set(graph, next, VertexColor::Gray);
					queue.push(next);
				}
				VertexColor::Gray => {
					emit!(BfsEvent::NonTreeEdge(edge));
					emit!(BfsEvent::GrayDestination(edge));
				}
				VertexColor::Black => {
					emit!(BfsEvent::NonTreeEdge(edge));
					emit!(BfsEvent::BlackDestination(edge));
				}
			}
		}
		colors.set(graph, vertex, VertexColor::Black);
		emit!(BfsEvent::Finish(vertex));
	}
	Ok(())
}

/// Runs a breadth-first search from `starts`, emitting [`BfsEvent`]s.
///
/// Requires a color map initialized to `White` and a queue primitive;
/// vertices are finished in the order the queue yields them.
pub fn breadth_first_search<G, C, Q, F, Err>(
	graph: &mut G,
	starts: &[G::VId],
	colors: &mut C,
	queue: &mut Q,
	callback: &mut F,
) -> Result<(), Err>
where
	G: Incidence,
	C: PropertyMap<G, G::VId, Value = VertexColor>,
	Q: VertexQueue<G::VId>,
	F: FnMut(BfsEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	breadth_first_search_with_queue(graph, starts, colors, queue, &mut |event, graph, _| {
		callback(event, graph)
	})
}

/// [`breadth_first_search`] with the graph's default color map and a FIFO
/// queue.
pub fn breadth_first_search_from<G, F, Err>(
	graph: &mut G,
	starts: &[G::VId],
	callback: &mut F,
) -> Result<(), Err>
where
	G: Incidence + SearchDefaults,
	F: FnMut(BfsEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	let mut colors = graph.make_default_color_map(VertexColor::White);
	let mut queue = VecDeque::new();
	breadth_first_search(graph, starts, &mut colors, &mut queue, callback)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::adjacency::DirectedAdjacencyList;
	use crate::graph::Mutable;

	fn complete(n: u32) -> DirectedAdjacencyList<(), ()> {
		let mut g = DirectedAdjacencyList::new();
		for _ in 0..n {
			g.add_vertex();
		}
		for u in 0..n {
			for v in 0..n {
				if u != v {
					g.add_edge(u, v);
				}
			}
		}
		g
	}

	fn count<V, E>(events: &[BfsEvent<V, E>], f: impl Fn(&BfsEvent<V, E>) -> bool) -> usize {
		events.iter().filter(|e| f(e)).count()
	}

	#[test]
	fn star_event_counts() {
		// both-ways star around 0: one tree edge per leaf, one non-tree back
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		for _ in 0..5 {
			g.add_vertex();
		}
		for v in 1..5u32 {
			g.add_edge(0, v);
			g.add_edge(v, 0);
		}
		let mut events = Vec::new();
		breadth_first_search_from::<_, _, ()>(&mut g, &[0], &mut |event, _| {
			events.push(event);
			Ok(())
		})
		.unwrap();
		assert_eq!(count(&events, |e| matches!(e, BfsEvent::TreeEdge(_))), 4);
		assert_eq!(count(&events, |e| matches!(e, BfsEvent::NonTreeEdge(_))), 4);
		let tree_destinations: Vec<_> = events
			.iter()
			.filter_map(|e| if let BfsEvent::TreeEdge(id) = e { Some(g.destination(*id)) } else { None })
			.collect();
		assert_eq!(tree_destinations, vec![1, 2, 3, 4]);
	}

	#[test]
	fn complete_graph_event_counts() {
		let mut g = complete(5);
		let mut events = Vec::new();
		breadth_first_search_from::<_, _, ()>(&mut g, &[0], &mut |event, _| {
			events.push(event);
			Ok(())
		})
		.unwrap();
		assert_eq!(count(&events, |e| matches!(e, BfsEvent::TreeEdge(_))), 4);
		assert_eq!(count(&events, |e| matches!(e, BfsEvent::NonTreeEdge(_))), 16);
		assert_eq!(count(&events, |e| matches!(e, BfsEvent::ExamineEdge(_))), 20);
		assert_eq!(count(&events, |e| matches!(e, BfsEvent::Finish(_))), 5);
		// every non-tree edge is classified by its destination's color
		assert_eq!(
			count(&events, |e| matches!(e, BfsEvent::GrayDestination(_)))
				+ count(&events, |e| matches!(e, BfsEvent::BlackDestination(_))),
			16
		);
	}

	#[test]
	fn multiple_starts_share_one_frontier() {
		// 0 → 1 → 2, 3 → 4
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		for _ in 0..5 {
			g.add_vertex();
		}
		g.add_edge(0, 1);
		g.add_edge(1, 2);
		g.add_edge(3, 4);
		let mut finished = Vec::new();
		breadth_first_search_from::<_, _, ()>(&mut g, &[0, 3], &mut |event, _| {
			if let BfsEvent::Finish(v) = event {
				finished.push(v);
			}
			Ok(())
		})
		.unwrap();
		assert_eq!(finished, vec![0, 3, 1, 4, 2]);
	}

	#[test]
	fn stop_search_ends_silently() {
		let mut g = complete(4);
		let mut examined = 0;
		let result: Result<(), ()> = breadth_first_search_from(&mut g, &[0], &mut |event, _| {
			if matches!(event, BfsEvent::ExamineVertex(_)) {
				examined += 1;
				if examined == 2 {
					return Err(SearchError::StopSearch);
				}
			}
			Ok(())
		});
		assert_eq!(result, Ok(()));
		assert_eq!(examined, 2);
	}

	#[test]
	#[should_panic]
	fn empty_start_set_is_fatal() {
		let mut g = complete(2);
		let _ = breadth_first_search_from::<_, _, ()>(&mut g, &[], &mut |_, _| Ok(()));
	}
}
