//! Iterative depth-first search driven entirely by event callbacks.

use crate::graph::{Incidence, SearchDefaults, VertexColor, VertexList};
use crate::property::PropertyMap;
use crate::visit::{DfsEvent, SearchError};

/// Runs a depth-first search from `start`, emitting [`DfsEvent`]s.
///
/// Requires a color map initialized to `White` for every vertex the search
/// may reach; the start vertex must be white. Edges are examined in the
/// order `edges_from` yields them. A callback raising
/// [`SearchError::StopSearch`] ends the search silently; other errors
/// propagate.
pub fn depth_first_search<G, C, F, Err>(
	graph: &mut G,
	start: G::VId,
	colors: &mut C,
	callback: &mut F,
) -> Result<(), Err>
where
	G: Incidence,
	C: PropertyMap<G, G::VId, Value = VertexColor>,
	F: FnMut(DfsEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	depth_first_search_impl(graph, start, colors, callback).map(|_| ())
}

/// Like [`depth_first_search`], reporting whether a callback stopped it.
fn depth_first_search_impl<G, C, F, Err>(
	graph: &mut G,
	start: G::VId,
	colors: &mut C,
	callback: &mut F,
) -> Result<bool, Err>
where
	G: Incidence,
	C: PropertyMap<G, G::VId, Value = VertexColor>,
	F: FnMut(DfsEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	macro_rules! emit {
		($event:expr) => {
			match callback($event, graph) {
				Ok(()) => {}
				Err(SearchError::StopSearch) => return Ok(true),
				Err(SearchError::Caller(error)) => return Err(error),
			}
		};
	}
	fn out_edges<G: Incidence>(graph: &G, vertex: G::VId) -> std::vec::IntoIter<G::EId> {
		graph.edges_from(vertex).collect::<Vec<_>>().into_iter()
	}

	assert!(
		colors.get(graph, start) == VertexColor::White,
		"depth-first search started at a non-white vertex"
	);
	emit!(DfsEvent::Start(start));
	colors.set(graph, start, VertexColor::Gray);
	emit!(DfsEvent::Discover(start));
	let mut stack = vec![(start, out_edges(graph, start))];
	while let Some((vertex, mut edges)) = stack.pop() {
		let mut descended = false;
		while let Some(edge) = edges.next() {
			emit!(DfsEvent::Examine(edge));
			let next = graph.destination(edge);
			match colors.get(graph, next) {
				VertexColor::White => {
					emit!(DfsEvent::TreeEdge(edge));
					colors.set(graph, next, VertexColor::Gray);
					emit!(DfsEvent::Discover(next));
					stack.push((vertex, edges));
					stack.push((next, out_edges(graph, next)));
					descended = true;
					break;
				}
				VertexColor::Gray => emit!(DfsEvent::BackEdge(edge)),
				VertexColor::Black => emit!(DfsEvent::ForwardOrCrossEdge(edge)),
			}
		}
		if !descended {
			colors.set(graph, vertex, VertexColor::Black);
			emit!(DfsEvent::Finish(vertex));
		}
	}
	Ok(false)
}

/// Runs [`depth_first_search`] from every still-white vertex until all
/// vertices have been blackened.
///
/// `StopSearch` raised by the callback aborts the whole traversal, not
/// just the current tree.
pub fn depth_first_traversal<G, F, Err>(graph: &mut G, callback: &mut F) -> Result<(), Err>
where
	G: Incidence + VertexList + SearchDefaults,
	F: FnMut(DfsEvent<G::VId, G::EId>, &mut G) -> Result<(), SearchError<Err>>,
{
	let mut colors = graph.make_default_color_map(VertexColor::White);
	let vertices: Vec<_> = graph.vertices().collect();
	for vertex in vertices {
		if colors.get(graph, vertex) == VertexColor::White
			&& depth_first_search_impl(graph, vertex, &mut colors, callback)?
		{
			break;
		}
	}
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::adjacency::DirectedAdjacencyList;
	use crate::graph::Mutable;

	fn diamond() -> DirectedAdjacencyList<(), ()> {
		// 0 → 1 → 3, 0 → 2 → 3
		let mut g = DirectedAdjacencyList::new();
		for _ in 0..4 {
			g.add_vertex();
		}
		g.add_edge(0, 1);
		g.add_edge(0, 2);
		g.add_edge(1, 3);
		g.add_edge(2, 3);
		g
	}

	#[test]
	fn event_stream_follows_edge_order() {
		let mut g = diamond();
		let mut events = Vec::new();
		let mut colors = g.make_default_color_map(VertexColor::White);
		depth_first_search::<_, _, _, ()>(&mut g, 0, &mut colors, &mut |event, _| {
			events.push(event);
			Ok(())
		})
		.unwrap();
		use DfsEvent::*;
		let discoveries: Vec<_> = events
			.iter()
			.filter_map(|e| if let Discover(v) = e { Some(*v) } else { None })
			.collect();
		assert_eq!(discoveries, vec![0, 1, 3, 2]);
		let finishes: Vec<_> = events
			.iter()
			.filter_map(|e| if let Finish(v) = e { Some(*v) } else { None })
			.collect();
		assert_eq!(finishes, vec![3, 1, 2, 0]);
		// the second edge into 3 is neither tree nor back
		assert!(events.iter().any(|e| matches!(e, ForwardOrCrossEdge(_))));
		assert!(!events.iter().any(|e| matches!(e, BackEdge(_))));
	}

	#[test]
	fn reachable_vertices_end_black_unreachable_stay_white() {
		let mut g = diamond();
		let isolated = g.add_vertex();
		let mut colors = g.make_default_color_map(VertexColor::White);
		depth_first_search::<_, _, _, ()>(&mut g, 0, &mut colors, &mut |_, _| Ok(())).unwrap();
		for v in 0..4u32 {
			assert_eq!(colors.get(&g, v), VertexColor::Black);
		}
		assert_eq!(colors.get(&g, isolated), VertexColor::White);
	}

	#[test]
	fn self_loop_is_a_back_edge() {
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		g.add_vertex();
		g.add_edge(0, 0);
		let mut colors = g.make_default_color_map(VertexColor::White);
		let mut back_edges = 0;
		depth_first_search::<_, _, _, ()>(&mut g, 0, &mut colors, &mut |event, _| {
			if matches!(event, DfsEvent::BackEdge(_)) {
				back_edges += 1;
			}
			Ok(())
		})
		.unwrap();
		assert_eq!(back_edges, 1);
	}

	#[test]
	fn stop_search_ends_silently() {
		let mut g = diamond();
		let mut colors = g.make_default_color_map(VertexColor::White);
		let mut discovered = 0;
		let result: Result<(), ()> = depth_first_search(&mut g, 0, &mut colors, &mut |event, _| {
			if matches!(event, DfsEvent::Discover(_)) {
				discovered += 1;
				if discovered == 2 {
					return Err(SearchError::StopSearch);
				}
			}
			Ok(())
		});
		assert_eq!(result, Ok(()));
		assert_eq!(discovered, 2);
	}

	#[test]
	fn traversal_blackens_every_component() {
		let mut g = diamond();
		g.add_vertex();
		g.add_vertex();
		g.add_edge(4, 5);
		let mut starts = Vec::new();
		depth_first_traversal::<_, _, ()>(&mut g, &mut |event, _| {
			if let DfsEvent::Start(v) = event {
				starts.push(v);
			}
			Ok(())
		})
		.unwrap();
		assert_eq!(starts, vec![0, 4]);
	}

	#[test]
	#[should_panic]
	fn starting_on_a_gray_vertex_is_fatal() {
		let mut g = diamond();
		let mut colors = g.make_default_color_map(VertexColor::Gray);
		let _ = depth_first_search::<_, _, _, ()>(&mut g, 0, &mut colors, &mut |_, _| Ok(()));
	}

	#[test]
	fn callbacks_may_mutate_the_graph() {
		let mut g = diamond();
		depth_first_traversal::<_, _, ()>(&mut g, &mut |event, g| {
			if matches!(event, DfsEvent::Finish(_)) {
				g.add_vertex();
			}
			Ok(())
		})
		.unwrap();
		assert_eq!(g.vertex_count(), 8);
	}
}
