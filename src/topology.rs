//! Topological sort, built on the depth-first traversal.

use std::fmt;

use crate::dfs::depth_first_traversal;
use crate::graph::{Incidence, SearchDefaults, VertexList};
use crate::visit::{DfsEvent, SearchError};

/// The graph contains a cycle, so no topological order exists.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CycleDetected;

impl fmt::Display for CycleDetected {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "cycle detected")
	}
}

impl std::error::Error for CycleDetected {}

/// Orders the vertices so that every edge points from an earlier vertex to
/// a later one, or fails with [`CycleDetected`].
///
/// The order is the reverse of the depth-first finish order, filled
/// back-to-front into space preallocated from `vertex_count`.
pub fn topological_sort<G>(graph: &mut G) -> Result<Vec<G::VId>, CycleDetected>
where
	G: Incidence + VertexList + SearchDefaults,
{
	let count = graph.vertex_count();
	let mut order: Vec<Option<G::VId>> = vec![None; count];
	let mut next = count;
	depth_first_traversal(graph, &mut |event, _| match event {
		DfsEvent::BackEdge(_) => Err(SearchError::Caller(CycleDetected)),
		DfsEvent::Finish(vertex) => {
			next -= 1;
			order[next] = Some(vertex);
			Ok(())
		}
		_ => Ok(()),
	})?;
	let order: Vec<_> = order.into_iter().flatten().collect();
	debug_assert_eq!(order.len(), count);
	Ok(order)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::adjacency::DirectedAdjacencyList;
	use crate::graph::Mutable;

	#[test]
	fn linear_chain_sorts_in_order() {
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		for _ in 0..5 {
			g.add_vertex();
		}
		for v in 0..4u32 {
			g.add_edge(v, v + 1);
		}
		assert_eq!(topological_sort(&mut g).unwrap(), vec![0, 1, 2, 3, 4]);
		g.add_edge(4, 0);
		assert_eq!(topological_sort(&mut g), Err(CycleDetected));
	}

	#[test]
	fn every_edge_points_forward() {
		// 5 → 2 → 3 → 1, 5 → 0, 4 → 0, 4 → 1
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		for _ in 0..6 {
			g.add_vertex();
		}
		for (u, v) in vec![(5u32, 2u32), (2, 3), (3, 1), (5, 0), (4, 0), (4, 1)] {
			g.add_edge(u, v);
		}
		let order = topological_sort(&mut g).unwrap();
		let position = |v: u32| order.iter().position(|o| *o == v).unwrap();
		let edges: Vec<_> = {
			use crate::graph::EdgeList;
			g.edges().map(|e| (g.source(e), g.destination(e))).collect()
		};
		for (u, v) in edges {
			assert!(position(u) < position(v), "edge {} → {} points backwards", u, v);
		}
	}

	#[test]
	fn self_loop_is_a_cycle() {
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		g.add_vertex();
		g.add_edge(0, 0);
		assert_eq!(topological_sort(&mut g), Err(CycleDetected));
	}
}
