//! Whole-graph analyses: degree distributions and clustering coefficients.

use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::graph::{Bidirectional, Incidence, VertexList};

/// Degrees below this bound are counted in a dense array; the rest go to
/// the sparse tail.
const SMALL_DEGREE_LIMIT: usize = 256;

/// Histogram of vertex degrees.
///
/// Degrees below a fixed threshold are stored densely; higher degrees are
/// stored sparsely, ordered by degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DegreeDistribution {
	/// Sum of all degrees counted
	pub edge_count: usize,
	/// Number of vertices counted
	pub vertex_count: usize,
	small_counts: Vec<usize>,
	large_counts: Vec<(usize, usize)>,
}

impl DegreeDistribution {
	pub fn from_degrees(degrees: impl Iterator<Item = usize>) -> Self {
		let mut edge_count = 0;
		let mut vertex_count = 0;
		let mut small_counts = vec![0usize; SMALL_DEGREE_LIMIT];
		let mut large: IndexMap<usize, usize> = IndexMap::new();
		for degree in degrees {
			edge_count += degree;
			vertex_count += 1;
			if degree < SMALL_DEGREE_LIMIT {
				small_counts[degree] += 1;
			} else {
				*large.entry(degree).or_insert(0) += 1;
			}
		}
		let large_counts = large.into_iter().sorted_by_key(|&(degree, _)| degree).collect();
		Self { edge_count, vertex_count, small_counts, large_counts }
	}

	/// Number of vertices with exactly `degree` edges
	pub fn count_for(&self, degree: usize) -> usize {
		if degree < SMALL_DEGREE_LIMIT {
			self.small_counts[degree]
		} else {
			self.large_counts
				.binary_search_by_key(&degree, |&(d, _)| d)
				.map(|i| self.large_counts[i].1)
				.unwrap_or(0)
		}
	}

	/// Largest degree observed
	pub fn max_degree(&self) -> usize {
		if let Some(&(degree, _)) = self.large_counts.last() {
			return degree;
		}
		self.small_counts.iter().rposition(|&count| count > 0).unwrap_or(0)
	}

	/// Mean degree, 0.0 for the empty graph
	pub fn mean_degree(&self) -> f64 {
		if self.vertex_count == 0 {
			0.0
		} else {
			self.edge_count as f64 / self.vertex_count as f64
		}
	}

	/// Non-empty `(degree, count)` buckets, ascending by degree
	pub fn buckets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.small_counts
			.iter()
			.enumerate()
			.filter(|&(_, &count)| count > 0)
			.map(|(degree, &count)| (degree, count))
			.chain(self.large_counts.iter().copied())
	}
}

/// Distribution of out-degrees.
pub fn degree_distribution<G: VertexList + Incidence>(graph: &G) -> DegreeDistribution {
	DegreeDistribution::from_degrees(graph.vertices().map(|v| graph.out_degree(v)))
}

/// Distribution of in-degrees.
pub fn in_degree_distribution<G: VertexList + Bidirectional>(graph: &G) -> DegreeDistribution {
	DegreeDistribution::from_degrees(graph.vertices().map(|v| graph.in_degree(v)))
}

/// Local clustering coefficient of `vertex` in a directed graph: the
/// fraction of ordered pairs of distinct out-neighbors that are themselves
/// connected by an edge. 0.0 for vertices with fewer than two neighbors.
pub fn local_clustering_coefficient<G>(graph: &G, vertex: G::VId) -> f64
where
	G: Incidence,
	G::VId: Hash + Eq,
{
	let neighbors: HashSet<G::VId> = graph
		.edges_from(vertex)
		.map(|e| graph.destination(e))
		.filter(|&w| w != vertex)
		.collect();
	let degree = neighbors.len();
	if degree < 2 {
		return 0.0;
	}
	let mut links = 0usize;
	for &u in &neighbors {
		for e in graph.edges_from(u) {
			let w = graph.destination(e);
			if w != u && neighbors.contains(&w) {
				links += 1;
			}
		}
	}
	links as f64 / (degree * (degree - 1)) as f64
}

/// Mean of the local clustering coefficients over all vertices.
pub fn average_clustering_coefficient<G>(graph: &G) -> f64
where
	G: VertexList + Incidence,
	G::VId: Hash + Eq,
{
	let count = graph.vertex_count();
	if count == 0 {
		return 0.0;
	}
	let total: f64 = graph.vertices().map(|v| local_clustering_coefficient(graph, v)).sum();
	total / count as f64
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::adjacency::DirectedAdjacencyList;
	use crate::graph::Mutable;

	fn star(leaves: u32) -> DirectedAdjacencyList<(), ()> {
		let mut g = DirectedAdjacencyList::new();
		for _ in 0..=leaves {
			g.add_vertex();
		}
		for v in 1..=leaves {
			g.add_edge(0, v);
		}
		g
	}

	#[test]
	fn star_degree_distribution() {
		let g = star(6);
		let out = degree_distribution(&g);
		assert_eq!(out.vertex_count, 7);
		assert_eq!(out.edge_count, 6);
		assert_eq!(out.count_for(6), 1);
		assert_eq!(out.count_for(0), 6);
		assert_eq!(out.max_degree(), 6);
		assert_eq!(out.buckets().collect::<Vec<_>>(), vec![(0, 6), (6, 1)]);
	}

	#[test]
	fn large_degrees_go_to_the_sparse_tail() {
		let d = DegreeDistribution::from_degrees(vec![1, 300, 300, 4000].into_iter());
		assert_eq!(d.count_for(300), 2);
		assert_eq!(d.count_for(4000), 1);
		assert_eq!(d.count_for(299), 0);
		assert_eq!(d.max_degree(), 4000);
		assert_eq!(d.edge_count, 1 + 300 + 300 + 4000);
	}

	#[test]
	fn triangle_clusters_completely() {
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		for _ in 0..3 {
			g.add_vertex();
		}
		for u in 0..3u32 {
			for v in 0..3u32 {
				if u != v {
					g.add_edge(u, v);
				}
			}
		}
		assert_eq!(local_clustering_coefficient(&g, 0), 1.0);
		assert_eq!(average_clustering_coefficient(&g), 1.0);
	}

	#[test]
	fn star_center_does_not_cluster() {
		let g = star(4);
		assert_eq!(local_clustering_coefficient(&g, 0), 0.0);
		assert_eq!(average_clustering_coefficient(&g), 0.0);
	}

	#[test]
	fn half_connected_neighborhood() {
		// 0 → {1, 2, 3}; among the neighbors only 1 → 2 and 2 → 1
		let mut g: DirectedAdjacencyList<(), ()> = DirectedAdjacencyList::new();
		for _ in 0..4 {
			g.add_vertex();
		}
		for v in 1..4u32 {
			g.add_edge(0, v);
		}
		g.add_edge(1, 2);
		g.add_edge(2, 1);
		let c = local_clustering_coefficient(&g, 0);
		assert!((c - 2.0 / 6.0).abs() < 1e-12);
	}
}
