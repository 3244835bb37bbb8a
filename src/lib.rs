//! # graphkit
//!
//! Generic graph algorithms over a small lattice of capability traits, in
//! the tradition of the Boost Graph Library: algorithms are written once
//! against [`graph`]'s abstractions and served by any conforming graph.
//!
//! - [`graph`] — the capability traits and vertex colors
//! - [`property`] — property maps decoupling per-vertex/per-edge state
//!   from graph storage
//! - [`adjacency`], [`grid`] — the concrete graphs
//! - [`visit`], [`dfs`], [`bfs`], [`dijkstra`], [`topology`], [`scc`] —
//!   event-driven searches and what is built on them
//! - [`knn`], [`analysis`] — approximate nearest neighbors and
//!   whole-graph measures
//! - [`transform`] — graph copying and edge-filtered views
//! - [`parallel`], [`labelprop`] — the vertex-parallel engine and its
//!   canonical applications
//!
//! Searches report through a single event callback; raising
//! [`visit::SearchError::StopSearch`] ends a search early and silently,
//! any other error propagates. The `parallel` cargo feature (default on)
//! backs the engine with a rayon thread pool; without it every super-step
//! runs on the calling thread.

pub mod adjacency;
pub mod analysis;
pub mod bfs;
pub mod dfs;
pub mod dijkstra;
pub mod graph;
pub mod grid;
pub mod knn;
pub mod labelprop;
pub mod parallel;
pub mod property;
pub mod scc;
pub mod topology;
pub mod transform;
pub mod visit;

pub use noisy_float::prelude::{n64, N64};

pub use crate::adjacency::{BidirectionalAdjacencyList, DirectedAdjacencyList, EdgeId};
pub use crate::analysis::{
	average_clustering_coefficient, degree_distribution, in_degree_distribution,
	local_clustering_coefficient, DegreeDistribution,
};
pub use crate::bfs::{breadth_first_search, breadth_first_search_from, VertexQueue};
pub use crate::dfs::{depth_first_search, depth_first_traversal};
pub use crate::dijkstra::{
	dijkstra_search, dijkstra_search_to, dijkstra_shortest_path, DijkstraQueue, Distance,
};
pub use crate::graph::{
	Bidirectional, DenseId, EdgeList, EdgeProperty, Graph, Incidence, Mutable, MutableProperty,
	Property, SearchDefaults, VertexColor, VertexList, Weighted,
};
pub use crate::grid::{
	CompleteGridFilter, Direction, GridEdge, GridFilter, InfiniteGrid, ManhattanGridFilter, Point2,
	RectangularBoundedGrid, RectangularGridFilter,
};
pub use crate::knn::{connect_nearest_neighbors, k_nearest_neighbors, k_nearest_neighbors_randomized};
pub use crate::labelprop::{
	propagate_labels, IncomingEdgeWeight, LabelBundle, LabelPropagationParameters,
	LabelPropagationVertex,
};
pub use crate::parallel::{
	parallel_shortest_paths, DistanceSearchMessage, DistanceSearchVertex, GlobalState, Mailbox,
	Mailboxes, MergeableMessage, ParallelGraph, PerThreadMailboxes, RelaxationProgress,
	SequentialMailboxes, VertexContext,
};
pub use crate::property::{
	DictionaryPropertyMap, InternalEdgePropertyMap, InternalVertexPropertyMap, PropertyMap,
	TablePropertyMap, TransformingPropertyMap,
};
pub use crate::scc::{strong_components, strong_components_dense, UNASSIGNED_COMPONENT};
pub use crate::topology::{topological_sort, CycleDetected};
pub use crate::transform::{
	copy_graph, copy_property_graph, EdgeFiltered, FilterEdges, FilterFn, NoSelfLoops,
};
pub use crate::visit::{
	BfsEvent, DfsEvent, DictionaryPredecessorRecorder, DijkstraEvent, SearchError,
	TablePredecessorRecorder,
};
