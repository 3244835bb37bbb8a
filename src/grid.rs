//! Infinite and bounded 2-D grid graphs filtered by composable predicates.
//!
//! A grid vertex is a [`Point2`]; a grid edge is the pair of a source point
//! and one of the 8 canonical directions. Which vertices and edges actually
//! exist is decided by a [`GridFilter`]; filters compose by conjunction.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::graph::{Bidirectional, Graph, Incidence, SearchDefaults, VertexColor, VertexList};
use crate::property::DictionaryPropertyMap;

/// A point on the integer grid.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Point2 {
	pub x: i32,
	pub y: i32,
}

impl Point2 {
	pub fn new(x: i32, y: i32) -> Self {
		Self { x, y }
	}
	pub fn origin() -> Self {
		Self { x: 0, y: 0 }
	}
}

impl Add for Point2 {
	type Output = Point2;
	fn add(self, other: Point2) -> Point2 {
		Point2 { x: self.x + other.x, y: self.y + other.y }
	}
}

impl Sub for Point2 {
	type Output = Point2;
	fn sub(self, other: Point2) -> Point2 {
		Point2 { x: self.x - other.x, y: self.y - other.y }
	}
}

impl Neg for Point2 {
	type Output = Point2;
	fn neg(self) -> Point2 {
		Point2 { x: -self.x, y: -self.y }
	}
}

/// One of the 8 canonical grid directions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
	North,
	NorthEast,
	East,
	SouthEast,
	South,
	SouthWest,
	West,
	NorthWest,
}

impl Direction {
	pub const ALL: [Direction; 8] = [
		Direction::North,
		Direction::NorthEast,
		Direction::East,
		Direction::SouthEast,
		Direction::South,
		Direction::SouthWest,
		Direction::West,
		Direction::NorthWest,
	];

	/// Unit offset of the direction; north is +y, east is +x
	pub fn offset(self) -> Point2 {
		match self {
			Direction::North => Point2::new(0, 1),
			Direction::NorthEast => Point2::new(1, 1),
			Direction::East => Point2::new(1, 0),
			Direction::SouthEast => Point2::new(1, -1),
			Direction::South => Point2::new(0, -1),
			Direction::SouthWest => Point2::new(-1, -1),
			Direction::West => Point2::new(-1, 0),
			Direction::NorthWest => Point2::new(-1, 1),
		}
	}

	pub fn reversed(self) -> Direction {
		match self {
			Direction::North => Direction::South,
			Direction::NorthEast => Direction::SouthWest,
			Direction::East => Direction::West,
			Direction::SouthEast => Direction::NorthWest,
			Direction::South => Direction::North,
			Direction::SouthWest => Direction::NorthEast,
			Direction::West => Direction::East,
			Direction::NorthWest => Direction::SouthEast,
		}
	}

	/// Whether the direction is one of the four cardinal ones
	pub fn is_cardinal(self) -> bool {
		matches!(self, Direction::North | Direction::East | Direction::South | Direction::West)
	}
}

/// A grid edge: source point plus direction of travel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct GridEdge {
	pub source: Point2,
	pub direction: Direction,
}

impl GridEdge {
	pub fn new(source: Point2, direction: Direction) -> Self {
		Self { source, direction }
	}
	pub fn destination(self) -> Point2 {
		self.source + self.direction.offset()
	}
}

/// Decides which vertices and edges are part of a grid.
pub trait GridFilter {
	fn contains_vertex(&self, vertex: Point2) -> bool;
	fn contains_edge(&self, edge: GridEdge) -> bool;

	/// Conjunction of two filters
	fn and<O: GridFilter>(self, other: O) -> ComposedGridFilter<Self, O>
	where
		Self: Sized,
	{
		ComposedGridFilter { first: self, second: other }
	}
}

/// The unfiltered grid: every vertex and every edge exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompleteGridFilter;

impl GridFilter for CompleteGridFilter {
	fn contains_vertex(&self, _vertex: Point2) -> bool {
		true
	}
	fn contains_edge(&self, _edge: GridEdge) -> bool {
		true
	}
}

/// Keeps only the four cardinal directions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManhattanGridFilter;

impl GridFilter for ManhattanGridFilter {
	fn contains_vertex(&self, _vertex: Point2) -> bool {
		true
	}
	fn contains_edge(&self, edge: GridEdge) -> bool {
		edge.direction.is_cardinal()
	}
}

/// Keeps vertices inside an axis-aligned closed box, and edges whose both
/// endpoints are inside it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RectangularGridFilter {
	min: Point2,
	max: Point2,
}

impl RectangularGridFilter {
	/// Box spanned by two opposite corners, in any order
	pub fn new(a: Point2, b: Point2) -> Self {
		Self {
			min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
			max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
		}
	}
	pub fn min(&self) -> Point2 {
		self.min
	}
	pub fn max(&self) -> Point2 {
		self.max
	}
	pub fn width(&self) -> usize {
		(self.max.x - self.min.x) as usize + 1
	}
	pub fn height(&self) -> usize {
		(self.max.y - self.min.y) as usize + 1
	}
}

impl GridFilter for RectangularGridFilter {
	fn contains_vertex(&self, vertex: Point2) -> bool {
		vertex.x >= self.min.x && vertex.x <= self.max.x && vertex.y >= self.min.y && vertex.y <= self.max.y
	}
	fn contains_edge(&self, edge: GridEdge) -> bool {
		self.contains_vertex(edge.source) && self.contains_vertex(edge.destination())
	}
}

/// Two filters combined by AND.
#[derive(Clone, Copy, Debug)]
pub struct ComposedGridFilter<A, B> {
	first: A,
	second: B,
}

impl<A: GridFilter, B: GridFilter> GridFilter for ComposedGridFilter<A, B> {
	fn contains_vertex(&self, vertex: Point2) -> bool {
		self.first.contains_vertex(vertex) && self.second.contains_vertex(vertex)
	}
	fn contains_edge(&self, edge: GridEdge) -> bool {
		self.first.contains_edge(edge) && self.second.contains_edge(edge)
	}
}

/// The 2-D grid graph induced by a filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct InfiniteGrid<F: GridFilter> {
	filter: F,
}

impl<F: GridFilter> InfiniteGrid<F> {
	pub fn new(filter: F) -> Self {
		Self { filter }
	}
	pub fn filter(&self) -> &F {
		&self.filter
	}
}

/// Grid bounded to an axis-aligned box; additionally enumerable.
pub type RectangularBoundedGrid = InfiniteGrid<RectangularGridFilter>;

impl RectangularBoundedGrid {
	pub fn bounded(a: Point2, b: Point2) -> Self {
		InfiniteGrid::new(RectangularGridFilter::new(a, b))
	}
}

impl<F: GridFilter> Graph for InfiniteGrid<F> {
	type VId = Point2;
	type EId = GridEdge;
}

/// Lazy iterator over the filtered edges incident to one grid point.
pub struct GridEdges<'g, F> {
	filter: &'g F,
	center: Point2,
	next_direction: usize,
	/// false: outgoing edges of `center`; true: edges pointing at `center`
	incoming: bool,
	/// center itself failed the vertex filter; yields nothing
	dead: bool,
}

impl<'g, F: GridFilter> Iterator for GridEdges<'g, F> {
	type Item = GridEdge;
	fn next(&mut self) -> Option<GridEdge> {
		if self.dead {
			return None;
		}
		while self.next_direction < Direction::ALL.len() {
			let direction = Direction::ALL[self.next_direction];
			self.next_direction += 1;
			let edge = if self.incoming {
				GridEdge::new(self.center + direction.offset(), direction.reversed())
			} else {
				GridEdge::new(self.center, direction)
			};
			let far = if self.incoming { edge.source } else { edge.destination() };
			if self.filter.contains_vertex(far) && self.filter.contains_edge(edge) {
				return Some(edge);
			}
		}
		None
	}
}

impl<F: GridFilter> Incidence for InfiniteGrid<F> {
	type OutEdges<'g> = GridEdges<'g, F> where Self: 'g;
	fn edges_from(&self, vertex: Point2) -> GridEdges<'_, F> {
		GridEdges {
			filter: &self.filter,
			center: vertex,
			next_direction: 0,
			incoming: false,
			dead: !self.filter.contains_vertex(vertex),
		}
	}
	fn source(&self, edge: GridEdge) -> Point2 {
		edge.source
	}
	fn destination(&self, edge: GridEdge) -> Point2 {
		edge.destination()
	}
}

impl<F: GridFilter> Bidirectional for InfiniteGrid<F> {
	type InEdges<'g> = GridEdges<'g, F> where Self: 'g;
	fn edges_to(&self, vertex: Point2) -> GridEdges<'_, F> {
		GridEdges {
			filter: &self.filter,
			center: vertex,
			next_direction: 0,
			incoming: true,
			dead: !self.filter.contains_vertex(vertex),
		}
	}
}

impl<F: GridFilter> SearchDefaults for InfiniteGrid<F> {
	type DefaultColorMap = DictionaryPropertyMap<Point2, VertexColor>;
	fn make_default_color_map(&self, repeating: VertexColor) -> Self::DefaultColorMap {
		DictionaryPropertyMap::repeating(repeating)
	}
}

/// Row-major enumeration of the points of a bounded grid.
#[derive(Clone, Debug)]
pub struct RowMajorPoints {
	min: Point2,
	max: Point2,
	next: Option<Point2>,
}

impl Iterator for RowMajorPoints {
	type Item = Point2;
	fn next(&mut self) -> Option<Point2> {
		let current = self.next?;
		self.next = if current.x < self.max.x {
			Some(Point2::new(current.x + 1, current.y))
		} else if current.y < self.max.y {
			Some(Point2::new(self.min.x, current.y + 1))
		} else {
			None
		};
		Some(current)
	}
}

impl VertexList for InfiniteGrid<RectangularGridFilter> {
	type Vertices<'g> = RowMajorPoints where Self: 'g;
	fn vertices(&self) -> RowMajorPoints {
		RowMajorPoints {
			min: self.filter.min(),
			max: self.filter.max(),
			next: Some(self.filter.min()),
		}
	}
	fn vertex_count(&self) -> usize {
		self.filter.width() * self.filter.height()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn complete_grid_has_eight_neighbors() {
		let g = InfiniteGrid::new(CompleteGridFilter);
		assert_eq!(g.out_degree(Point2::origin()), 8);
		assert_eq!(g.in_degree(Point2::origin()), 8);
	}

	#[test]
	fn manhattan_grid_has_four_neighbors() {
		let g = InfiniteGrid::new(ManhattanGridFilter);
		let edges: Vec<_> = g.edges_from(Point2::origin()).collect();
		assert_eq!(edges.len(), 4);
		assert!(edges.iter().all(|e| e.direction.is_cardinal()));
	}

	#[test]
	fn bounded_grid_enumerates_row_major() {
		let g = RectangularBoundedGrid::bounded(Point2::new(0, 0), Point2::new(2, 1));
		let points: Vec<_> = g.vertices().collect();
		assert_eq!(points.len(), g.vertex_count());
		assert_eq!(
			points,
			vec![
				Point2::new(0, 0),
				Point2::new(1, 0),
				Point2::new(2, 0),
				Point2::new(0, 1),
				Point2::new(1, 1),
				Point2::new(2, 1),
			]
		);
	}

	#[test]
	fn bounded_grid_clips_corner_degrees() {
		let g = RectangularBoundedGrid::bounded(Point2::new(0, 0), Point2::new(3, 3));
		assert_eq!(g.out_degree(Point2::new(0, 0)), 3);
		assert_eq!(g.out_degree(Point2::new(1, 1)), 8);
		assert_eq!(g.out_degree(Point2::new(0, 1)), 5);
		assert_eq!(g.out_degree(Point2::new(4, 4)), 0);
	}

	#[test]
	fn composed_filter_is_the_conjunction() {
		let g = InfiniteGrid::new(
			RectangularGridFilter::new(Point2::new(0, 0), Point2::new(2, 2)).and(ManhattanGridFilter),
		);
		assert_eq!(g.out_degree(Point2::new(1, 1)), 4);
		assert_eq!(g.out_degree(Point2::new(0, 0)), 2);
	}

	#[test]
	fn incoming_edges_reverse_each_direction() {
		let g = InfiniteGrid::new(ManhattanGridFilter);
		let center = Point2::new(5, 5);
		for e in g.edges_to(center) {
			assert_eq!(e.destination(), center);
			assert!(g.edges_from(e.source).any(|out| out == e));
		}
		assert_eq!(g.in_degree(center), 4);
	}
}
