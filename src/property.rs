//! Property maps: uniform key→value access decoupled from graph storage.
//!
//! External maps (table, dictionary) own their storage and ignore the graph;
//! internal maps forward to the graph's own payload slots. A transforming
//! map projects any of them through a sub-field of a larger value.

use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::graph::{DenseId, Graph, Property};

/// A key→value association keyed by vertex or edge ids of a graph.
///
/// `get` is a pure observation. `set` is the only mutating path; whether it
/// touches the graph (internal maps) or the map's own storage (external
/// maps) is implementation detail.
pub trait PropertyMap<G: Graph, K> {
	type Value;
	/// Read the value for `key`. Reading a key the map holds no value for
	/// is a programmer error and fatal.
	fn get(&self, graph: &G, key: K) -> Self::Value;
	/// Write the value for `key`.
	fn set(&mut self, graph: &mut G, key: K, value: Self::Value);

	/// Wrap this map so that it reads and writes through `lens` into a
	/// sub-field of the stored value.
	fn transforming<F, P>(self, lens: F) -> TransformingPropertyMap<Self, F>
	where
		Self: Sized,
		F: Fn(&mut Self::Value) -> &mut P,
	{
		TransformingPropertyMap { base: self, lens }
	}
}

/// External property map backed by a flat array indexed by a dense id.
///
/// Out-of-range keys are fatal.
#[derive(Clone, Debug)]
pub struct TablePropertyMap<K: DenseId, V> {
	values: Vec<V>,
	_key: PhantomData<K>,
}

impl<K: DenseId, V> TablePropertyMap<K, V> {
	/// Map holding `count` copies of `value`
	pub fn repeating(count: usize, value: V) -> Self
	where
		V: Clone,
	{
		Self { values: vec![value; count], _key: PhantomData }
	}
	pub fn len(&self) -> usize {
		self.values.len()
	}
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
	pub fn values(&self) -> &[V] {
		&self.values
	}
}

impl<G: Graph, K: DenseId, V: Clone> PropertyMap<G, K> for TablePropertyMap<K, V> {
	type Value = V;
	fn get(&self, _graph: &G, key: K) -> V {
		self.values[key.index()].clone()
	}
	fn set(&mut self, _graph: &mut G, key: K, value: V) {
		self.values[key.index()] = value;
	}
}

/// External property map backed by a hash table, for keys that are not
/// densely indexable (grid points, edge ids).
///
/// Constructed with [`DictionaryPropertyMap::new`], reading a missing key
/// is fatal; constructed with [`DictionaryPropertyMap::repeating`], missing
/// keys read as the default value.
#[derive(Clone, Debug)]
pub struct DictionaryPropertyMap<K: Hash + Eq, V> {
	values: IndexMap<K, V>,
	default: Option<V>,
}

impl<K: Hash + Eq, V> DictionaryPropertyMap<K, V> {
	pub fn new() -> Self {
		Self { values: IndexMap::new(), default: None }
	}
	/// Map where every key not yet written reads as `default`
	pub fn repeating(default: V) -> Self {
		Self { values: IndexMap::new(), default: Some(default) }
	}
	pub fn len(&self) -> usize {
		self.values.len()
	}
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
	/// Keys written so far, in insertion order
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.values.keys()
	}
}

impl<K: Hash + Eq, V> Default for DictionaryPropertyMap<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<G: Graph, K: Hash + Eq + Copy, V: Clone> PropertyMap<G, K> for DictionaryPropertyMap<K, V> {
	type Value = V;
	fn get(&self, _graph: &G, key: K) -> V {
		match self.values.get(&key).or(self.default.as_ref()) {
			Some(value) => value.clone(),
			None => panic!("read of a key the dictionary property map holds no value for"),
		}
	}
	fn set(&mut self, _graph: &mut G, key: K, value: V) {
		self.values.insert(key, value);
	}
}

/// Internal property map: routes to the graph's own vertex payload slot.
/// Zero extra storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternalVertexPropertyMap;

impl<G: Property> PropertyMap<G, G::VId> for InternalVertexPropertyMap
where
	G::Vertex: Clone,
{
	type Value = G::Vertex;
	fn get(&self, graph: &G, key: G::VId) -> G::Vertex {
		graph.vertex(key).clone()
	}
	fn set(&mut self, graph: &mut G, key: G::VId, value: G::Vertex) {
		*graph.vertex_mut(key) = value;
	}
}

/// Internal property map: routes to the graph's own edge payload slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternalEdgePropertyMap;

impl<G: Property> PropertyMap<G, G::EId> for InternalEdgePropertyMap
where
	G::Edge: Clone,
{
	type Value = G::Edge;
	fn get(&self, graph: &G, key: G::EId) -> G::Edge {
		graph.edge(key).clone()
	}
	fn set(&mut self, graph: &mut G, key: G::EId, value: G::Edge) {
		*graph.edge_mut(key) = value;
	}
}

/// Projects a base map through a writable accessor to a sub-field.
///
/// Writes read the full value, replace the sub-field, and write the full
/// value back, so the base map's storage rules keep applying.
#[derive(Clone, Debug)]
pub struct TransformingPropertyMap<M, F> {
	base: M,
	lens: F,
}

impl<G, K, M, F, P> PropertyMap<G, K> for TransformingPropertyMap<M, F>
where
	G: Graph,
	K: Copy,
	M: PropertyMap<G, K>,
	F: Fn(&mut M::Value) -> &mut P,
	P: Clone,
{
	type Value = P;
	fn get(&self, graph: &G, key: K) -> P {
		let mut value = self.base.get(graph, key);
		(self.lens)(&mut value).clone()
	}
	fn set(&mut self, graph: &mut G, key: K, value: P) {
		let mut full = self.base.get(graph, key);
		*(self.lens)(&mut full) = value;
		self.base.set(graph, key, full);
	}
}
