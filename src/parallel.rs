//! The vertex-parallel engine: think-like-a-vertex super-steps over a
//! parallel projection of a mutable graph, with mailboxes guaranteeing at
//! most one merged message per recipient per super-step.
//!
//! Within a super-step, sends from different vertices are unordered and
//! races collapse through [`MergeableMessage::merge`]; across super-steps,
//! every send in step *k* is visible to exactly one inbox read in step
//! *k+1*. Structural mutation is not permitted during a step.

use std::sync::Mutex;

use noisy_float::prelude::{n64, Float, N64};

use crate::adjacency::{AdjacencyProjection, DirectedAdjacencyList};
use crate::graph::{DenseId, EdgeProperty, Graph, Incidence, Property, Weighted};

/// A message type whose values can be folded into one.
///
/// `merge` must be commutative and associative; the engine relies on that
/// to make delivery independent of send order.
pub trait MergeableMessage {
	fn merge(&mut self, other: Self);
}

/// Scoped access to one vertex's mail during a super-step: the merged
/// message delivered to it, and the ability to send.
pub trait Mailbox {
	type Message;
	/// The merged message delivered for this vertex, if anyone sent to it
	fn inbox(&self) -> Option<&Self::Message>;
	/// Enqueue for `to`; merges if a message for `to` is already enqueued
	fn send(&mut self, message: Self::Message, to: usize);
}

/// Per-graph mailbox storage, indexed by dense vertex ids.
pub trait Mailboxes {
	type Message: MergeableMessage;
	type Mailbox<'a>: Mailbox<Message = Self::Message>
	where
		Self: 'a;
	/// The mailbox of one vertex. Distinct vertices may acquire their
	/// mailboxes concurrently; between [`Mailboxes::deliver`] calls every
	/// inbox is read-only.
	fn mailbox(&self, vertex: usize) -> Self::Mailbox<'_>;
	/// Move outboxes to inboxes; true iff any message was pending
	fn deliver(&mut self) -> bool;
}

/// Mailboxes for single-threaded stepping: one inbox array and one shared
/// outbox array; `deliver` swaps and clears.
pub struct SequentialMailboxes<M> {
	inboxes: Vec<Option<M>>,
	outboxes: Mutex<Vec<Option<M>>>,
}

impl<M> SequentialMailboxes<M> {
	pub fn new(vertex_count: usize) -> Self {
		Self {
			inboxes: (0..vertex_count).map(|_| None).collect(),
			outboxes: Mutex::new((0..vertex_count).map(|_| None).collect()),
		}
	}
}

/// Handle to one vertex's mail in a [`SequentialMailboxes`].
pub struct SequentialMailboxRef<'a, M> {
	inbox: Option<&'a M>,
	outboxes: &'a Mutex<Vec<Option<M>>>,
}

impl<'a, M: MergeableMessage> Mailbox for SequentialMailboxRef<'a, M> {
	type Message = M;
	fn inbox(&self) -> Option<&M> {
		self.inbox
	}
	fn send(&mut self, message: M, to: usize) {
		let mut outboxes = self.outboxes.lock().expect("mailbox mutex poisoned");
		match &mut outboxes[to] {
			Some(existing) => existing.merge(message),
			slot => *slot = Some(message),
		}
	}
}

impl<M: MergeableMessage> Mailboxes for SequentialMailboxes<M> {
	type Message = M;
	type Mailbox<'a> = SequentialMailboxRef<'a, M> where Self: 'a;
	fn mailbox(&self, vertex: usize) -> SequentialMailboxRef<'_, M> {
		SequentialMailboxRef { inbox: self.inboxes[vertex].as_ref(), outboxes: &self.outboxes }
	}
	fn deliver(&mut self) -> bool {
		let outboxes = self.outboxes.get_mut().expect("mailbox mutex poisoned");
		std::mem::swap(&mut self.inboxes, outboxes);
		for slot in outboxes.iter_mut() {
			*slot = None;
		}
		self.inboxes.iter().any(Option::is_some)
	}
}

/// Mailboxes sharding outboxes per worker thread so `send` stays off any
/// shared lock in the common case; donated threads fall back to the last
/// row. `deliver` swaps the first non-empty row into the inbox array and
/// merges the remaining rows index-wise.
pub struct PerThreadMailboxes<M> {
	inboxes: Vec<Option<M>>,
	outboxes: Vec<Mutex<Vec<Option<M>>>>,
}

impl<M> PerThreadMailboxes<M> {
	/// `workers` outbox rows plus one for donated threads
	pub fn new(vertex_count: usize, workers: usize) -> Self {
		Self {
			inboxes: (0..vertex_count).map(|_| None).collect(),
			outboxes: (0..workers + 1)
				.map(|_| Mutex::new((0..vertex_count).map(|_| None).collect()))
				.collect(),
		}
	}

	/// Rows matching the global thread pool
	pub fn with_default_workers(vertex_count: usize) -> Self {
		#[cfg(feature = "parallel")]
		let workers = rayon::current_num_threads();
		#[cfg(not(feature = "parallel"))]
		let workers = 1;
		Self::new(vertex_count, workers)
	}
}

fn current_worker_row(rows: usize) -> usize {
	#[cfg(feature = "parallel")]
	{
		match rayon::current_thread_index() {
			Some(index) if index + 1 < rows => index,
			_ => rows - 1,
		}
	}
	#[cfg(not(feature = "parallel"))]
	{
		let _ = rows;
		0
	}
}

/// Handle to one vertex's mail in a [`PerThreadMailboxes`].
pub struct PerThreadMailboxRef<'a, M> {
	inbox: Option<&'a M>,
	outboxes: &'a [Mutex<Vec<Option<M>>>],
}

impl<'a, M: MergeableMessage> Mailbox for PerThreadMailboxRef<'a, M> {
	type Message = M;
	fn inbox(&self) -> Option<&M> {
		self.inbox
	}
	fn send(&mut self, message: M, to: usize) {
		let row = current_worker_row(self.outboxes.len());
		let mut outboxes = self.outboxes[row].lock().expect("mailbox mutex poisoned");
		match &mut outboxes[to] {
			Some(existing) => existing.merge(message),
			slot => *slot = Some(message),
		}
	}
}

impl<M: MergeableMessage> Mailboxes for PerThreadMailboxes<M> {
	type Message = M;
	type Mailbox<'a> = PerThreadMailboxRef<'a, M> where Self: 'a;
	fn mailbox(&self, vertex: usize) -> PerThreadMailboxRef<'_, M> {
		PerThreadMailboxRef { inbox: self.inboxes[vertex].as_ref(), outboxes: &self.outboxes }
	}
	fn deliver(&mut self) -> bool {
		for slot in self.inboxes.iter_mut() {
			*slot = None;
		}
		let mut delivered = false;
		for row in self.outboxes.iter_mut() {
			let row = row.get_mut().expect("mailbox mutex poisoned");
			if !delivered {
				if row.iter().any(Option::is_some) {
					std::mem::swap(&mut self.inboxes, row);
					delivered = true;
				}
			} else {
				for (index, slot) in row.iter_mut().enumerate() {
					if let Some(message) = slot.take() {
						match &mut self.inboxes[index] {
							Some(existing) => existing.merge(message),
							empty => *empty = Some(message),
						}
					}
				}
			}
		}
		delivered
	}
}

/// Partial per-step state merged across all vertex function calls of one
/// super-step.
pub trait GlobalState: Default + Clone + Send {
	fn merge(&mut self, other: Self);
}

impl GlobalState for () {
	fn merge(&mut self, _other: Self) {}
}

/// Everything one vertex function call may touch: its vertex id, the
/// global state of the previous step, the structural projection, and the
/// vertex's mailbox.
pub struct VertexContext<'a, G: Graph, MB, GS> {
	/// Vertex this call executes for
	pub vertex: G::VId,
	global: &'a GS,
	graph: &'a G,
	mailbox: MB,
}

impl<'a, G, MB, GS> VertexContext<'a, G, MB, GS>
where
	G: Incidence + EdgeProperty,
	G::VId: DenseId,
	MB: Mailbox,
{
	/// Global state merged at the end of the previous super-step
	pub fn global(&self) -> &'a GS {
		self.global
	}
	/// The merged message delivered for this vertex
	pub fn inbox(&self) -> Option<&MB::Message> {
		self.mailbox.inbox()
	}
	/// Send to any vertex; multiple sends to one recipient merge
	pub fn send(&mut self, message: MB::Message, to: G::VId) {
		self.mailbox.send(message, to.index());
	}
	/// Outgoing edges of this vertex
	pub fn edges(&self) -> G::OutEdges<'a> {
		self.graph.edges_from(self.vertex)
	}
	pub fn source(&self, edge: G::EId) -> G::VId {
		self.graph.source(edge)
	}
	pub fn destination(&self, edge: G::EId) -> G::VId {
		self.graph.destination(edge)
	}
	/// Read-only edge payload
	pub fn edge(&self, edge: G::EId) -> &'a G::Edge {
		self.graph.edge(edge)
	}
	/// The structural projection itself
	pub fn graph(&self) -> &'a G {
		self.graph
	}
}

/// A graph that can run vertex-parallel super-steps.
///
/// `step` runs the vertex function once per vertex, in parallel when the
/// `parallel` feature is enabled, handing each call mutable access to its
/// own payload and scoped access to its mailbox. Partial global states
/// returned by the calls are merged into per-thread accumulators and then
/// into the one result. `sequential_step` is the single-threaded loop in
/// vertex order, for determinism and testing.
pub trait ParallelGraph: Property {
	type Projection<'g>: Incidence<VId = Self::VId, EId = Self::EId>
		+ EdgeProperty<Edge = Self::Edge>
		+ Sync
	where
		Self: 'g;

	fn step<M, GS, F>(&mut self, mailboxes: &mut M, global: &GS, f: F) -> GS
	where
		M: Mailboxes + Sync,
		GS: GlobalState + Sync,
		F: Fn(&mut VertexContext<'_, Self::Projection<'_>, M::Mailbox<'_>, GS>, &mut Self::Vertex) -> Option<GS>
			+ Send
			+ Sync,
		Self::Vertex: Send;

	fn sequential_step<M, GS, F>(&mut self, mailboxes: &mut M, global: &GS, f: F) -> GS
	where
		M: Mailboxes,
		GS: GlobalState,
		F: FnMut(&mut VertexContext<'_, Self::Projection<'_>, M::Mailbox<'_>, GS>, &mut Self::Vertex) -> Option<GS>;
}

impl<V, E, Id> ParallelGraph for DirectedAdjacencyList<V, E, Id>
where
	V: 'static,
	E: Sync + 'static,
	Id: DenseId + Send + Sync + 'static,
{
	type Projection<'g> = AdjacencyProjection<'g, E, Id> where Self: 'g;

	fn step<M, GS, F>(&mut self, mailboxes: &mut M, global: &GS, f: F) -> GS
	where
		M: Mailboxes + Sync,
		GS: GlobalState + Sync,
		F: Fn(&mut VertexContext<'_, Self::Projection<'_>, M::Mailbox<'_>, GS>, &mut V) -> Option<GS>
			+ Send
			+ Sync,
		V: Send,
	{
		#[cfg(feature = "parallel")]
		{
			use rayon::prelude::*;
			let mut payloads = std::mem::take(&mut self.payloads);
			let projection = self.projection();
			let mailboxes: &M = mailboxes;
			let next = payloads
				.par_iter_mut()
				.enumerate()
				.fold(GS::default, |mut accumulator, (index, payload)| {
					let mut context = VertexContext {
						vertex: Id::from_usize(index),
						global,
						graph: &projection,
						mailbox: mailboxes.mailbox(index),
					};
					if let Some(partial) = f(&mut context, payload) {
						accumulator.merge(partial);
					}
					accumulator
				})
				.reduce(GS::default, |mut left, right| {
					left.merge(right);
					left
				});
			self.payloads = payloads;
			next
		}
		#[cfg(not(feature = "parallel"))]
		{
			self.sequential_step(mailboxes, global, f)
		}
	}

	fn sequential_step<M, GS, F>(&mut self, mailboxes: &mut M, global: &GS, mut f: F) -> GS
	where
		M: Mailboxes,
		GS: GlobalState,
		F: FnMut(&mut VertexContext<'_, Self::Projection<'_>, M::Mailbox<'_>, GS>, &mut V) -> Option<GS>,
	{
		let mut payloads = std::mem::take(&mut self.payloads);
		let projection = self.projection();
		let mailboxes: &M = mailboxes;
		let mut next = GS::default();
		for (index, payload) in payloads.iter_mut().enumerate() {
			let mut context = VertexContext {
				vertex: Id::from_usize(index),
				global,
				graph: &projection,
				mailbox: mailboxes.mailbox(index),
			};
			if let Some(partial) = f(&mut context, payload) {
				next.merge(partial);
			}
		}
		self.payloads = payloads;
		next
	}
}

/// Vertex payload capable of carrying shortest-path state.
pub trait DistanceSearchVertex<EId> {
	fn distance(&self) -> N64;
	fn set_distance(&mut self, distance: N64);
	fn predecessor(&self) -> Option<EId>;
	fn set_predecessor(&mut self, edge: Option<EId>);
}

/// Candidate path offered to a vertex; merging keeps the shorter one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceSearchMessage<EId> {
	pub distance: N64,
	pub predecessor: Option<EId>,
}

impl<EId> MergeableMessage for DistanceSearchMessage<EId> {
	fn merge(&mut self, other: Self) {
		if other.distance < self.distance {
			*self = other;
		}
	}
}

/// Whether any vertex improved its distance during a super-step.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelaxationProgress {
	pub relaxed: bool,
}

impl GlobalState for RelaxationProgress {
	fn merge(&mut self, other: Self) {
		self.relaxed |= other.relaxed;
	}
}

/// Single-source shortest paths on the vertex-parallel engine.
///
/// Resets every vertex to `+∞` (the start to zero) in the first
/// super-step, then relaxes by message passing until two consecutive
/// super-steps make no progress, or `max_steps` is reached. Returns the
/// number of super-steps executed.
pub fn parallel_shortest_paths<G, M>(
	graph: &mut G,
	start: G::VId,
	mailboxes: &mut M,
	max_steps: usize,
) -> usize
where
	G: ParallelGraph,
	G::VId: DenseId + Send + Sync,
	G::Vertex: DistanceSearchVertex<G::EId> + Send,
	G::Edge: Weighted,
	G::EId: Send + Sync,
	M: Mailboxes<Message = DistanceSearchMessage<G::EId>> + Sync,
{
	let mut steps = 0;
	let mut idle = 0;
	while steps < max_steps && idle < 2 {
		let first = steps == 0;
		let progress = graph.step(mailboxes, &RelaxationProgress::default(), |context, payload| {
			let mut improved = N64::infinity();
			let mut predecessor = None;
			if first {
				payload.set_distance(N64::infinity());
				payload.set_predecessor(None);
				if context.vertex == start {
					improved = n64(0.0);
				}
			}
			if let Some(message) = context.inbox() {
				if message.distance < improved && message.distance < payload.distance() {
					improved = message.distance;
					predecessor = message.predecessor;
				}
			}
			if improved < payload.distance() {
				payload.set_distance(improved);
				payload.set_predecessor(predecessor);
				for edge in context.edges() {
					let next = context.destination(edge);
					let offer = DistanceSearchMessage {
						distance: improved + context.edge(edge).weight(),
						predecessor: Some(edge),
					};
					context.send(offer, next);
				}
				Some(RelaxationProgress { relaxed: true })
			} else {
				None
			}
		});
		mailboxes.deliver();
		steps += 1;
		if progress.relaxed {
			idle = 0;
		} else {
			idle += 1;
		}
	}
	log::debug!("parallel shortest paths settled after {} super-steps", steps);
	steps
}
