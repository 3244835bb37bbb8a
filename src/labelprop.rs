//! Label propagation on the vertex-parallel engine.
//!
//! Runs in two phases: one super-step accumulating every vertex's total
//! incoming edge weight, then up to `max_steps` super-steps in which each
//! vertex blends the labels its neighbors sent with its own prior and seed
//! labels, and forwards the result scaled by each out-edge's weight.

use serde::{Deserialize, Serialize};

use crate::graph::{DenseId, Weighted};
use crate::parallel::{Mailboxes, MergeableMessage, ParallelGraph};

/// A fixed-width vector of label weights with a validity mask.
///
/// Operations treat invalid slots as absent rather than zero, which is the
/// distinction the propagation formula needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelBundle<const K: usize> {
	weights: [f64; K],
	valid: [bool; K],
}

impl<const K: usize> LabelBundle<K> {
	/// Bundle with every slot absent
	pub fn empty() -> Self {
		Self { weights: [0.0; K], valid: [false; K] }
	}

	/// Bundle with every slot present at `value`
	pub fn uniform(value: f64) -> Self {
		Self { weights: [value; K], valid: [true; K] }
	}

	/// Bundle with a single present slot
	pub fn seed(label: usize, weight: f64) -> Self {
		let mut bundle = Self::empty();
		bundle.set(label, weight);
		bundle
	}

	pub fn get(&self, label: usize) -> Option<f64> {
		if self.valid[label] {
			Some(self.weights[label])
		} else {
			None
		}
	}

	pub fn set(&mut self, label: usize, weight: f64) {
		self.weights[label] = weight;
		self.valid[label] = true;
	}

	pub fn is_empty(&self) -> bool {
		self.valid.iter().all(|&present| !present)
	}

	/// Present `(label, weight)` pairs
	pub fn labels(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
		(0..K).filter_map(move |label| self.get(label).map(|weight| (label, weight)))
	}

	/// Slot-wise sum; a slot present on either side is present in the sum
	pub fn merge(&mut self, other: &Self) {
		for label in 0..K {
			if other.valid[label] {
				if self.valid[label] {
					self.weights[label] += other.weights[label];
				} else {
					self.set(label, other.weights[label]);
				}
			}
		}
	}

	/// Every present slot multiplied by `factor`
	pub fn scaled(&self, factor: f64) -> Self {
		let mut scaled = *self;
		for label in 0..K {
			if scaled.valid[label] {
				scaled.weights[label] *= factor;
			}
		}
		scaled
	}

	/// Adds `addend` to every present slot
	pub fn add_scalar(&mut self, addend: f64) {
		for label in 0..K {
			if self.valid[label] {
				self.weights[label] += addend;
			}
		}
	}

	/// Adds `addend` to every slot where `mask` is present, making the
	/// slot present if it was not
	pub fn conditional_add(&mut self, addend: f64, mask: &Self) {
		for label in 0..K {
			if mask.valid[label] {
				if self.valid[label] {
					self.weights[label] += addend;
				} else {
					self.set(label, addend);
				}
			}
		}
	}

	/// Copies slots present in `other` but absent here
	pub fn fill_missing_from(&mut self, other: &Self) {
		for label in 0..K {
			if !self.valid[label] && other.valid[label] {
				self.set(label, other.weights[label]);
			}
		}
	}

	/// Slot-wise division where both sides are present
	pub fn divided_by(&self, denominator: &Self) -> Self {
		let mut quotient = Self::empty();
		for label in 0..K {
			if self.valid[label] && denominator.valid[label] {
				quotient.set(label, self.weights[label] / denominator.weights[label]);
			}
		}
		quotient
	}
}

impl<const K: usize> Default for LabelBundle<K> {
	fn default() -> Self {
		Self::empty()
	}
}

impl<const K: usize> MergeableMessage for LabelBundle<K> {
	fn merge(&mut self, other: Self) {
		LabelBundle::merge(self, &other);
	}
}

/// Scalar message carrying one edge weight; merging sums.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncomingEdgeWeight(pub f64);

impl MergeableMessage for IncomingEdgeWeight {
	fn merge(&mut self, other: Self) {
		self.0 += other.0;
	}
}

/// Vertex payload participating in label propagation.
pub trait LabelPropagationVertex<const K: usize> {
	/// Labels the vertex is seeded with, possibly none
	fn seed_labels(&self) -> &LabelBundle<K>;
	/// Labels computed by the last super-step
	fn computed_labels(&self) -> &LabelBundle<K>;
	fn set_computed_labels(&mut self, labels: LabelBundle<K>);
	fn total_incoming_edge_weight(&self) -> f64;
	fn set_total_incoming_edge_weight(&mut self, weight: f64);
}

/// Blend weights of the propagation formula.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct LabelPropagationParameters {
	pub seed_weight: f64, //m1
	pub message_weight: f64, //m2
	pub prior_weight: f64, //m3
	pub max_steps: u32,
}

impl Default for LabelPropagationParameters {
	fn default() -> Self {
		Self { seed_weight: 1.0, message_weight: 0.01, prior_weight: 0.01, max_steps: 10 }
	}
}

/// Propagates labels over the graph; returns the number of label
/// super-steps executed.
///
/// Per label super-step, every vertex computes
/// `(m2·inbox + m3·prior + m1·seed) / (m2·total_incoming + m3 + m1·[has seed])`,
/// fills slots still missing from its seed, stores the result as its
/// computed labels, and sends them scaled by each out-edge's weight.
/// `early_exit` inspects the step counter before each super-step and may
/// cut the run short.
pub fn propagate_labels<G, MW, ML, EX, const K: usize>(
	graph: &mut G,
	weight_mailboxes: &mut MW,
	label_mailboxes: &mut ML,
	parameters: &LabelPropagationParameters,
	mut early_exit: EX,
) -> u32
where
	G: ParallelGraph,
	G::VId: DenseId + Send + Sync,
	G::Vertex: LabelPropagationVertex<K> + Send,
	G::Edge: Weighted,
	MW: Mailboxes<Message = IncomingEdgeWeight> + Sync,
	ML: Mailboxes<Message = LabelBundle<K>> + Sync,
	EX: FnMut(u32) -> bool,
{
	// Phase 1: every vertex offers its out-edge weights to the
	// destinations; after delivery each vertex stores the merged sum.
	graph.step(weight_mailboxes, &(), |context, _payload| {
		for edge in context.edges() {
			let weight = context.edge(edge).weight().raw();
			let destination = context.destination(edge);
			context.send(IncomingEdgeWeight(weight), destination);
		}
		None
	});
	weight_mailboxes.deliver();
	graph.step(weight_mailboxes, &(), |context, payload| {
		let total = context.inbox().map(|message| message.0).unwrap_or(0.0);
		payload.set_total_incoming_edge_weight(total);
		payload.set_computed_labels(*payload.seed_labels());
		None
	});

	// Phase 2: blend and forward until max_steps or the hook stops it.
	let m1 = parameters.seed_weight;
	let m2 = parameters.message_weight;
	let m3 = parameters.prior_weight;
	let mut steps = 0;
	while steps < parameters.max_steps {
		if early_exit(steps) {
			break;
		}
		graph.step(label_mailboxes, &(), |context, payload| {
			let seed = *payload.seed_labels();
			let mut numerator = context.inbox().copied().unwrap_or_else(LabelBundle::empty).scaled(m2);
			numerator.merge(&payload.computed_labels().scaled(m3));
			numerator.merge(&seed.scaled(m1));
			let mut denominator =
				LabelBundle::uniform(m2 * payload.total_incoming_edge_weight() + m3);
			denominator.conditional_add(m1, &seed);
			let mut labels = numerator.divided_by(&denominator);
			labels.fill_missing_from(&seed);
			payload.set_computed_labels(labels);
			for edge in context.edges() {
				let scaled = labels.scaled(context.edge(edge).weight().raw());
				let destination = context.destination(edge);
				context.send(scaled, destination);
			}
			None
		});
		label_mailboxes.deliver();
		steps += 1;
	}
	log::debug!("label propagation ran {} super-steps", steps);
	steps
}
