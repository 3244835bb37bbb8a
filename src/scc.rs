//! Strong components, Tarjan's algorithm layered on depth-first events.

use crate::dfs::depth_first_traversal;
use crate::graph::{DenseId, Incidence, SearchDefaults, VertexList};
use crate::property::{PropertyMap, TablePropertyMap};
use crate::visit::{DfsEvent, SearchError};

/// Component id assigned to vertices whose component is not yet known.
pub const UNASSIGNED_COMPONENT: u32 = u32::MAX;

/// Computes strongly connected components, writing a component id per
/// vertex into `components`, and returns the number of components.
///
/// `discover_time` and `roots` are scratch maps the caller provides (and
/// may inspect afterwards); `components` must be initialized to
/// [`UNASSIGNED_COMPONENT`]. Component ids form a reverse topological
/// order of the component DAG: for every edge `(u, v)` crossing
/// components, `component(u) < component(v)` never holds in the forward
/// direction of the DAG — see the tests for the exact property.
pub fn strong_components<G, TM, RM, CM>(
	graph: &mut G,
	discover_time: &mut TM,
	roots: &mut RM,
	components: &mut CM,
) -> u32
where
	G: Incidence + VertexList + SearchDefaults,
	TM: PropertyMap<G, G::VId, Value = u32>,
	RM: PropertyMap<G, G::VId, Value = G::VId>,
	CM: PropertyMap<G, G::VId, Value = u32>,
{
	let mut time = 0u32;
	let mut component_counter = 0u32;
	let mut stack: Vec<G::VId> = Vec::new();
	let result: Result<(), std::convert::Infallible> =
		depth_first_traversal(graph, &mut |event, graph| {
			match event {
				DfsEvent::Discover(v) => {
					components.set(graph, v, UNASSIGNED_COMPONENT);
					discover_time.set(graph, v, time);
					time += 1;
					roots.set(graph, v, v);
					stack.push(v);
				}
				DfsEvent::Finish(v) => {
					let out: Vec<_> = graph.edges_from(v).collect();
					for edge in out {
						let w = graph.destination(edge);
						if components.get(graph, w) == UNASSIGNED_COMPONENT {
							let candidate = roots.get(graph, w);
							let current = roots.get(graph, v);
							if discover_time.get(graph, candidate) < discover_time.get(graph, current) {
								roots.set(graph, v, candidate);
							}
						}
					}
					if roots.get(graph, v) == v {
						while let Some(w) = stack.pop() {
							components.set(graph, w, component_counter);
							roots.set(graph, w, v);
							if w == v {
								break;
							}
						}
						component_counter += 1;
					}
				}
				_ => {}
			}
			Ok(())
		});
	if let Err(never) = result {
		match never {}
	}
	log::debug!("found {} strong components among {} vertices", component_counter, time);
	component_counter
}

/// [`strong_components`] with table maps for dense-id graphs; returns the
/// component map and the component count.
pub fn strong_components_dense<G>(graph: &mut G) -> (TablePropertyMap<G::VId, u32>, u32)
where
	G: Incidence + VertexList + SearchDefaults,
	G::VId: DenseId,
{
	let count = graph.vertex_count();
	let mut discover_time = TablePropertyMap::repeating(count, 0u32);
	let mut roots = TablePropertyMap::repeating(count, G::VId::from_usize(0));
	let mut components = TablePropertyMap::repeating(count, UNASSIGNED_COMPONENT);
	let total = strong_components(graph, &mut discover_time, &mut roots, &mut components);
	(components, total)
}
