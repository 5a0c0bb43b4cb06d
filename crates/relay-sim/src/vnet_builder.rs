//! L6: VnetBuilder — builds the per-page VNET set from components + wires.

use crate::HashMap;
use crate::HashSet;
use crate::ids::{PageId, TabId, WireId};
use crate::vnet::{Vnet, VnetTable};
use crate::world::World;

/// Build the adjacency map described in SPEC_FULL.md §4.1 step 2: walk every
/// top-level wire (one with no `parent_junction`) and recurse through its
/// junctions, unioning the wire's own tabs with every child wire's tabs.
/// Waypoints are ignored (purely visual). An explicit per-call visited set
/// guards against a malformed junction-containment graph that isn't a tree.
fn add_wire_edges(
    world: &World,
    wire_id: WireId,
    adjacency: &mut HashMap<TabId, HashSet<TabId>>,
    visited_wires: &mut HashSet<WireId>,
) {
    if !visited_wires.insert(wire_id) {
        return;
    }
    let wire = &world.wires[wire_id];
    let mut group: Vec<TabId> = wire.own_tabs().collect();

    for &junction_id in &wire.junctions {
        let junction = &world.junctions[junction_id];
        for &child_id in &junction.child_wires {
            add_wire_edges(world, child_id, adjacency, visited_wires);
            let child = &world.wires[child_id];
            group.extend(child.own_tabs());
        }
    }

    for i in 0..group.len() {
        for j in 0..group.len() {
            if i != j {
                adjacency.entry(group[i]).or_default().insert(group[j]);
            }
        }
    }
}

/// Build the VNET set for one page: every tab is assigned to exactly one
/// VNET, its wire-connected component. Tabs unreachable from any wire still
/// each form a singleton VNET.
pub fn build_page_vnets(world: &World, page_id: PageId, vnets: &mut VnetTable) -> Vec<crate::ids::VnetId> {
    let page = &world.pages[page_id];

    let mut all_tabs: HashSet<TabId> = HashSet::default();
    for &component_id in &page.components {
        for &pin_id in &world.components[component_id].pins {
            for &tab_id in &world.pins[pin_id].tabs {
                all_tabs.insert(tab_id);
            }
        }
    }

    let mut adjacency: HashMap<TabId, HashSet<TabId>> = HashMap::default();
    let mut visited_wires: HashSet<WireId> = HashSet::default();
    for &wire_id in &page.wires {
        if world.wires[wire_id].parent_junction.is_none() {
            add_wire_edges(world, wire_id, &mut adjacency, &mut visited_wires);
        }
    }

    let mut unvisited = all_tabs;
    let mut created = Vec::new();

    while let Some(&start) = unvisited.iter().next() {
        unvisited.remove(&start);
        let mut group = HashSet::default();
        group.insert(start);
        let mut stack = vec![start];
        while let Some(tab) = stack.pop() {
            if let Some(neighbors) = adjacency.get(&tab) {
                for &n in neighbors {
                    if group.insert(n) {
                        unvisited.remove(&n);
                        stack.push(n);
                    }
                }
            }
        }
        let id = vnets.insert(Vnet::new(Some(page_id), group));
        created.push(id);
    }

    created
}

/// Build VNETs for every page that exists in the world, including the
/// private page copies instantiated for each `SubCircuit` instance — not
/// just the top-level `Document::pages` list, since those pages
/// participate in the exact same evaluate/propagate loop as any other.
pub fn build_all(world: &World, vnets: &mut VnetTable) -> Vec<crate::ids::VnetId> {
    let mut all = Vec::new();
    let page_ids: Vec<PageId> = world.pages.keys().collect();
    for page_id in page_ids {
        all.extend(build_page_vnets(world, page_id, vnets));
    }
    all
}
