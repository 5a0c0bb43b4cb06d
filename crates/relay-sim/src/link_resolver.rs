//! L6: LinkResolver — merges VNETs across pages via shared link names.
//!
//! Link names never merge VNET membership directly; they're a separate
//! fan-out set the evaluator treats as mutual contributors under the same
//! HIGH-wins OR (SPEC_FULL.md §4.2).

use crate::HashMap;
use crate::ids::{ComponentId, VnetId};
use crate::vnet::VnetTable;
use crate::world::World;

/// `link_name -> every VNET carrying a tab from a component with that link
/// name`. Consulted by the evaluator; never mutated after `resolve`.
pub type LinkIndex = HashMap<String, Vec<VnetId>>;

#[derive(Debug, Clone)]
pub enum LinkWarning {
    /// A link name is present on only one VNET — not an error, just
    /// possibly-unfinished authoring (SPEC_FULL.md Open Questions).
    Dangling { link_name: String },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    #[error("component {0:?} has link_name {1:?} but no tabs — link is unconnectable")]
    Unconnectable(ComponentId, String),
}

pub struct LinkResolveResult {
    pub index: LinkIndex,
    pub warnings: Vec<LinkWarning>,
}

/// Resolve link names into a `link_name -> [VnetId]` index, given every
/// linked component and the VNET table built from page topology.
pub fn resolve(
    world: &World,
    vnets: &VnetTable,
    vnet_for_tab: impl Fn(crate::ids::TabId) -> Option<VnetId>,
) -> Result<LinkResolveResult, LinkError> {
    let mut by_name: HashMap<String, Vec<ComponentId>> = HashMap::default();
    for (id, component) in world.components.iter() {
        if let Some(name) = &component.link_name {
            by_name.entry(name.clone()).or_default().push(id);
        }
    }

    let mut index: LinkIndex = HashMap::default();
    let mut warnings = Vec::new();

    for (name, components) in &by_name {
        let mut vnet_ids: Vec<VnetId> = Vec::new();
        for &component_id in components {
            let component = &world.components[component_id];
            let mut component_has_tabs = false;
            for &pin_id in &component.pins {
                for &tab_id in &world.pins[pin_id].tabs {
                    component_has_tabs = true;
                    if let Some(vnet_id) = vnet_for_tab(tab_id) {
                        vnet_ids.push(vnet_id);
                    }
                }
            }
            if !component_has_tabs {
                return Err(LinkError::Unconnectable(component_id, name.clone()));
            }
        }
        vnet_ids.sort_unstable();
        vnet_ids.dedup();

        if vnet_ids.len() <= 1 {
            warnings.push(LinkWarning::Dangling {
                link_name: name.clone(),
            });
        }

        for &vnet_id in &vnet_ids {
            if let Some(v) = vnets.get(vnet_id) {
                v.add_link_name(name.clone());
            }
        }
        index.insert(name.clone(), vnet_ids);
    }

    Ok(LinkResolveResult { index, warnings })
}
