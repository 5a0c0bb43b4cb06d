//! SPEC_FULL.md §6/§4.11: the wire-format document schema and the loader
//! that turns it into a [`World`]. This is the only place string ids are
//! ever touched — everything downstream of `load_document` addresses
//! entities exclusively by their generational keys.

use serde::Deserialize;

use crate::HashMap;
use crate::component::{
    ComponentKind, ComponentRecord, DpdtRelay, Indicator, Link, Rotation, SubCircuit, Switch, Unknown, Vcc,
};
use crate::component::switch::SwitchMode;
use crate::error::ConfigurationError;
use crate::ids::{ComponentId, JunctionId, PageId, TabId, WireId};
use crate::model::page::Page;
use crate::model::pin::Pin;
use crate::model::tab::Tab;
use crate::model::wire::{Junction, Wire};
use crate::world::World;

pub const SUPPORTED_MAJOR_VERSIONS: &[u32] = &[1];
pub const MAX_SUBCIRCUIT_DEPTH: u32 = 16;

#[derive(Debug, Clone, Deserialize)]
pub struct VersionSchema {
    pub major: u32,
    pub minor: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaypointSchema {
    pub id: String,
    #[serde(default)]
    pub position: (f64, f64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TabSchema {
    pub id: String,
    #[serde(default)]
    pub position: (f64, f64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinSchema {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub tabs: Vec<TabSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentSchema {
    pub id: String,
    pub component_type: String,
    #[serde(default)]
    pub position: (f64, f64),
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub flip_horizontal: bool,
    #[serde(default)]
    pub flip_vertical: bool,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub link_name: Option<String>,
    #[serde(default)]
    pub pins: Vec<PinSchema>,
    /// Present only when `component_type == "SubCircuit"`: the name of the
    /// entry in `DocumentSchema::sub_circuits` to instantiate.
    #[serde(default)]
    pub sub_circuit_definition: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSchema {
    pub id: String,
    pub start_tab: String,
    #[serde(default)]
    pub end_tab: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<WaypointSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JunctionSchema {
    pub id: String,
    #[serde(default)]
    pub position: (f64, f64),
    /// The wire this junction branches off of.
    pub trunk_wire: String,
    /// The wires that branch off this junction.
    pub child_wires: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanvasViewSchema {
    #[serde(default)]
    pub pan_x: f64,
    #[serde(default)]
    pub pan_y: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSchema {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub canvas_view: CanvasViewSchema,
    #[serde(default)]
    pub components: Vec<ComponentSchema>,
    #[serde(default)]
    pub wires: Vec<WireSchema>,
    #[serde(default)]
    pub junctions: Vec<JunctionSchema>,
}

/// A sub-circuit definition is self-contained: its page bodies are
/// embedded directly rather than referenced by id into the outer
/// document, so instancing one never has to look outside this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct SubCircuitDefSchema {
    pub name: String,
    pub footprint_page: String,
    pub pages: Vec<PageSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSchema {
    pub version: VersionSchema,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub pages: Vec<PageSchema>,
    #[serde(default)]
    pub sub_circuits: HashMap<String, SubCircuitDefSchema>,
}

/// Deserialize and build a [`World`] from a document's JSON text. Rejects
/// an unsupported major version before touching the arenas; tolerates
/// unknown `component_type` values as [`Unknown`] placeholders.
pub fn load_document(json: &str) -> Result<World, ConfigurationError> {
    let schema: DocumentSchema =
        serde_json::from_str(json).map_err(|e| ConfigurationError::Malformed(e.to_string()))?;

    if !SUPPORTED_MAJOR_VERSIONS.contains(&schema.version.major) {
        return Err(ConfigurationError::UnsupportedVersion {
            found: schema.version.major,
            supported: SUPPORTED_MAJOR_VERSIONS.to_vec(),
        });
    }

    let mut loader = Loader {
        world: World::new(),
        sub_circuits: schema.sub_circuits.clone(),
    };

    for page_schema in &schema.pages {
        let page_id = loader.load_page(page_schema, 0)?;
        loader.world.document.pages.push(page_id);
    }

    loader.world.document.version = (schema.version.major, schema.version.minor);
    loader.world.document.metadata = schema.metadata;
    Ok(loader.world)
}

struct Loader {
    world: World,
    sub_circuits: HashMap<String, SubCircuitDefSchema>,
}

impl Loader {
    fn load_page(&mut self, schema: &PageSchema, depth: u32) -> Result<PageId, ConfigurationError> {
        let mut page = Page::new(&schema.name);
        page.canvas_view.pan_x = schema.canvas_view.pan_x;
        page.canvas_view.pan_y = schema.canvas_view.pan_y;
        page.canvas_view.zoom = schema.canvas_view.zoom;
        let page_id = self.world.pages.insert(page);

        let mut tab_map: HashMap<String, TabId> = HashMap::default();
        let mut wire_map: HashMap<String, WireId> = HashMap::default();

        for component_schema in &schema.components {
            let component_id = self.load_component(component_schema, page_id, depth, &mut tab_map)?;
            self.world.pages[page_id].components.push(component_id);
        }

        for wire_schema in &schema.wires {
            let wire_id = self.load_wire_shell(wire_schema, &tab_map)?;
            wire_map.insert(wire_schema.id.clone(), wire_id);
            self.world.pages[page_id].wires.push(wire_id);
        }

        for junction_schema in &schema.junctions {
            self.load_junction(junction_schema, &wire_map)?;
        }

        Ok(page_id)
    }

    fn load_wire_shell(&mut self, schema: &WireSchema, tab_map: &HashMap<String, TabId>) -> Result<WireId, ConfigurationError> {
        let start_tab = *tab_map
            .get(&schema.start_tab)
            .ok_or_else(|| ConfigurationError::UnknownTabRef(schema.start_tab.clone()))?;
        let end_tab = match &schema.end_tab {
            Some(id) => Some(
                *tab_map
                    .get(id)
                    .ok_or_else(|| ConfigurationError::UnknownTabRef(id.clone()))?,
            ),
            None => None,
        };
        Ok(self.world.wires.insert(Wire {
            start_tab,
            end_tab,
            waypoints: schema
                .waypoints
                .iter()
                .map(|w| crate::model::wire::Waypoint {
                    id: w.id.clone(),
                    position: w.position,
                })
                .collect(),
            junctions: Vec::new(),
            parent_junction: None,
        }))
    }

    fn load_junction(&mut self, schema: &JunctionSchema, wire_map: &HashMap<String, WireId>) -> Result<JunctionId, ConfigurationError> {
        let trunk = *wire_map
            .get(&schema.trunk_wire)
            .ok_or_else(|| ConfigurationError::Malformed(format!("junction {} references unknown trunk wire", schema.id)))?;
        let mut child_ids = Vec::with_capacity(schema.child_wires.len());
        for child in &schema.child_wires {
            let id = *wire_map
                .get(child)
                .ok_or_else(|| ConfigurationError::Malformed(format!("junction {} references unknown child wire {child}", schema.id)))?;
            child_ids.push(id);
        }
        let junction_id = self.world.junctions.insert(Junction {
            position: schema.position,
            child_wires: child_ids.clone(),
        });
        self.world.wires[trunk].junctions.push(junction_id);
        for child in child_ids {
            self.world.wires[child].parent_junction = Some(junction_id);
        }
        Ok(junction_id)
    }

    fn load_component(
        &mut self,
        schema: &ComponentSchema,
        page_id: PageId,
        depth: u32,
        tab_map: &mut HashMap<String, TabId>,
    ) -> Result<ComponentId, ConfigurationError> {
        let component_id = self
            .world
            .components
            .insert_with_key(|id| ComponentRecord::placeholder(id, page_id));
        // Instances of the same sub-circuit definition share the same
        // internal ids (they come from one template), so this reverse
        // lookup only resolves the last-instantiated copy for internal
        // components — fine, since a host never addresses an internal
        // Link directly, only the SubCircuit instance's own id.
        self.world.component_source_ids.insert(component_id, schema.id.clone());
        self.world.component_ids_by_source.insert(schema.id.clone(), component_id);

        for pin_schema in &schema.pins {
            let pin_id = self.world.pins.insert(Pin::new(component_id));
            for tab_schema in &pin_schema.tabs {
                let tab_id = self.world.tabs.insert(Tab::new(pin_id, tab_schema.position));
                self.world.tab_source_ids.insert(tab_id, tab_schema.id.clone());
                tab_map.insert(tab_schema.id.clone(), tab_id);
                self.world.pins[pin_id].tabs.push(tab_id);
            }
            self.world.components[component_id].pins.push(pin_id);
        }

        let kind = self.build_kind(schema, page_id, depth)?;

        let record = &mut self.world.components[component_id];
        record.position = schema.position;
        record.rotation = Rotation::from_degrees(schema.rotation)
            .ok_or_else(|| ConfigurationError::Malformed(format!("component {} has invalid rotation {}", schema.id, schema.rotation)))?;
        record.flip_horizontal = schema.flip_horizontal;
        record.flip_vertical = schema.flip_vertical;
        record.properties = schema.properties.clone();
        record.link_name = schema.link_name.clone();
        record.kind = kind;

        Ok(component_id)
    }

    fn build_kind(&mut self, schema: &ComponentSchema, page_id: PageId, depth: u32) -> Result<ComponentKind, ConfigurationError> {
        match schema.component_type.as_str() {
            "VCC" => Ok(ComponentKind::Vcc(Vcc)),
            "Switch" => {
                let mode = schema
                    .properties
                    .get("mode")
                    .and_then(|v| v.as_str())
                    .map(SwitchMode::parse)
                    .unwrap_or(SwitchMode::Toggle);
                Ok(ComponentKind::Switch(Switch::new(mode)))
            }
            "Indicator" => Ok(ComponentKind::Indicator(Indicator)),
            "DPDTRelay" => Ok(ComponentKind::Relay(DpdtRelay::default())),
            "Link" => Ok(ComponentKind::Link(Link)),
            "SubCircuit" => self.build_subcircuit(schema, page_id, depth),
            other => Ok(ComponentKind::Unknown(Unknown {
                original_type: other.to_string(),
            })),
        }
    }

    fn build_subcircuit(&mut self, schema: &ComponentSchema, _page_id: PageId, depth: u32) -> Result<ComponentKind, ConfigurationError> {
        if depth >= MAX_SUBCIRCUIT_DEPTH {
            return Err(ConfigurationError::SubCircuitTooDeep { max: MAX_SUBCIRCUIT_DEPTH });
        }
        let def_name = schema
            .sub_circuit_definition
            .clone()
            .ok_or_else(|| ConfigurationError::Malformed(format!("SubCircuit component {} has no sub_circuit_definition", schema.id)))?;
        let def = self
            .sub_circuits
            .get(&def_name)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownSubCircuitDefinition(def_name.clone()))?;

        let mut footprint_page_id = None;
        for page_schema in &def.pages {
            let is_footprint = page_schema.id == def.footprint_page;
            let page_id = self.load_page(page_schema, depth + 1)?;
            if is_footprint {
                footprint_page_id = Some(page_id);
            }
        }
        let footprint_page_id =
            footprint_page_id.ok_or_else(|| ConfigurationError::Malformed(format!("sub-circuit {def_name} has no footprint page")))?;

        let links: Vec<(Option<String>, ComponentId)> = self.world.pages[footprint_page_id]
            .components
            .clone()
            .into_iter()
            .filter_map(|cid| match &self.world.components[cid].kind {
                ComponentKind::Link(_) => Some((self.world.components[cid].link_name.clone(), cid)),
                _ => None,
            })
            .collect();

        let mut pin_to_link = Vec::with_capacity(schema.pins.len());
        for (index, pin_schema) in schema.pins.iter().enumerate() {
            let matched = pin_schema
                .name
                .as_ref()
                .and_then(|name| links.iter().find(|(link_name, _)| link_name.as_deref() == Some(name.as_str())))
                .map(|(_, id)| *id)
                .or_else(|| links.get(index).map(|(_, id)| *id))
                .ok_or_else(|| ConfigurationError::SubCircuitPinWithoutLink(def_name.clone()))?;
            pin_to_link.push(matched);
        }

        Ok(ComponentKind::SubCircuit(SubCircuit {
            definition_name: def_name,
            pin_to_link,
        }))
    }
}
