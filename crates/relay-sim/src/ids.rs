//! Generational entity keys.
//!
//! Every arena-owned entity is addressed by a typed `slotmap` key rather than
//! a raw index or the string ids used in the document wire format (§6 of
//! SPEC_FULL.md). Bridges are the one entity kind actually removed during a
//! live simulation, which is exactly what the generation counter in these
//! keys guards against (a stale `BridgeId` held by a relay that already
//! tore down its old contacts can never alias a freshly created bridge that
//! reused the same slot).

slotmap::new_key_type! {
    pub struct TabId;
    pub struct PinId;
    pub struct ComponentId;
    pub struct WireId;
    pub struct JunctionId;
    pub struct VnetId;
    pub struct BridgeId;
    pub struct PageId;
}
