pub mod document;
pub mod page;
pub mod pin;
pub mod tab;
pub mod wire;

pub use document::Document;
pub use page::Page;
pub use pin::Pin;
pub use tab::Tab;
pub use wire::{Junction, Waypoint, Wire};
