//! navdoc engine
//!
//! Builds navigation sidebar indexes for generated API documentation. An
//! external extractor supplies raw item declarations (module path, kind,
//! name, one-line summary); this crate groups them into per-module indexes
//! and emits a deterministic JSON artifact a documentation viewer can render
//! without module-specific logic.
//!
//! # Architecture
//!
//! - `model`: Data structures representing the sidebar index
//! - `collect`: Grouping and validation of raw declarations
//! - `serialize`: Deterministic artifact emission
//! - `render`: Summary-markup rendering helper for viewers

pub mod collect;
pub mod model;
pub mod render;
pub mod serialize;

pub use collect::{CollectOutcome, Collector, EntryOrder, RawDecl, Warning};
pub use model::{ItemKind, ModuleIndex, ModulePath, Section, SidebarEntry, SidebarIndex};
pub use serialize::SerializeError;
