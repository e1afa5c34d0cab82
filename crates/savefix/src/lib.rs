//! Repairs Star Rupture world saves by pruning rail-drone entities.
//!
//! The repair core ([`repair`]) works on an in-memory `serde_json::Value` and
//! never touches the file system; [`save`] is the disk wrapper around it.

pub mod document;
pub mod profile;
pub mod repair;
pub mod save;

pub use document::{
    locate_entity_collection, locate_entity_collection_mut, DocumentError, DocumentSegment,
    EntityCollection,
};
pub use profile::{ProfileError, RepairProfile};
pub use repair::{
    classify, entity_key, Classification, MovementRefs, NoopObserver, Policy, PolicyRequest,
    ReferenceExtractor, RepairEngine, RepairError, RepairEvent, RepairObserver, RunOutcome,
    RunResult, TracingObserver,
};
pub use save::{
    encode_document, fixed_output_path, load_save_file, write_fixed_save, write_save_file, SaveFile,
    SaveFileError, WrittenSave,
};
