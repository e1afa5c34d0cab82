mod classifier;
mod engine;
mod graph;
mod observer;
mod reference;
mod types;


pub use classifier::{archetype_of, classify, Classification};
pub use engine::RepairEngine;
pub use graph::{entity_key, is_reference_valid, parse_entity_key};
pub use observer::{NoopObserver, RepairEvent, RepairObserver, TracingObserver};
pub use reference::{MovementRefs, ReferenceExtractor};
pub use types::{Policy, PolicyRequest, RepairError, RunOutcome, RunResult};
