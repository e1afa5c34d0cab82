use tracing::{debug, info, trace, warn};

use crate::document::DocumentSegment;

use super::types::{Policy, RunResult};

/// Plain data emitted by a repair run. Observers must not influence the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairEvent<'a> {
    RunStarted {
        policy: Policy,
        entity_count: usize,
    },
    ScanProgress {
        scanned: usize,
        total: usize,
    },
    IrregularKey {
        entity_key: &'a str,
    },
    DanglingReference {
        entity_key: &'a str,
        target_id: u64,
    },
    DeletionSkipped {
        entity_key: &'a str,
    },
    SegmentMissing {
        policy: Policy,
        segment: DocumentSegment,
    },
    RunFinished {
        policy: Policy,
        result: RunResult,
    },
}

pub trait RepairObserver {
    fn on_event(&mut self, event: &RepairEvent<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RepairObserver for NoopObserver {
    fn on_event(&mut self, _event: &RepairEvent<'_>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RepairObserver for TracingObserver {
    fn on_event(&mut self, event: &RepairEvent<'_>) {
        match *event {
            RepairEvent::RunStarted {
                policy,
                entity_count,
            } => info!(policy = %policy, entity_count, "repair_run_started"),
            RepairEvent::ScanProgress { scanned, total } => {
                trace!(scanned, total, "repair_scan_progress")
            }
            RepairEvent::IrregularKey { entity_key } => {
                debug!(entity_key, "repair_irregular_entity_key")
            }
            RepairEvent::DanglingReference {
                entity_key,
                target_id,
            } => debug!(entity_key, target_id, "repair_dangling_reference"),
            RepairEvent::DeletionSkipped { entity_key } => {
                warn!(entity_key, "repair_deletion_skipped_key_missing")
            }
            RepairEvent::SegmentMissing { policy, segment } => {
                warn!(policy = %policy, segment = %segment, "repair_segment_missing")
            }
            RepairEvent::RunFinished { policy, result } => info!(
                policy = %policy,
                changed = result.changed,
                scanned = result.scanned,
                matched = result.matched,
                deleted = result.deleted,
                skipped = result.skipped,
                "repair_run_summary"
            ),
        }
    }
}
