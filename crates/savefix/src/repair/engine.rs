use serde_json::Value;

use crate::document::{locate_entity_collection, locate_entity_collection_mut, EntityCollection};
use crate::profile::{ProfileError, RepairProfile};

use super::classifier::{classify, Classification};
use super::graph::{is_reference_valid, parse_entity_key};
use super::observer::{RepairEvent, RepairObserver};
use super::reference::ReferenceExtractor;
use super::types::{Policy, RepairError, RunResult};

#[derive(Debug, Clone)]
pub struct RepairEngine {
    profile: RepairProfile,
    extractor: ReferenceExtractor,
}

#[derive(Debug, Default)]
struct ScanReport {
    scanned: usize,
    matched: usize,
    marked: Vec<String>,
}

impl RepairEngine {
    pub fn new(profile: RepairProfile) -> Result<Self, ProfileError> {
        profile.validate()?;
        let extractor = ReferenceExtractor::new(&profile)?;
        Ok(Self { profile, extractor })
    }

    pub fn profile(&self) -> &RepairProfile {
        &self.profile
    }

    /// Scans the entity collection, decides which keys to delete, then removes
    /// them in a second pass. Only a missing or malformed collection fails.
    pub fn apply_policy(
        &self,
        document: &mut Value,
        policy: Policy,
        observer: &mut dyn RepairObserver,
    ) -> Result<RunResult, RepairError> {
        let scan = match locate_entity_collection(document) {
            Ok(entities) => {
                observer.on_event(&RepairEvent::RunStarted {
                    policy,
                    entity_count: entities.len(),
                });
                self.scan(entities, policy, observer)
            }
            Err(error) => {
                observer.on_event(&RepairEvent::SegmentMissing {
                    policy,
                    segment: error.segment(),
                });
                return Err(error.into());
            }
        };

        let mut result = RunResult {
            changed: false,
            scanned: scan.scanned,
            matched: scan.matched,
            deleted: 0,
            skipped: 0,
        };

        if !scan.marked.is_empty() {
            let entities = locate_entity_collection_mut(document)?;
            for key in &scan.marked {
                if entities.shift_remove(key.as_str()).is_some() {
                    result.deleted += 1;
                } else {
                    result.skipped += 1;
                    observer.on_event(&RepairEvent::DeletionSkipped { entity_key: key });
                }
            }
        }
        result.changed = result.deleted > 0;

        observer.on_event(&RepairEvent::RunFinished { policy, result });
        Ok(result)
    }

    fn scan(
        &self,
        entities: &EntityCollection,
        policy: Policy,
        observer: &mut dyn RepairObserver,
    ) -> ScanReport {
        let total = entities.len();
        let mut report = ScanReport::default();

        for (key, record) in entities {
            report.scanned += 1;
            observer.on_event(&RepairEvent::ScanProgress {
                scanned: report.scanned,
                total,
            });
            if parse_entity_key(key).is_none() {
                observer.on_event(&RepairEvent::IrregularKey { entity_key: key });
            }

            let class = classify(record, &self.profile);
            if !class.is_match() {
                continue;
            }
            report.matched += 1;

            let delete = match policy {
                Policy::RemoveAll => true,
                Policy::FixDangling => self.has_dangling_target(entities, key, class, observer),
            };
            if delete {
                report.marked.push(key.clone());
            }
        }
        report
    }

    fn has_dangling_target(
        &self,
        entities: &EntityCollection,
        key: &str,
        class: Classification<'_>,
        observer: &mut dyn RepairObserver,
    ) -> bool {
        let Some(fragment) = class.fragment() else {
            return false;
        };
        // A start-only fragment is left alone.
        let Some(target_id) = self.extractor.extract(fragment).target else {
            return false;
        };
        if is_reference_valid(entities, target_id) {
            return false;
        }
        observer.on_event(&RepairEvent::DanglingReference {
            entity_key: key,
            target_id,
        });
        true
    }
}
