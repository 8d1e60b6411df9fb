//! Thread-safe registry of monitored bridges.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use stalwart_types::{BridgeStatus, Measurement};
use tracing::warn;

use crate::bridge::Bridge;
use crate::config::SiteInputs;
use crate::error::{AnalysisError, Result};
use crate::processor::AnalysisProcessor;
use crate::specs::BridgeSpecs;

/// Shared handle to one registered bridge.
pub type BridgeHandle = Arc<Mutex<Bridge>>;

/// A set of bridges analyzed with one shared processor.
///
/// Bridges share no mutable state, so each is behind its own lock and
/// cycles for different structures never contend.
#[derive(Debug)]
pub struct Fleet {
    processor: Arc<AnalysisProcessor>,
    bridges: RwLock<BTreeMap<String, BridgeHandle>>,
}

impl Fleet {
    pub fn new(processor: Arc<AnalysisProcessor>) -> Self {
        Self {
            processor,
            bridges: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn processor(&self) -> &Arc<AnalysisProcessor> {
        &self.processor
    }

    /// Register a bridge, or return the existing one with the same id.
    pub fn register(&self, specs: BridgeSpecs) -> Result<BridgeHandle> {
        self.register_with(specs, SiteInputs::default())
    }

    /// Register a bridge together with its inspection data.
    ///
    /// If the id is already registered the existing bridge is returned
    /// unchanged.
    pub fn register_with(&self, specs: BridgeSpecs, site: SiteInputs) -> Result<BridgeHandle> {
        // Fast path: already registered
        if let Some(existing) = self.bridges.read().get(&specs.id) {
            return Ok(existing.clone());
        }

        let bridge = Bridge::new(specs, self.processor.clone())?.with_site_inputs(site);
        let mut bridges = self.bridges.write();
        Ok(bridges
            .entry(bridge.id().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(bridge)))
            .clone())
    }

    /// Remove a bridge. Returns `true` if it was registered.
    ///
    /// Outstanding handles stay usable but the fleet no longer feeds them.
    pub fn unregister(&self, id: &str) -> bool {
        self.bridges.write().remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<BridgeHandle> {
        self.bridges.read().get(id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.bridges.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.bridges.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.read().is_empty()
    }

    /// Route a mixed batch to its bridges and run one cycle per bridge.
    ///
    /// Returns the new status of every bridge that received readings.
    /// Readings for unregistered structures are skipped with a warning; a
    /// reading without a structure id fails the whole batch before any
    /// bridge is touched.
    pub fn ingest(&self, measurements: &[Measurement]) -> Result<Vec<BridgeStatus>> {
        if let Some(m) = measurements.iter().find(|m| m.structure_id.is_empty()) {
            return Err(AnalysisError::UnattributedMeasurement {
                sensor_id: m.sensor_id.clone(),
            });
        }

        let mut batches: BTreeMap<&str, Vec<Measurement>> = BTreeMap::new();
        for m in measurements {
            batches.entry(m.structure_id.as_str()).or_default().push(m.clone());
        }

        let mut statuses = Vec::with_capacity(batches.len());
        for (id, batch) in batches {
            let Some(bridge) = self.get(id) else {
                warn!(structure = id, count = batch.len(), "readings for unregistered structure skipped");
                continue;
            };
            let mut bridge = bridge.lock();
            statuses.push(bridge.update_status(&batch)?.clone());
        }
        Ok(statuses)
    }

    /// Latest status of every bridge that has completed a cycle.
    pub fn statuses(&self) -> Vec<BridgeStatus> {
        self.bridges
            .read()
            .values()
            .filter_map(|b| b.lock().status().cloned())
            .collect()
    }
}
