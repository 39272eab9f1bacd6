//! Id-to-snapshot map shared by the local and the thread-safe store

use std::collections::HashMap;
use std::sync::Arc;

use super::hash::AssumptionsHash;
use super::model::{Snapshot, SnapshotId, DEFAULT_SNAPSHOT_NAME, FIRST_GENERATION};
use crate::assumptions::Assumptions;
use crate::clock::Clock;
use crate::error::Result;

pub(crate) struct SnapshotTable {
    entries: HashMap<SnapshotId, Arc<Snapshot>>,
    clock: Arc<dyn Clock>,
}

impl SnapshotTable {
    pub(crate) fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    fn compute(
        &self,
        id: SnapshotId,
        generation: u64,
        name: Option<&str>,
        assumptions: Assumptions,
    ) -> Result<Arc<Snapshot>> {
        let name = name.unwrap_or(DEFAULT_SNAPSHOT_NAME).to_string();
        let now = self.clock.now();
        let as_of_year = self.clock.current_year();
        let mut snapshot = Snapshot::compute(id, name, assumptions, now, as_of_year)?;
        snapshot.generation = generation;
        Ok(Arc::new(snapshot))
    }

    pub(crate) fn create(
        &mut self,
        assumptions: Assumptions,
        name: Option<&str>,
    ) -> Result<Arc<Snapshot>> {
        let id = SnapshotId::generate();
        let snapshot = self.compute(id.clone(), FIRST_GENERATION, name, assumptions)?;

        log::info!(
            "Created snapshot {} '{}' (final assets {})",
            id,
            snapshot.name,
            snapshot.final_assets
        );
        self.entries.insert(id, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Replace the snapshot stored under `id` entirely, inserting it if
    /// absent. Like `create`, a missing name means `DEFAULT_SNAPSHOT_NAME`.
    pub(crate) fn update(
        &mut self,
        id: &SnapshotId,
        assumptions: Assumptions,
        name: Option<&str>,
    ) -> Result<Arc<Snapshot>> {
        let generation = match self.entries.get(id) {
            Some(prev) => prev.generation.saturating_add(1),
            None => {
                log::debug!("Snapshot {} not found, inserting on update", id);
                FIRST_GENERATION
            }
        };

        let snapshot = self.compute(id.clone(), generation, name, assumptions)?;
        log::info!(
            "Updated snapshot {} '{}' to generation {} (final assets {})",
            id,
            snapshot.name,
            generation,
            snapshot.final_assets
        );
        self.entries.insert(id.clone(), Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub(crate) fn get(&self, id: &SnapshotId) -> Option<Arc<Snapshot>> {
        self.entries.get(id).cloned()
    }

    pub(crate) fn needs_recalculation(&self, id: &SnapshotId, assumptions: &Assumptions) -> bool {
        match self.entries.get(id) {
            Some(snapshot) => snapshot.assumptions_hash != AssumptionsHash::of(assumptions),
            None => true,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn ids(&self) -> Vec<SnapshotId> {
        let mut ids: Vec<SnapshotId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }
}
