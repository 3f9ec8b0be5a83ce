use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An externally owned destination for published numeric values.
///
/// Implementations decide what publishing means: update a displayed sensor,
/// append to storage, forward to a bus.
pub trait Sink: Send + Sync {
    fn publish(&self, value: f64);
}

/// The sinks registered for one unit.
#[derive(Clone)]
pub struct UnitSinks {
    /// Receives the status flag (1.0 good, 0.0 fault).
    pub status: Arc<dyn Sink>,
    /// Receives the ground-fault resistance in kOhm.
    pub resistance: Arc<dyn Sink>,
}

impl std::fmt::Debug for UnitSinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitSinks").finish_non_exhaustive()
    }
}

/// Unit-id keyed, read-only set of sinks.
///
/// Built once before polling starts and then shared with the publisher.
#[derive(Debug, Default, Clone)]
pub struct SinkRegistry {
    units: HashMap<u32, UnitSinks>,
}

impl SinkRegistry {
    /// A registry with no units. Every status report will go unpublished.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> SinkRegistryBuilder {
        SinkRegistryBuilder::default()
    }

    pub fn get(&self, unit_id: u32) -> Option<&UnitSinks> {
        self.units.get(&unit_id)
    }

    pub fn contains(&self, unit_id: u32) -> bool {
        self.units.contains_key(&unit_id)
    }

    /// Registered unit ids in ascending order.
    pub fn unit_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.units.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Collects unit registrations before freezing them into a [`SinkRegistry`].
#[derive(Default)]
pub struct SinkRegistryBuilder {
    units: HashMap<u32, UnitSinks>,
}

impl SinkRegistryBuilder {
    /// Register the sinks for a unit. A later registration for the same id
    /// replaces the earlier one.
    pub fn unit(
        mut self,
        unit_id: u32,
        status: Arc<dyn Sink>,
        resistance: Arc<dyn Sink>,
    ) -> Self {
        self.units
            .insert(unit_id, UnitSinks { status, resistance });
        self
    }

    pub fn build(self) -> SinkRegistry {
        SinkRegistry { units: self.units }
    }
}

/// A sink that records every published value. Useful for simulation and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    values: Mutex<Vec<f64>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of all values published so far.
    pub fn values(&self) -> Vec<f64> {
        self.values
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn last(&self) -> Option<f64> {
        self.values().last().copied()
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for MemorySink {
    fn publish(&self, value: f64) {
        match self.values.lock() {
            Ok(mut values) => values.push(value),
            Err(poisoned) => poisoned.into_inner().push(value),
        }
    }
}
