//! Unit configuration for the CLI and the gauge sinks it publishes into.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bender_telemetry::{Sink, SinkRegistry};
use serde::Deserialize;

use crate::exit::{io_error, CliError, CliResult, USAGE};

/// Units registered when neither `--unit` nor `--units-file` is given.
const DEFAULT_UNITS: std::ops::RangeInclusive<u32> = 0..=3;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsFile {
    pub units: Vec<UnitEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitEntry {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

impl UnitEntry {
    fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("bender-{}", self.id))
    }
}

pub fn load_units_file(path: &Path) -> CliResult<UnitsFile> {
    let text = fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            USAGE,
            format!("{} is not a valid units file: {err}", path.display()),
        )
    })
}

/// Holds the latest value published to it and how many updates it has seen.
#[derive(Debug, Default)]
pub struct GaugeSink {
    bits: AtomicU64,
    updates: AtomicU64,
}

impl GaugeSink {
    pub fn value(&self) -> Option<f64> {
        if self.updates() == 0 {
            return None;
        }
        Some(f64::from_bits(self.bits.load(Ordering::Acquire)))
    }

    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Acquire)
    }
}

impl Sink for GaugeSink {
    fn publish(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
        self.updates.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug)]
pub struct UnitGauges {
    pub id: u32,
    pub name: String,
    pub status: Arc<GaugeSink>,
    pub resistance: Arc<GaugeSink>,
}

/// The gauges behind a registry, in ascending unit order.
#[derive(Debug, Default)]
pub struct Gauges {
    units: Vec<UnitGauges>,
}

impl Gauges {
    pub fn iter(&self) -> impl Iterator<Item = &UnitGauges> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }
}

/// Build the sink registry from `--unit` ids and an optional units file.
///
/// A unit named in both keeps the file's name. Duplicate ids collapse.
pub fn build_registry(ids: &[u32], file: Option<&Path>) -> CliResult<(SinkRegistry, Gauges)> {
    let mut entries: Vec<UnitEntry> = match file {
        Some(path) => load_units_file(path)?.units,
        None => Vec::new(),
    };
    for &id in ids {
        if !entries.iter().any(|e| e.id == id) {
            entries.push(UnitEntry { id, name: None });
        }
    }
    if entries.is_empty() && file.is_none() {
        entries = DEFAULT_UNITS
            .map(|id| UnitEntry { id, name: None })
            .collect();
    }
    entries.sort_by_key(|e| e.id);
    entries.dedup_by_key(|e| e.id);

    let mut builder = SinkRegistry::builder();
    let mut gauges = Gauges::default();
    for entry in entries {
        let status = Arc::new(GaugeSink::default());
        let resistance = Arc::new(GaugeSink::default());
        builder = builder.unit(entry.id, status.clone(), resistance.clone());
        gauges.units.push(UnitGauges {
            id: entry.id,
            name: entry.display_name(),
            status,
            resistance,
        });
    }

    Ok((builder.build(), gauges))
}
