//! Bender ground-fault telemetry decoding and dispatch.
//!
//! This is the layer most callers want. Hand a [`Monitor`] a byte source and
//! a registry of sinks, call [`Monitor::poll`] from your scheduler, and status
//! reports land in the sinks registered for each unit.
//!
//! The pure pipeline ([`Decoder`], [`classify`]) has no I/O and can be driven
//! from bytes in memory.

pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod monitor;
pub mod publisher;
pub mod report;
pub mod sink;

pub use decoder::{decode_line, Decoded, Decoder};
pub use error::{DecodeError, ReportError};
pub use monitor::{Monitor, MonitorConfig, MonitorStats};
pub use publisher::Publisher;
pub use report::{
    classify, counts_to_volts, AnalogReport, FaultReport, Report, StatusReport,
    UnrecognizedReport, ANALOG_FULL_SCALE_COUNTS, ANALOG_FULL_SCALE_VOLTS,
};
pub use sink::{MemorySink, Sink, SinkRegistry, SinkRegistryBuilder, UnitSinks};
