//! Decoder and monitor for Bender ground-fault serial telemetry.
//!
//! Bender monitoring units report on a UART roughly twice a second. This
//! crate turns that byte stream into typed reports and publishes status and
//! resistance values to caller-provided sinks.
//!
//! # Crate Structure
//!
//! - [`transport`]: Pollable byte sources (memory, file descriptors, devices)
//! - [`frame`]: Line framing, CheckSum8 validation, tokenizing
//! - [`telemetry`]: Report classification, sink registry, decoder and monitor
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bender_serial::telemetry::{MemorySink, Monitor, SinkRegistry};
//! use bender_serial::transport::MemorySource;
//!
//! let status = MemorySink::new();
//! let resistance = MemorySink::new();
//! let registry = SinkRegistry::builder()
//!     .unit(0, status.clone(), resistance.clone())
//!     .build();
//!
//! let source = MemorySource::from_bytes("BGF 0 1 100052 18496 184 6859 *BD\r\n");
//! let mut monitor = Monitor::new(source, Arc::new(registry));
//! monitor.poll().unwrap();
//!
//! assert_eq!(resistance.last(), Some(6859.0));
//! ```

/// Re-export transport types.
pub mod transport {
    pub use bender_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use bender_frame::*;
}

/// Re-export telemetry types.
pub mod telemetry {
    pub use bender_telemetry::*;
}
