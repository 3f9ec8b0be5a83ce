//! Pollable byte sources for the Bender serial telemetry feed.
//!
//! The decoder never blocks on I/O. It asks a [`ByteSource`] whether data is
//! available and then drains it one byte at a time. This crate provides:
//! - [`MemorySource`] for simulation and tests
//! - [`FdSource`] for anything with a raw file descriptor (Unix)
//! - [`SerialDevice`] to open a UART character device without blocking
//! - [`connect_bridge`] for serial-to-socket bridges on a Unix domain socket

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(unix)]
pub mod device;
#[cfg(unix)]
pub mod fd;

pub use error::{Result, TransportError};
pub use memory::MemorySource;
pub use traits::ByteSource;

#[cfg(unix)]
pub use device::{connect_bridge, SerialDevice};
#[cfg(unix)]
pub use fd::FdSource;
