use std::sync::Arc;
use std::time::Instant;

use bender_frame::FramerConfig;
use bender_transport::ByteSource;
use tracing::debug;

use crate::decoder::{Decoded, Decoder};
use crate::diagnostics;
use crate::error::DecodeError;
use crate::publisher::Publisher;
use crate::report::Report;
use crate::sink::SinkRegistry;

/// Configuration for a [`Monitor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    pub framer: FramerConfig,
}

/// Running counters, for diagnostics and health output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub bytes: u64,
    pub lines: u64,
    pub status_reports: u64,
    pub analog_reports: u64,
    pub fault_reports: u64,
    pub unrecognized: u64,
    pub checksum_failures: u64,
    pub field_errors: u64,
    pub overflows: u64,
    /// Status reports for units with no registered sinks.
    pub unpublished: u64,
}

impl MonitorStats {
    /// Lines discarded for any reason.
    pub fn rejected(&self) -> u64 {
        self.checksum_failures + self.field_errors + self.unrecognized
    }
}

/// Drives the decoder from a byte source and dispatches the results.
///
/// Call [`Monitor::poll`] from a periodic scheduler. Each call drains every
/// byte currently available and returns without blocking. Each byte is fully
/// processed (framed, and if it completes a line, validated and dispatched)
/// before the next one is read.
pub struct Monitor<S> {
    source: S,
    decoder: Decoder,
    publisher: Publisher,
    stats: MonitorStats,
}

impl<S: ByteSource> Monitor<S> {
    /// Create a monitor with default configuration.
    pub fn new(source: S, registry: Arc<SinkRegistry>) -> Self {
        Self::with_config(source, registry, MonitorConfig::default())
    }

    /// Create a monitor with explicit configuration.
    pub fn with_config(source: S, registry: Arc<SinkRegistry>, config: MonitorConfig) -> Self {
        Self {
            source,
            decoder: Decoder::with_config(config.framer),
            publisher: Publisher::new(registry),
            stats: MonitorStats::default(),
        }
    }

    /// Drain available bytes. Returns the number of reports dispatched.
    pub fn poll(&mut self) -> bender_transport::Result<usize> {
        self.poll_with(|_| {})
    }

    /// Like [`Monitor::poll`], also handing each decoded report to `on_report`
    /// after it has been dispatched.
    pub fn poll_with<F>(&mut self, mut on_report: F) -> bender_transport::Result<usize>
    where
        F: FnMut(&Decoded),
    {
        let mut dispatched = 0usize;

        while self.source.available()? {
            let Some(byte) = self.source.read_byte()? else {
                break;
            };
            self.stats.bytes += 1;

            match self.decoder.feed(byte) {
                None => {}
                Some(Ok(decoded)) => {
                    self.dispatch(&decoded);
                    on_report(&decoded);
                    dispatched += 1;
                }
                Some(Err(err)) => self.reject(&err),
            }
        }

        Ok(dispatched)
    }

    fn dispatch(&mut self, decoded: &Decoded) {
        let started = Instant::now();
        self.stats.lines += 1;

        match &decoded.report {
            Report::Status(status) => {
                self.stats.status_reports += 1;
                if !self.publisher.registry().contains(status.unit_id) {
                    self.stats.unpublished += 1;
                }
                self.publisher.publish(status);
            }
            Report::Analog(_) => self.stats.analog_reports += 1,
            Report::Fault(_) => self.stats.fault_reports += 1,
            Report::Unrecognized(_) => self.stats.unrecognized += 1,
        }
        diagnostics::report(decoded);

        debug!(
            kind = decoded.report.kind(),
            elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "processed line"
        );
    }

    fn reject(&mut self, err: &DecodeError) {
        match err {
            DecodeError::Framing(_) => self.stats.overflows += 1,
            DecodeError::Checksum { .. } => {
                self.stats.lines += 1;
                self.stats.checksum_failures += 1;
            }
            DecodeError::Field { .. } => {
                self.stats.lines += 1;
                self.stats.field_errors += 1;
            }
        }
        diagnostics::rejected(err);
    }

    /// Counters since construction.
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// True once the source will never produce more bytes.
    pub fn is_closed(&self) -> bool {
        self.source.is_closed()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
