use std::fs::File;
use std::os::fd::AsFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use bender_frame::FramerConfig;
use bender_telemetry::{Monitor, MonitorConfig};
use bender_transport::{connect_bridge, ByteSource, FdSource, SerialDevice};
use tracing::info;

use crate::cmd::{max_line_len, parse_duration, MonitorArgs};
use crate::exit::{io_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_report, print_summary, OutputFormat};
use crate::units::build_registry;

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.poll_interval)?;
    let (registry, gauges) =
        build_registry(&args.units.units, args.units.units_file.as_deref())?;
    info!(units = gauges.len(), "sink registry ready");

    let source = open_source(&args)?;
    let config = MonitorConfig {
        framer: FramerConfig {
            max_line_len: max_line_len(args.max_line_len),
        },
    };
    let mut monitor = Monitor::with_config(source, Arc::new(registry), config);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let limit = args.count.unwrap_or(usize::MAX);
    let mut seen = 0usize;

    while running.load(Ordering::SeqCst) && seen < limit {
        monitor
            .poll_with(|decoded| {
                if seen < limit && !args.quiet {
                    print_report(decoded, format);
                }
                seen = seen.saturating_add(1);
            })
            .map_err(|err| transport_error("poll failed", err))?;

        if monitor.is_closed() {
            info!("byte source closed");
            break;
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    print_summary(&monitor.stats(), &gauges, format);
    Ok(SUCCESS)
}

fn open_source(args: &MonitorArgs) -> CliResult<Box<dyn ByteSource>> {
    if let Some(socket) = &args.bridge {
        let source =
            connect_bridge(socket).map_err(|err| transport_error("connect failed", err))?;
        return Ok(Box::new(source));
    }

    match args.device.as_deref() {
        Some(path) if path.as_os_str() == "-" => Ok(Box::new(FdSource::new(stdin_fd()?))),
        Some(path) => {
            let source =
                SerialDevice::open(path).map_err(|err| transport_error("open failed", err))?;
            Ok(Box::new(source))
        }
        None => Err(CliError::new(USAGE, "a device path or --bridge is required")),
    }
}

/// Stdin as a plain descriptor. `io::Stdin` buffers internally, which would
/// hide bytes from the readiness check once they left the descriptor.
fn stdin_fd() -> CliResult<File> {
    let fd = std::io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .map_err(|err| io_error("failed duplicating stdin", err))?;
    Ok(File::from(fd))
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
