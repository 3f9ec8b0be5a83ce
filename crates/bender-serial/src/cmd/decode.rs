use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bender_frame::{FrameError, FramerConfig, LineReader};
use bender_telemetry::{decode_line, diagnostics, DecodeError, Report};
use tracing::debug;

use crate::cmd::{max_line_len, DecodeArgs};
use crate::exit::{frame_error, io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_rejected, print_report, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = open_input(&args.file)?;
    let config = FramerConfig {
        max_line_len: max_line_len(args.max_line_len),
    };
    let reader = LineReader::with_config(input, config);

    let mut decoded = 0u64;
    let mut rejected = 0u64;

    for next in reader {
        let result = match next {
            Ok(line) => decode_line(line),
            Err(err @ FrameError::LineTooLong { .. }) => Err(DecodeError::Framing(err)),
            Err(err) => return Err(frame_error("read failed", err)),
        };

        match result {
            Ok(report) => {
                diagnostics::report(&report);
                if matches!(report.report, Report::Unrecognized(_)) {
                    rejected += 1;
                    if args.show_rejected {
                        print_report(&report, format);
                    }
                    continue;
                }
                decoded += 1;
                print_report(&report, format);
            }
            Err(err) => {
                rejected += 1;
                diagnostics::rejected(&err);
                if args.show_rejected {
                    print_rejected(&err, format);
                }
            }
        }
    }

    debug!(decoded, rejected, "decode finished");

    if args.strict && rejected > 0 {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

fn open_input(path: &Path) -> CliResult<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    Ok(Box::new(file))
}
