use bender_frame::{checksum8, verify, FrameError, LineWriter};

use crate::cmd::ChecksumArgs;
use crate::exit::{frame_error, CliResult, DATA_INVALID, SUCCESS};

/// Frame a body (`BGF 0 1 ... 6859 ` -> `...*BD`) or check a framed line.
pub fn run(args: ChecksumArgs) -> CliResult<i32> {
    if args.check {
        return check(&args.input);
    }

    let stdout = std::io::stdout();
    let mut writer = LineWriter::new(stdout.lock());
    writer
        .send(args.input.as_bytes())
        .map_err(|err| frame_error("cannot frame body", err))?;
    Ok(SUCCESS)
}

fn check(line: &str) -> CliResult<i32> {
    let line = line.trim_end_matches(['\r', '\n']);
    match verify(line.as_bytes()) {
        Ok((body, trailer)) => {
            println!(
                "ok checksum={} body_len={}",
                String::from_utf8_lossy(&trailer),
                body.len()
            );
            Ok(SUCCESS)
        }
        Err(err @ FrameError::ChecksumMismatch { .. }) => {
            println!("invalid: {err}");
            Ok(DATA_INVALID)
        }
        Err(err) => {
            let body = line.split('*').next().unwrap_or_default();
            Err(frame_error(
                &format!("invalid line (body checksum {:02X})", checksum8(body.as_bytes())),
                err,
            ))
        }
    }
}
