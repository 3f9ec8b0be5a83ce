use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("bender-serial {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: bender-serial");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("BENDER_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "max_line_len_default: {}",
        bender_frame::DEFAULT_MAX_LINE_LEN
    );
    println!(
        "keywords: {}, {}, {}",
        bender_frame::STATUS,
        bender_frame::ANALOG,
        bender_frame::FAULT
    );

    Ok(SUCCESS)
}
