use std::io;
use std::process::ExitCode;

use waicons::{IconConfig, preflight, run};

fn main() -> ExitCode {
    let config = IconConfig::default();
    ExitCode::from(run(&config, preflight, &mut io::stdout(), &mut io::stderr()))
}
