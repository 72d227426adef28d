use std::env;
use std::io;
use std::process::ExitCode;

use upjet_cli::cli_args::{build_app, default_context};
use upjet_core::driver::Driver;

fn main() -> ExitCode {
    env_logger::init();

    let app = build_app();
    let mut context = default_context();

    Driver::new(&app)
        .run(
            env::args_os().skip(1),
            &mut context,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        )
        .into()
}
