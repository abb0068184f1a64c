use std::process::ExitCode;

fn main() -> ExitCode {
    orbit_term::exit_code(orbit_term::start())
}
