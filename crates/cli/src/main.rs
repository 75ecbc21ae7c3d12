use std::process::ExitCode;

fn main() -> ExitCode {
    trolley_cli::run()
}
