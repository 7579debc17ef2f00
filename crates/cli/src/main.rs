use std::process::ExitCode;

fn main() -> ExitCode {
    shopkeep_cli::run()
}
