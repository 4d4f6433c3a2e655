use std::process::ExitCode;

fn main() -> ExitCode {
    agenda_cli::run()
}
