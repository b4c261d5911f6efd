//! lotledger-check - Load and replay a data directory, reporting the first error.

fn main() -> std::process::ExitCode {
    lotledger::cmd::check::main()
}
