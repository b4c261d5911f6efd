//! lotledger-report - Realized gains, holdings and net deposits.

fn main() -> std::process::ExitCode {
    lotledger::cmd::report_cmd::main()
}
