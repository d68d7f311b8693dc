//! `foundrydata` binary entrypoint. All argument parsing and
//! presentation logic lives in `foundrydata_cli`; this only turns its
//! result into a process exit code.

fn main() -> std::process::ExitCode {
    match foundrydata_cli::run() {
        Ok(code) => std::process::ExitCode::from(code.as_i32() as u8),
        Err(err) => {
            eprintln!("[foundrydata] {err:#}");
            std::process::ExitCode::from(foundrydata_utils::ExitCode::INTERNAL.as_i32() as u8)
        }
    }
}
