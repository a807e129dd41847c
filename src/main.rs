use std::process::ExitCode;

fn main() -> ExitCode {
    match embed_driver::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
