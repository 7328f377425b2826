//! Grayscale command-line interface.
//!
//! Manages the configuration file and runs simulated sessions of the effect
//! manager against an in-process host.

fn main() {
    if let Err(err) = grayscale_lib::cli::run() {
        eprintln!("grayscale: {err}");
        std::process::exit(1);
    }
}
