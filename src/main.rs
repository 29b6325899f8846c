//! Chirp CLI entry point.

#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = chirp::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
