//! # Voxel Terrain Demo
//!
//! Runs the headless streaming fly-through.
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_terrain::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("voxel-terrain: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
