// Application layer: wires configuration, adapters and the engine together.

pub mod runner;

pub use runner::{build_source, preview, run_with_config};
