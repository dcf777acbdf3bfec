//! ResUnet Demos
//!
//! This crate provides small example binaries for the ResUnet model.
//!
//! ## Available Binaries
//!
//! - `print`: Prints the module tree and parameter count of a model
//! - `bench`: Times the forward pass on synthetic input
//!
//! ## Usage
//!
//! ```bash
//! # Inspect the model
//! cargo run --bin print
//!
//! # Benchmark the forward pass
//! cargo run --bin bench -- --size 512 --iterations 5
//! ```

pub mod backend;

pub use backend::{create_device, SelectedBackend, SelectedDevice, BACKEND_NAME};
