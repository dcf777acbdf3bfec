//! # Model Architectures
//!
//! This module aggregates the components of the ResUnet architecture.
//! It is organized into sub-modules:
//!
//! - `resunet`: Defines the main `ResUnet` model, wiring the encoder,
//!   bridge and decoder together.
//! - `modules`: Provides the building blocks of the network, such as the
//!   residual convolution block, the attention gate and the learned
//!   upsampling.

pub mod modules;
pub mod resunet;

pub use resunet::{ResUnet, ResUnetConfig, ResUnetRecord};
