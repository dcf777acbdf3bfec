mod error;
mod models;

pub use error::{ResUnetError, ResUnetResult};
pub use models::{ResUnet, ResUnetConfig, ResUnetRecord};
