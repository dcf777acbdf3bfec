use thiserror::Error;

/// The error type for `ResUnet-Burn` operations.
///
/// Model construction is the only fallible step exposed by this crate.
/// Shape mismatches during the forward pass surface as panics raised by
/// the tensor backend, matching the behavior of the layers themselves.
#[derive(Error, Debug)]
pub enum ResUnetError {
    /// Error for when an invalid model configuration is provided.
    /// This can happen if configuration parameters are logically inconsistent.
    #[error("Invalid model configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for `ResUnet-Burn` operations.
pub type ResUnetResult<T> = Result<T, ResUnetError>;
