mod attention_gate;
mod residual_conv;
mod upsample;

pub use attention_gate::*;
pub use residual_conv::*;
pub use upsample::*;
