use burn::{
    nn::conv::{ConvTranspose2d, ConvTranspose2dConfig},
    prelude::*,
};

/// Configuration for the `Upsample` module.
#[derive(Config, Debug)]
pub struct UpsampleConfig {
    input_dim: usize,
    output_dim: usize,
    kernel: usize,
    stride: usize,
}

impl UpsampleConfig {
    /// Initializes an `Upsample` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> Upsample<B> {
        let upsample = ConvTranspose2dConfig::new(
            [self.input_dim, self.output_dim],
            [self.kernel, self.kernel],
        )
        .with_stride([self.stride, self.stride])
        .init(device);

        Upsample { upsample }
    }
}

/// Learned upsampling by a single transposed convolution.
#[derive(Module, Debug)]
pub struct Upsample<B: Backend> {
    upsample: ConvTranspose2d<B>,
}

impl<B: Backend> Upsample<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.upsample.forward(x)
    }
}
