//! # Residual Convolution Block
//!
//! This module defines the residual building block shared by the encoder and
//! decoder of `ResUnet`. The block follows the pre-activation layout, where
//! batch normalization and ReLU precede each convolution, and carries a
//! projected skip connection so it can change channel count and resolution.

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
};

/// Configuration for the `ResidualConv` block.
#[derive(Config, Debug)]
pub struct ResidualConvConfig {
    /// Number of input channels.
    input_dim: usize,
    /// Number of output channels.
    output_dim: usize,
    /// Stride of the first convolution and of the skip projection.
    stride: usize,
    /// Padding of the first convolution.
    padding: usize,
}

impl ResidualConvConfig {
    /// Initializes a `ResidualConv` block.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> ResidualConv<B> {
        let bn1 = BatchNormConfig::new(self.input_dim).init(device);
        let conv1 = Conv2dConfig::new([self.input_dim, self.output_dim], [3, 3])
            .with_stride([self.stride, self.stride])
            .with_padding(PaddingConfig2d::Explicit(self.padding, self.padding))
            .init(device);
        let bn2 = BatchNormConfig::new(self.output_dim).init(device);
        let conv2 = Conv2dConfig::new([self.output_dim, self.output_dim], [3, 3])
            .with_stride([1, 1])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);

        let conv_skip = Conv2dConfig::new([self.input_dim, self.output_dim], [3, 3])
            .with_stride([self.stride, self.stride])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let bn_skip = BatchNormConfig::new(self.output_dim).init(device);

        ResidualConv {
            bn1,
            relu: Relu::new(),
            conv1,
            bn2,
            conv2,
            conv_skip,
            bn_skip,
        }
    }
}

/// A pre-activated residual block with a projected skip connection.
///
/// The main path normalizes and activates the input before each of its two
/// 3x3 convolutions. The skip path projects the input with a strided 3x3
/// convolution followed by batch normalization, so both paths agree on
/// channel count and resolution at the sum.
#[derive(Module, Debug)]
pub struct ResidualConv<B: Backend> {
    bn1: BatchNorm<B, 2>,
    relu: Relu,
    conv1: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    conv2: Conv2d<B>,
    conv_skip: Conv2d<B>,
    bn_skip: BatchNorm<B, 2>,
}

impl<B: Backend> ResidualConv<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let out = self.bn1.forward(x.clone());
        let out = self.relu.forward(out);
        let out = self.conv1.forward(out);
        let out = self.bn2.forward(out);
        let out = self.relu.forward(out);
        let out = self.conv2.forward(out);

        let skip = self.bn_skip.forward(self.conv_skip.forward(x));

        out + skip
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::Distribution;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    #[test]
    fn test_residual_conv_stride_1_preserves_resolution() {
        let device = Default::default();
        let block: ResidualConv<TestBackend> = ResidualConvConfig::new(16, 32, 1, 1).init(&device);

        let input =
            Tensor::<TestBackend, 4>::random([2, 16, 24, 24], Distribution::Normal(0.0, 1.0), &device);
        let output = block.forward(input);

        assert_eq!(output.dims(), [2, 32, 24, 24]);
    }

    #[test]
    fn test_residual_conv_stride_2_halves_resolution() {
        let device = Default::default();
        let block: ResidualConv<TestBackend> = ResidualConvConfig::new(16, 32, 2, 1).init(&device);

        let input =
            Tensor::<TestBackend, 4>::random([2, 16, 24, 24], Distribution::Normal(0.0, 1.0), &device);
        let output = block.forward(input);

        assert_eq!(output.dims(), [2, 32, 12, 12]); // 24/2 = 12
    }

    #[test]
    fn test_residual_conv_stride_2_rounds_odd_resolution_up() {
        let device = Default::default();
        let block: ResidualConv<TestBackend> = ResidualConvConfig::new(8, 8, 2, 1).init(&device);

        let input =
            Tensor::<TestBackend, 4>::random([1, 8, 25, 25], Distribution::Normal(0.0, 1.0), &device);
        let output = block.forward(input);

        // floor((25 - 1) / 2) + 1 = 13, identically on both paths.
        assert_eq!(output.dims(), [1, 8, 13, 13]);
    }
}
