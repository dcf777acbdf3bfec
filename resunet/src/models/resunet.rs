//! # ResUnet: Residual Attention U-Net
//!
//! This module implements the complete ResUnet architecture, a U-shaped
//! encoder-decoder network built from pre-activated residual blocks and
//! attention-gated skip connections. The encoder halves the spatial
//! resolution three times while widening the channels. The decoder mirrors
//! it with transposed convolutions and re-injects the encoder features after
//! gating, and a final 1x1 convolution with a sigmoid produces a
//! single-channel segmentation map at the input resolution.

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
    tensor::activation::sigmoid,
};

use super::modules::{
    AttentionGate, AttentionGateConfig, ResidualConv, ResidualConvConfig, Upsample, UpsampleConfig,
};
use crate::error::{ResUnetError, ResUnetResult};

/// The stem of the encoder: two padded 3x3 convolutions with batch
/// normalization and ReLU between them.
#[derive(Module, Debug)]
struct InputLayer<B: Backend> {
    conv1: Conv2d<B>,
    bn: BatchNorm<B, 2>,
    relu: Relu,
    conv2: Conv2d<B>,
}

impl<B: Backend> InputLayer<B> {
    fn new(in_channels: usize, out_channels: usize, device: &Device<B>) -> Self {
        let conv1 = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let bn = BatchNormConfig::new(out_channels).init(device);
        let conv2 = Conv2dConfig::new([out_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);

        Self {
            conv1,
            bn,
            relu: Relu::new(),
            conv2,
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv1.forward(x);
        let x = self.bn.forward(x);
        let x = self.relu.forward(x);
        self.conv2.forward(x)
    }
}

/// Configuration for the `ResUnet` model.
#[derive(Config, Debug)]
pub struct ResUnetConfig {
    /// Number of channels of the input images.
    channel: usize,
    /// Channel widths of the four resolution stages, shallow to deep.
    #[config(default = "[32, 64, 128, 256]")]
    filters: [usize; 4],
}

impl ResUnetConfig {
    /// Validates the structural soundness of the configuration.
    pub fn validate(&self) -> ResUnetResult<()> {
        if self.channel == 0 {
            return Err(ResUnetError::InvalidConfiguration {
                reason: "channel must be at least 1".to_string(),
            });
        }
        if self.filters.iter().any(|&f| f == 0) {
            return Err(ResUnetError::InvalidConfiguration {
                reason: format!("filters must all be at least 1, got {:?}", self.filters),
            });
        }
        Ok(())
    }

    /// Initializes a `ResUnet` model on the given device.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> ResUnetResult<ResUnet<B>> {
        self.validate()?;

        let [f0, f1, f2, f3] = self.filters;

        let input_layer = InputLayer::new(self.channel, f0, device);
        let input_skip = Conv2dConfig::new([self.channel, f0], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);

        let residual_conv_1 = ResidualConvConfig::new(f0, f1, 2, 1).init(device);
        let residual_conv_2 = ResidualConvConfig::new(f1, f2, 2, 1).init(device);

        let bridge = ResidualConvConfig::new(f2, f3, 2, 1).init(device);

        let attention_bridge = AttentionGateConfig::new(f3, f2, f2).init(device);
        let upsample_1 = UpsampleConfig::new(f3, f3, 2, 2).init(device);
        let attention_1 = AttentionGateConfig::new(f2, f1, f1).init(device);
        let up_residual_conv1 = ResidualConvConfig::new(f3 + f2, f2, 1, 1).init(device);

        let upsample_2 = UpsampleConfig::new(f2, f2, 2, 2).init(device);
        let attention_2 = AttentionGateConfig::new(f1, f0, f0).init(device);
        let up_residual_conv2 = ResidualConvConfig::new(f2 + f1, f1, 1, 1).init(device);

        let upsample_3 = UpsampleConfig::new(f1, f1, 2, 2).init(device);
        let up_residual_conv3 = ResidualConvConfig::new(f1 + f0, f0, 1, 1).init(device);

        let output_layer = Conv2dConfig::new([f0, 1], [1, 1])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);

        Ok(ResUnet {
            input_layer,
            input_skip,
            residual_conv_1,
            residual_conv_2,
            bridge,
            attention_bridge,
            upsample_1,
            attention_1,
            up_residual_conv1,
            upsample_2,
            attention_2,
            up_residual_conv2,
            upsample_3,
            up_residual_conv3,
            output_layer,
        })
    }
}

/// The Residual Attention U-Net model.
///
/// Three strided residual stages halve the resolution while widening the
/// channels, and a residual bridge links the deepest features to the
/// decoder. Each decoder stage concatenates a learned upsampling with the
/// matching encoder features, reweighted beforehand by an attention gate.
/// The head is a 1x1 convolution and a sigmoid, producing one mask channel
/// at the input resolution.
#[derive(Module, Debug)]
pub struct ResUnet<B: Backend> {
    input_layer: InputLayer<B>,
    input_skip: Conv2d<B>,
    residual_conv_1: ResidualConv<B>,
    residual_conv_2: ResidualConv<B>,
    bridge: ResidualConv<B>,
    attention_bridge: AttentionGate<B>,
    upsample_1: Upsample<B>,
    attention_1: AttentionGate<B>,
    up_residual_conv1: ResidualConv<B>,
    upsample_2: Upsample<B>,
    attention_2: AttentionGate<B>,
    up_residual_conv2: ResidualConv<B>,
    upsample_3: Upsample<B>,
    up_residual_conv3: ResidualConv<B>,
    output_layer: Conv2d<B>,
}

impl<B: Backend> ResUnet<B> {
    /// Segments a batch of images.
    ///
    /// # Arguments
    ///
    /// * `x` - Input batch of shape `[batch, channel, height, width]`, with
    ///   `height` and `width` divisible by 8.
    ///
    /// # Returns
    ///
    /// A segmentation map of shape `[batch, 1, height, width]` with values
    /// in the open interval `(0, 1)`.
    ///
    /// Resolutions that do not survive three exact halvings leave the
    /// decoder and the skip connections at disagreeing sizes, and the
    /// backend panics at the first mismatched operation.
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        // Encode
        let x1 = self.input_layer.forward(x.clone()) + self.input_skip.forward(x);
        let x2 = self.residual_conv_1.forward(x1.clone());
        let x3 = self.residual_conv_2.forward(x2.clone());

        // Bridge
        let x4 = self.bridge.forward(x3.clone());
        let x4_atg = self.attention_bridge.forward(x4.clone(), x3);

        // Decode
        let x4 = self.upsample_1.forward(x4);
        let x5 = Tensor::cat(vec![x4_atg, x4], 1);
        let x6 = self.up_residual_conv1.forward(x5);

        let x6_atg = self.attention_1.forward(x6.clone(), x2);
        let x6 = self.upsample_2.forward(x6);
        let x7 = Tensor::cat(vec![x6_atg, x6], 1);
        let x8 = self.up_residual_conv2.forward(x7);

        let x8_atg = self.attention_2.forward(x8.clone(), x1);
        let x8 = self.upsample_3.forward(x8);
        let x9 = Tensor::cat(vec![x8_atg, x8], 1);
        let x10 = self.up_residual_conv3.forward(x9);

        sigmoid(self.output_layer.forward(x10))
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::Distribution;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    #[test]
    fn test_resunet_forward_rgb() {
        let device = Default::default();
        let model: ResUnet<TestBackend> = ResUnetConfig::new(3).init(&device).unwrap();

        let input = Tensor::<TestBackend, 4>::random(
            [1, 3, 256, 256],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let output = model.forward(input);

        assert_eq!(output.dims(), [1, 1, 256, 256]);

        let min = output.clone().min().into_scalar();
        let max = output.max().into_scalar();
        assert!(min > 0.0);
        assert!(max < 1.0);
    }

    #[test]
    fn test_resunet_forward_grayscale_batch() {
        let device = Default::default();
        let model: ResUnet<TestBackend> = ResUnetConfig::new(1)
            .with_filters([16, 32, 64, 128])
            .init(&device)
            .unwrap();

        let input = Tensor::<TestBackend, 4>::random(
            [2, 1, 128, 128],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, 1, 128, 128]);
    }

    #[test]
    fn test_resunet_default_config_forward() {
        let device = Default::default();
        let config = ResUnetConfig::new(3);
        assert_eq!(config.filters, [32, 64, 128, 256]);

        let model: ResUnet<TestBackend> = config.init(&device).unwrap();

        let input = Tensor::<TestBackend, 4>::random(
            [1, 3, 64, 64],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let output = model.forward(input);

        assert_eq!(output.dims(), [1, 1, 64, 64]);
    }

    #[test]
    fn test_resunet_output_values_stay_in_unit_interval() {
        let device = Default::default();
        let model: ResUnet<TestBackend> = ResUnetConfig::new(3)
            .with_filters([8, 16, 32, 64])
            .init(&device)
            .unwrap();

        let input = Tensor::<TestBackend, 4>::random(
            [1, 3, 64, 64],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let output = model.forward(input);

        let min = output.clone().min().into_scalar();
        let max = output.max().into_scalar();
        assert!(min > 0.0);
        assert!(max < 1.0);
    }

    #[test]
    fn test_resunet_forward_is_deterministic() {
        let device = Default::default();
        let model: ResUnet<TestBackend> = ResUnetConfig::new(3)
            .with_filters([8, 16, 32, 64])
            .init(&device)
            .unwrap();

        let input = Tensor::<TestBackend, 4>::random(
            [1, 3, 64, 64],
            Distribution::Normal(0.0, 1.0),
            &device,
        );

        let first = model.forward(input.clone());
        let second = model.forward(input);

        first.to_data().assert_eq(&second.to_data(), true);
    }

    #[test]
    fn test_resunet_num_params_tracks_config() {
        let device = Default::default();
        let config = ResUnetConfig::new(3).with_filters([8, 16, 32, 64]);

        let a: ResUnet<TestBackend> = config.init(&device).unwrap();
        let b: ResUnet<TestBackend> = config.init(&device).unwrap();
        assert_eq!(a.num_params(), b.num_params());

        let wider: ResUnet<TestBackend> = ResUnetConfig::new(3)
            .with_filters([16, 32, 64, 128])
            .init(&device)
            .unwrap();
        assert!(wider.num_params() > a.num_params());
    }

    #[test]
    #[should_panic]
    fn test_resunet_rejects_resolution_not_divisible_by_8() {
        let device = Default::default();
        let model: ResUnet<TestBackend> = ResUnetConfig::new(3)
            .with_filters([8, 16, 32, 64])
            .init(&device)
            .unwrap();

        // 100 halves to 50, 25, 13; the decoder comes back up at 26.
        let input = Tensor::<TestBackend, 4>::random(
            [1, 3, 100, 100],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let _ = model.forward(input);
    }
}
