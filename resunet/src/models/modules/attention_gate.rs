//! # Attention Gate
//!
//! This module defines the additive attention gate used on the skip
//! connections of `ResUnet`. The gate scores every spatial position of a
//! high-resolution skip feature map against a coarse gating signal taken
//! from one stage deeper in the network, then reweights the skip features
//! with the resulting mask before they are concatenated into the decoder.

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
    tensor::{
        activation::sigmoid,
        module::interpolate,
        ops::{InterpolateMode, InterpolateOptions},
    },
};

/// Configuration for the `AttentionGate` module.
#[derive(Config, Debug)]
pub struct AttentionGateConfig {
    /// Number of channels of the gating signal.
    gate_channels: usize,
    /// Number of channels of the skip features.
    skip_channels: usize,
    /// Number of channels of the intermediate projection.
    inter_channels: usize,
}

impl AttentionGateConfig {
    /// Initializes an `AttentionGate` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> AttentionGate<B> {
        let conv_g = Conv2dConfig::new([self.gate_channels, self.inter_channels], [1, 1])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);
        let bn_g = BatchNormConfig::new(self.inter_channels).init(device);

        // The skip features live at twice the gate resolution; the stride
        // brings them down to the gate grid for the additive scoring.
        let conv_x = Conv2dConfig::new([self.skip_channels, self.inter_channels], [1, 1])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);
        let bn_x = BatchNormConfig::new(self.inter_channels).init(device);

        let conv_psi = Conv2dConfig::new([self.inter_channels, 1], [1, 1])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);
        let bn_psi = BatchNormConfig::new(1).init(device);

        AttentionGate {
            conv_g,
            bn_g,
            conv_x,
            bn_x,
            relu: Relu::new(),
            conv_psi,
            bn_psi,
        }
    }
}

/// An additive attention gate over a skip connection.
///
/// Both inputs are projected to a shared intermediate width with 1x1
/// convolutions, summed, and collapsed to a single-channel mask through
/// ReLU, a 1x1 convolution, batch normalization and a sigmoid. The mask is
/// computed on the gate grid and upsampled bilinearly by a factor of two
/// before multiplying the skip features, which it reweights per position
/// without changing their shape.
#[derive(Module, Debug)]
pub struct AttentionGate<B: Backend> {
    conv_g: Conv2d<B>,
    bn_g: BatchNorm<B, 2>,
    conv_x: Conv2d<B>,
    bn_x: BatchNorm<B, 2>,
    relu: Relu,
    conv_psi: Conv2d<B>,
    bn_psi: BatchNorm<B, 2>,
}

impl<B: Backend> AttentionGate<B> {
    /// Applies the gate to a pair of feature maps.
    ///
    /// # Arguments
    ///
    /// * `g` - Gating signal of shape `[batch, gate_channels, h, w]`.
    /// * `x` - Skip features of shape `[batch, skip_channels, 2h, 2w]`.
    ///
    /// # Returns
    ///
    /// The reweighted skip features, with the same shape as `x`.
    pub fn forward(&self, g: Tensor<B, 4>, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let g1 = self.bn_g.forward(self.conv_g.forward(g));
        let x1 = self.bn_x.forward(self.conv_x.forward(x.clone()));

        let psi = self.relu.forward(g1 + x1);
        let psi = sigmoid(self.bn_psi.forward(self.conv_psi.forward(psi)));

        let [_, _, height, width] = psi.dims();
        let psi = interpolate(
            psi,
            [height * 2, width * 2],
            InterpolateOptions::new(InterpolateMode::Bilinear),
        );

        x * psi
    }
}
