//! Backend selection for the demo binaries.
//!
//! The backend is fixed at compile time by cargo features; without an
//! explicit choice the demos run on the CPU through ndarray.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "cuda")] {
        /// Backend compiled into the demos.
        pub type SelectedBackend = burn::backend::cuda::Cuda;
        /// Device type matching [`SelectedBackend`].
        pub type SelectedDevice = burn::backend::cuda::CudaDevice;
        /// Display name of the compiled-in backend.
        pub const BACKEND_NAME: &str = "CUDA (NVIDIA GPU)";
    } else if #[cfg(feature = "wgpu")] {
        /// Backend compiled into the demos.
        pub type SelectedBackend = burn::backend::wgpu::Wgpu;
        /// Device type matching [`SelectedBackend`].
        pub type SelectedDevice = burn::backend::wgpu::WgpuDevice;
        /// Display name of the compiled-in backend.
        pub const BACKEND_NAME: &str = "WGPU (GPU)";
    } else {
        /// Backend compiled into the demos.
        pub type SelectedBackend = burn::backend::ndarray::NdArray;
        /// Device type matching [`SelectedBackend`].
        pub type SelectedDevice = burn::backend::ndarray::NdArrayDevice;
        /// Display name of the compiled-in backend.
        pub const BACKEND_NAME: &str = "NdArray (CPU)";
    }
}

/// Creates the device the demos run on.
pub fn create_device() -> SelectedDevice {
    SelectedDevice::default()
}
