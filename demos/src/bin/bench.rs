use burn::prelude::*;
use clap::Parser;
use resunet_burn::ResUnetConfig;
use resunet_demos::{create_device, SelectedBackend, BACKEND_NAME};

/// Benchmark the ResUnet forward pass on synthetic input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Batch size of the benchmark input.
    #[arg(long, default_value_t = 1)]
    batch_size: usize,

    /// Number of input channels.
    #[arg(long, default_value_t = 3)]
    channel: usize,

    /// Height and width of the square benchmark input, divisible by 8.
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Number of timed forward passes.
    #[arg(long, default_value_t = 10)]
    iterations: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    anyhow::ensure!(
        args.size % 8 == 0,
        "size must be divisible by 8, got {}",
        args.size
    );

    let device = create_device();
    let model = ResUnetConfig::new(args.channel).init::<SelectedBackend>(&device)?;

    println!("Backend: {}", BACKEND_NAME);

    let start = std::time::Instant::now();
    let mut result = Vec::new();
    for _ in 0..args.iterations {
        let start_ = std::time::Instant::now();
        let x = Tensor::<SelectedBackend, 4>::zeros(
            [args.batch_size, args.channel, args.size, args.size],
            &device,
        );
        let _y = model.forward(x);
        result.push(start_.elapsed());
    }
    println!(
        "Total time: {:?}, Speed: {:?}",
        start.elapsed(),
        args.iterations as f32 / start.elapsed().as_secs_f32()
    );
    println!("{:?}", result);

    Ok(())
}
