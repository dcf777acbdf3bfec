use burn::module::Module;
use resunet_burn::ResUnetConfig;
use resunet_demos::{create_device, SelectedBackend, BACKEND_NAME};

fn main() -> anyhow::Result<()> {
    let device = create_device();
    let model = ResUnetConfig::new(3).init::<SelectedBackend>(&device)?;

    println!("Backend: {}", BACKEND_NAME);
    println!("{}", model);
    println!("Parameters: {}", model.num_params());

    Ok(())
}
