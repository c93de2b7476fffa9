mod cci;
mod cli;
mod output;
mod spi;

use clap::Parser;
use lepton_vospi::{Camera, StdTransport};
use log::info;
use simple_eyre::Result;

use cli::Cli;

fn main() -> Result<()> {
    simple_eyre::install()?;
    env_logger::init();
    let cli = Cli::parse();

    let sensor = cli.sensor_type;
    info!(
        "{sensor} selected, resolution {}x{}",
        sensor.width(),
        sensor.height()
    );

    let spi = cli.spi.open()?;
    // Radiometry and FFC are nice-to-have; capture works without them
    cci::configure_camera(&cli.cci);

    let mut camera = Camera::new(StdTransport::new(spi), sensor);
    let image = camera.capture_image()?;

    cli.output.write_image(&image)?;
    Ok(())
}
