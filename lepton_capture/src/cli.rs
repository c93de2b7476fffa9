use clap::Parser;
use lepton_vospi::SensorKind;

use crate::{cci::CciConf, output::Output, spi::SpiConf};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Sensor generation: 2 for Lepton 2.x (80x60), 3 for Lepton 3.x (160x120)
    #[arg(short = 't', long = "sensor-type", default_value = "3")]
    pub sensor_type: SensorKind,

    #[command(flatten)]
    pub spi: SpiConf,

    #[command(flatten)]
    pub cci: CciConf,

    #[command(flatten)]
    pub output: Output,
}
