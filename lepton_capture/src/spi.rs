use clap::Args;
use log::info;
use simple_eyre::{eyre::WrapErr, Result};
use spidev::{SpiModeFlags, Spidev, SpidevOptions};

/// VoSPI clocks the stream out in 8-bit words.
const BITS_PER_WORD: u8 = 8;

#[derive(Debug, Args)]
pub struct SpiConf {
    /// SPI device the sensor's video interface is wired to
    #[arg(long, default_value = "/dev/spidev0.0")]
    pub device: String,

    /// SPI clock rate in Hz
    #[arg(long, default_value_t = 16_000_000)]
    pub speed: u32,
}

impl SpiConf {
    /// Opens and configures the SPI device. Failures here are fatal to
    /// the whole run; there is nothing to capture without a transport.
    pub fn open(&self) -> Result<Spidev> {
        let mut spi = Spidev::open(&self.device)
            .wrap_err_with(|| format!("can't open SPI device {}", self.device))?;
        let options = SpidevOptions::new()
            .bits_per_word(BITS_PER_WORD)
            .max_speed_hz(self.speed)
            .mode(SpiModeFlags::SPI_MODE_3)
            .build();
        spi.configure(&options)
            .wrap_err_with(|| format!("can't configure SPI device {}", self.device))?;
        info!(
            "SPI ready: {} at {} Hz, {BITS_PER_WORD} bits per word",
            self.device, self.speed
        );
        Ok(spi)
    }
}
