//! Vendor control interface (CCI) over I2C.
//!
//! Two operations run once before capture: enabling T-Linear radiometry
//! (so raw pixels come out in centikelvin) and a flat-field correction.
//! Both are best effort: every failure is logged and the capture
//! proceeds with whatever the sensor delivers.

use std::{
    thread,
    time::{Duration, Instant},
};

use clap::Args;
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use log::{info, warn};
use simple_eyre::{eyre::eyre, Result};

/// CCI slave address.
const CCI_ADDR: u16 = 0x2A;

/// 16-bit CCI registers, addressed big-endian.
const REG_STATUS: u16 = 0x0002;
const REG_COMMAND: u16 = 0x0004;
const REG_DATA_LEN: u16 = 0x0006;
const REG_DATA_0: u16 = 0x0008;

/// RAD module, T-Linear enable, SET.
const CMD_RAD_TLINEAR_SET: u16 = 0x4EC1;
/// SYS module, FFC normalization, RUN.
const CMD_SYS_FFC_RUN: u16 = 0x0242;
/// SYS module, FFC status, GET.
const CMD_SYS_FFC_STATUS_GET: u16 = 0x0244;

/// Camera status word while FFC is still in progress.
const FFC_BUSY: i32 = 1;

const BUSY_POLL: Duration = Duration::from_millis(10);
const BUSY_POLL_LIMIT: u32 = 200;
const FFC_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Args)]
pub struct CciConf {
    /// I2C bus the sensor's control interface is wired to
    #[arg(long = "i2c", default_value = "/dev/i2c-1")]
    pub i2c: String,
}

struct Cci {
    dev: LinuxI2CDevice,
}

impl Cci {
    fn open(path: &str) -> Result<Cci> {
        let dev = LinuxI2CDevice::new(path, CCI_ADDR)?;
        Ok(Cci { dev })
    }

    fn read_reg(&mut self, reg: u16) -> Result<u16> {
        self.dev.write(&reg.to_be_bytes())?;
        let mut buf = [0u8; 2];
        self.dev.read(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn write_reg(&mut self, reg: u16, value: u16) -> Result<()> {
        let mut msg = reg.to_be_bytes().to_vec();
        msg.extend_from_slice(&value.to_be_bytes());
        self.dev.write(&msg)?;
        Ok(())
    }

    /// Waits for the camera to clear the busy bit, returning the final
    /// status word.
    fn wait_ready(&mut self) -> Result<u16> {
        for _ in 0..BUSY_POLL_LIMIT {
            let status = self.read_reg(REG_STATUS)?;
            if status & 0x01 == 0 {
                return Ok(status);
            }
            thread::sleep(BUSY_POLL);
        }
        Err(eyre!("camera stayed busy"))
    }

    fn finish_command(&mut self, cmd: u16) -> Result<()> {
        let status = self.wait_ready()?;
        let response = (status >> 8) as i8;
        if response != 0 {
            return Err(eyre!(
                "command {cmd:#06x} failed with response code {response}"
            ));
        }
        Ok(())
    }

    /// SET/RUN command: data words in, no data back.
    fn execute(&mut self, cmd: u16, data: &[u16]) -> Result<()> {
        self.wait_ready()?;
        for (i, &word) in data.iter().enumerate() {
            self.write_reg(REG_DATA_0 + 2 * i as u16, word)?;
        }
        self.write_reg(REG_DATA_LEN, data.len() as u16)?;
        self.write_reg(REG_COMMAND, cmd)?;
        self.finish_command(cmd)
    }

    /// GET command: `len` data words back.
    fn query(&mut self, cmd: u16, len: u16) -> Result<Vec<u16>> {
        self.wait_ready()?;
        self.write_reg(REG_DATA_LEN, len)?;
        self.write_reg(REG_COMMAND, cmd)?;
        self.finish_command(cmd)?;
        (0..len)
            .map(|i| self.read_reg(REG_DATA_0 + 2 * i))
            .collect()
    }

    fn enable_tlinear(&mut self) -> Result<()> {
        // 32-bit enable flag, least significant word first
        self.execute(CMD_RAD_TLINEAR_SET, &[1, 0])
    }

    fn run_ffc(&mut self) -> Result<()> {
        self.execute(CMD_SYS_FFC_RUN, &[])?;
        let deadline = Instant::now() + FFC_TIMEOUT;
        loop {
            let words = self.query(CMD_SYS_FFC_STATUS_GET, 2)?;
            let status = (i32::from(words[1]) << 16) | i32::from(words[0]);
            if status != FFC_BUSY {
                if status < 0 {
                    return Err(eyre!("FFC finished with status {status}"));
                }
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(eyre!("FFC status polling timed out"));
            }
            thread::sleep(BUSY_POLL);
        }
    }
}

/// One-shot camera configuration before capture begins.
pub fn configure_camera(conf: &CciConf) {
    let mut cci = match Cci::open(&conf.i2c) {
        Ok(cci) => cci,
        Err(err) => {
            warn!("control interface unavailable on {}: {err}", conf.i2c);
            return;
        }
    };

    match cci.enable_tlinear() {
        Ok(()) => info!("T-Linear radiometry enabled"),
        Err(err) => warn!("T-Linear radiometry not enabled: {err} (expected on non-radiometric units)"),
    }

    match cci.run_ffc() {
        Ok(()) => info!("flat-field correction complete"),
        Err(err) => warn!("flat-field correction failed: {err}"),
    }
}
