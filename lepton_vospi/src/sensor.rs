use core::{fmt, str::FromStr};

use crate::error::Error;

/// Sensor generation, selecting image geometry and segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Lepton 2.x: 80x60, one unlabeled frame per image.
    Lepton2,
    /// Lepton 3.x: 160x120, four labeled segments per image.
    Lepton3,
}

impl SensorKind {
    pub fn width(self) -> usize {
        match self {
            SensorKind::Lepton2 => 80,
            SensorKind::Lepton3 => 160,
        }
    }

    pub fn height(self) -> usize {
        match self {
            SensorKind::Lepton2 => 60,
            SensorKind::Lepton3 => 120,
        }
    }

    /// Segments the sensor splits one image into.
    pub fn segments(self) -> usize {
        match self {
            SensorKind::Lepton2 => 1,
            SensorKind::Lepton3 => 4,
        }
    }

    pub fn is_segmented(self) -> bool {
        matches!(self, SensorKind::Lepton3)
    }
}

impl FromStr for SensorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" => Ok(SensorKind::Lepton2),
            "3" => Ok(SensorKind::Lepton3),
            _ => Err(Error::UnknownSensorKind(s.to_string())),
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Lepton2 => f.write_str("Lepton 2.x"),
            SensorKind::Lepton3 => f.write_str("Lepton 3.x"),
        }
    }
}
