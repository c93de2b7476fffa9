use std::{fs, path::PathBuf};

use clap::Args;
use lepton_vospi::Image;
use log::{debug, info};
use simple_eyre::{eyre::eyre, Result};

/// 0 degrees Celsius in centikelvin.
const CENTIKELVIN_ZERO_C: i32 = 27315;

#[derive(Debug, Args)]
pub struct Output {
    /// Base name for the exported files, written as <base>.pgm and
    /// <base>.csv. Picks the first free IMG_NNNN name when not given
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Output {
    pub fn write_image(&self, image: &Image) -> Result<()> {
        let base = match &self.output {
            Some(base) => base.clone(),
            None => next_free_base()?,
        };
        let pgm = base.with_extension("pgm");
        let csv = base.with_extension("csv");
        info!("writing {} and {}", pgm.display(), csv.display());
        fs::write(&pgm, render_pgm(image))?;
        fs::write(&csv, render_csv(image))?;
        Ok(())
    }
}

fn next_free_base() -> Result<PathBuf> {
    for index in 0..=9999u32 {
        let base = PathBuf::from(format!("IMG_{index:04}"));
        if !base.with_extension("pgm").exists() {
            return Ok(base);
        }
    }
    Err(eyre!("all names from IMG_0000 to IMG_9999 are taken"))
}

/// Plain-text grayscale image, rescaled so the smallest raw value maps
/// to gray 0 and the declared maximum is the raw spread.
fn render_pgm(image: &Image) -> String {
    let (min, max) = image.min_max();
    debug!("raw pixel range {min}..{max}");
    let mut out = format!("P2\n{} {}\n{}\n", image.width(), image.height(), max - min);
    for row in image.rows() {
        let line = row
            .iter()
            .map(|&v| (v - min).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Temperature of one pixel in degrees Celsius. Raw values are
/// centikelvin when T-Linear radiometry is active; without it the
/// column is still written but carries no physical meaning.
fn celsius(raw: u16) -> f32 {
    (i32::from(raw) - CENTIKELVIN_ZERO_C) as f32 / 100.0
}

fn render_csv(image: &Image) -> String {
    let mut out = image
        .rows()
        .map(|row| {
            row.iter()
                .map(|&v| format!("{:.2}", celsius(v)))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_is_rescaled_to_the_raw_spread() {
        let image = Image::from_pixels(3, 2, vec![30000, 30010, 30005, 30020, 30000, 30015]);
        let pgm = render_pgm(&image);
        let mut lines = pgm.lines();
        assert_eq!(lines.next(), Some("P2"));
        assert_eq!(lines.next(), Some("3 2"));
        // Declared maximum gray level is max - min
        assert_eq!(lines.next(), Some("20"));
        assert_eq!(lines.next(), Some("0 10 5"));
        assert_eq!(lines.next(), Some("20 0 15"));
    }

    #[test]
    fn centikelvin_converts_to_celsius() {
        assert!((celsius(30000) - 26.85).abs() < 1e-4);
        assert!((celsius(27315) - 0.0).abs() < 1e-4);
        // Below-zero temperatures survive the signed conversion
        assert!((celsius(27215) - (-1.0)).abs() < 1e-4);
    }

    #[test]
    fn csv_rows_match_image_rows() {
        let image = Image::from_pixels(2, 2, vec![30000, 29000, 28000, 27315]);
        let csv = render_csv(&image);
        assert_eq!(csv, "26.85,16.85\n6.85,0.00\n");
    }
}
