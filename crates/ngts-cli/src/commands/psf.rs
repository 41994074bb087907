use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ngts_core::photometry::psf::{central_pixel_fraction, offset_curve};

use super::write_toml;

#[derive(Args)]
pub struct PsfArgs {
    /// PSF full width at half maximum in pixels
    #[arg(short, long, default_value = "1.5")]
    pub fwhm: f64,

    /// Horizontal offset of the PSF centre from the pixel centre
    #[arg(long, default_value = "0")]
    pub dx: f64,

    /// Vertical offset of the PSF centre from the pixel centre
    #[arg(long, default_value = "0")]
    pub dy: f64,

    /// Sample the fraction against distance from the pixel centre
    #[arg(long)]
    pub curve: bool,

    /// Number of samples in the offset curve
    #[arg(long, default_value = "50")]
    pub samples: usize,

    /// Write the offset curve as TOML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &PsfArgs) -> Result<()> {
    let fraction = central_pixel_fraction(args.fwhm, (args.dx, args.dy))?;
    println!(
        "Central pixel fraction (FWHM {} pix, offset ({}, {})): {:.6}",
        args.fwhm, args.dx, args.dy, fraction
    );

    if !args.curve {
        return Ok(());
    }

    let curve = offset_curve(args.fwhm, args.samples)?;
    println!("\n{:>10}  {:>12}  {:>12}", "Offset", "Horizontal", "Diagonal");
    println!("{}", "-".repeat(38));
    let stride = (curve.distance.len() / 10).max(1);
    for i in (0..curve.distance.len()).step_by(stride) {
        println!(
            "{:>10.4}  {:>12.6}  {:>12.6}",
            curve.distance[i], curve.horizontal[i], curve.diagonal[i]
        );
    }

    if let Some(ref path) = args.output {
        write_toml(&curve, Some(path), "offset curve")?;
    }
    Ok(())
}
