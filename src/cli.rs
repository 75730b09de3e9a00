use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "product-image-exporter",
    about = "Converts product images to WebP and generates .unl, .csv and .sql exports",
    long_about = "
Product Image Exporter

Converts every selected image to WebP (quality 85) into ./imagenes_webp and writes
three exports describing the converted set in the working directory:

  zimagenes.unl   pipe-delimited load file: <code>|<image>|<YYYY-MM-DD>|1
  zimagenes.csv   one converted file name per row
  zimagenes.sql   script reloading the img_product table

Images that fail to convert are reported and left out of the exports.

Example Usage:
  # Convert two images
  product-image-exporter a.png b.jpg

  # Convert every png/jpg/jpeg/gif/bmp file under a directory
  product-image-exporter ~/catalog/photos --verbose

  # Machine-readable output for wrapping tools
  product-image-exporter ~/catalog/photos --json-progress"
)]
pub struct Args {
    /// Image files or directories to convert
    #[arg(value_name = "FILE|DIR", required = true)]
    pub input_paths: Vec<PathBuf>,

    /// Print per-file details
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long = "json-progress")]
    pub json_progress: bool,
}
