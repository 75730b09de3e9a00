use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageReader, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Lossy WebP quality used for every converted image
pub const WEBP_QUALITY: f32 = 85.0;

pub const WEBP_EXTENSION: &str = "webp";

/// One successfully converted image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub source_path: PathBuf,
    /// Source file name without its extension; used as the product code
    pub base_name: String,
    /// Name of the written file (`<base_name>.webp`)
    pub converted_name: String,
    pub output_path: PathBuf,
}

/// Derive `(base_name, converted_name)` from a source path
pub fn converted_names(input_path: &Path) -> Result<(String, String)> {
    let base_name = input_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| anyhow!("Path has no file name: {}", input_path.display()))?;

    let converted_name = format!("{}.{}", base_name, WEBP_EXTENSION);
    Ok((base_name, converted_name))
}

/// Drop alpha and palette information, keeping 8-bit RGB
pub fn normalize_to_rgb(img: DynamicImage) -> RgbImage {
    img.into_rgb8()
}

/// Encode an RGB image as lossy WebP
pub fn encode_webp(img: &RgbImage, quality: f32) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let encoder = webp::Encoder::from_rgb(img.as_raw(), width, height);
    let memory = encoder
        .encode_simple(false, quality)
        .map_err(|e| anyhow!("WebP encoding failed ({}x{}): {:?}", width, height, e))?;

    Ok(memory.to_vec())
}

/// Convert a single image to WebP inside `output_dir`
///
/// The output directory is created when missing. A previous file with the
/// same derived name is overwritten.
pub fn convert_to_webp(input_path: &Path, output_dir: &Path) -> Result<ConversionResult> {
    let img = ImageReader::open(input_path)
        .with_context(|| format!("Failed to open image: {}", input_path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read image: {}", input_path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode image: {}", input_path.display()))?;

    let rgb = normalize_to_rgb(img);
    let (base_name, converted_name) = converted_names(input_path)?;
    let encoded = encode_webp(&rgb, WEBP_QUALITY)
        .with_context(|| format!("Failed to encode image: {}", input_path.display()))?;

    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let output_path = output_dir.join(&converted_name);
    fs::write(&output_path, encoded)
        .with_context(|| format!("Failed to save WebP: {}", output_path.display()))?;

    Ok(ConversionResult {
        source_path: input_path.to_path_buf(),
        base_name,
        converted_name,
        output_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgb, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_rgba_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7) as u8, (y * 5) as u8, 128, if x % 2 == 0 { 255 } else { 40 }])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_converted_names() {
        let (base, name) = converted_names(Path::new("/photos/ABC-123.jpg")).unwrap();
        assert_eq!(base, "ABC-123");
        assert_eq!(name, "ABC-123.webp");

        let (base, name) = converted_names(Path::new("archive.tar.png")).unwrap();
        assert_eq!(base, "archive.tar");
        assert_eq!(name, "archive.tar.webp");

        let (base, _) = converted_names(Path::new("noext")).unwrap();
        assert_eq!(base, "noext");

        assert!(converted_names(Path::new("/")).is_err());
    }

    #[test]
    fn test_normalize_drops_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let rgb = normalize_to_rgb(DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_convert_png_with_alpha() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("product.png");
        write_rgba_png(&input, 40, 24);
        let output_dir = dir.path().join("imagenes_webp");

        let result = convert_to_webp(&input, &output_dir).unwrap();

        assert_eq!(result.source_path, input);
        assert_eq!(result.base_name, "product");
        assert_eq!(result.converted_name, "product.webp");
        assert_eq!(result.output_path, output_dir.join("product.webp"));

        let bytes = fs::read(&result.output_path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (40, 24));
    }

    #[test]
    fn test_convert_detects_format_from_content() {
        let dir = TempDir::new().unwrap();
        // JPEG bytes behind a .png name still decode
        let input = dir.path().join("mislabelled.png");
        let img = RgbImage::from_pixel(16, 16, Rgb([200, 100, 50]));
        img.save_with_format(&input, ImageFormat::Jpeg).unwrap();

        let result = convert_to_webp(&input, dir.path()).unwrap();
        assert_eq!(result.converted_name, "mislabelled.webp");
    }

    #[test]
    fn test_convert_invalid_file_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.jpg");
        fs::write(&input, b"definitely not an image").unwrap();
        let output_dir = dir.path().join("out");

        assert!(convert_to_webp(&input, &output_dir).is_err());
        assert!(!output_dir.join("broken.webp").exists());
    }

    #[test]
    fn test_convert_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = convert_to_webp(&dir.path().join("missing.png"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn test_convert_keeps_unrelated_files() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("out");
        fs::create_dir_all(&output_dir).unwrap();
        fs::write(output_dir.join("other.txt"), b"keep me").unwrap();

        let input = dir.path().join("item.bmp");
        RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])).save(&input).unwrap();
        convert_to_webp(&input, &output_dir).unwrap();

        assert_eq!(fs::read(output_dir.join("other.txt")).unwrap(), b"keep me");
        assert!(output_dir.join("item.webp").exists());
    }
}
