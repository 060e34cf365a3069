use image::{DynamicImage, GrayImage};
use std::io::Cursor;
use thiserror::Error;

/// Mean luminance below this is treated as light text on a dark background.
const POLARITY_THRESHOLD: u64 = 128;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Normalize a rasterized page and return PNG bytes ready for OCR.
pub fn prepare_for_ocr(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    encode_as_png(normalize(img))
}

/// Same as [`prepare_for_ocr`] for encoded image bytes (PNG / JPEG / …).
pub fn prepare_for_ocr_from_bytes(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    prepare_for_ocr(img)
}

/// Grayscale + polarity normalization: output is always dark glyphs on a light
/// background.
fn normalize(img: DynamicImage) -> GrayImage {
    let mut gray = img.to_luma8();
    if is_light_on_dark(&gray) {
        image::imageops::invert(&mut gray);
    }
    gray
}

fn is_light_on_dark(gray: &GrayImage) -> bool {
    let count = u64::from(gray.width()) * u64::from(gray.height());
    if count == 0 {
        return false;
    }
    let sum: u64 = gray.pixels().map(|p| u64::from(p[0])).sum();
    sum / count < POLARITY_THRESHOLD
}

fn encode_as_png(img: GrayImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, RgbImage};

    fn solid_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        let img: GrayImage = ImageBuffer::from_fn(width, height, |_, _| Luma([value]));
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn color_input_becomes_single_channel() {
        let img: RgbImage = ImageBuffer::from_fn(4, 4, |_, _| Rgb([250u8, 240, 230]));
        let gray = normalize(DynamicImage::ImageRgb8(img));
        assert_eq!(gray.dimensions(), (4, 4));
    }

    #[test]
    fn dark_background_is_inverted() {
        // White glyph pixel on a black page.
        let mut img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([0u8]));
        img.put_pixel(1, 1, Luma([255u8]));
        let out = normalize(DynamicImage::ImageLuma8(img));
        assert_eq!(out.get_pixel(0, 0)[0], 255);
        assert_eq!(out.get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn light_background_is_left_alone() {
        let out = normalize(solid_gray(3, 3, 220));
        assert!(out.pixels().all(|p| p[0] == 220));
    }

    #[test]
    fn empty_image_does_not_panic() {
        let out = normalize(solid_gray(0, 0, 0));
        assert_eq!(out.dimensions(), (0, 0));
    }

    #[test]
    fn prepare_from_bytes_produces_png_header() {
        let img = solid_gray(4, 4, 100);
        let mut png_bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .unwrap();
        let result = prepare_for_ocr_from_bytes(&png_bytes).unwrap();
        // PNG magic bytes: 0x89 0x50 0x4E 0x47
        assert_eq!(&result[..4], b"\x89PNG");
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        assert!(matches!(
            prepare_for_ocr_from_bytes(b"not an image"),
            Err(PreprocessError::Load(_))
        ));
    }
}
