use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};
use crate::security::{FileSystemGuard, InputValidator};

/// Decode an image file for upload. Any format the `image` crate
/// understands is accepted; the upload wire format is always JPEG.
pub fn load_image(file_path: &str) -> AppResult<DynamicImage> {
    InputValidator::validate_image_file(file_path)?;
    Ok(image::open(file_path)?)
}

/// Encode an in-memory image as JPEG at the given quality (1-100).
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> AppResult<Vec<u8>> {
    if quality == 0 || quality > 100 {
        return Err(AppError::validation(
            "quality",
            "Quality must be between 1 and 100",
        ));
    }

    let mut output = Vec::new();
    let mut cursor = Cursor::new(&mut output);

    let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    img.write_with_encoder(encoder)?;

    Ok(output)
}

/// Spool encoded JPEG bytes to the scoped temp directory. The returned
/// path lives until the next temp cleanup pass.
pub fn write_temp_jpeg(jpeg_bytes: &[u8]) -> AppResult<PathBuf> {
    let temp_path = FileSystemGuard::create_secure_temp_file("jpg")?;
    fs::write(&temp_path, jpeg_bytes)?;

    log::debug!(
        "Wrote {} JPEG bytes to {}",
        jpeg_bytes.len(),
        temp_path.display()
    );

    Ok(temp_path)
}

/// Dimensions and on-disk size of an image file.
pub fn get_image_info(file_path: &str) -> AppResult<(u32, u32, u64)> {
    InputValidator::validate_file_path(file_path)?;

    let (width, height) = image::image_dimensions(file_path)?;
    let file_size = FileSystemGuard::get_file_size(file_path)?;

    Ok((width, height, file_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 80, 40]),
        ))
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg_magic_bytes() {
        let img = create_test_image(4, 4);
        let jpeg = encode_jpeg(&img, 100).unwrap();

        assert!(!jpeg.is_empty());
        // SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_rejects_invalid_quality() {
        let img = create_test_image(1, 1);
        assert!(encode_jpeg(&img, 0).is_err());
        assert!(encode_jpeg(&img, 101).is_err());
    }

    #[test]
    fn test_encoded_bytes_decode_back_to_same_dimensions() {
        let img = create_test_image(8, 6);
        let jpeg = encode_jpeg(&img, 100).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 6);
    }

    #[test]
    fn test_write_temp_jpeg_creates_file_with_contents() {
        let img = create_test_image(2, 2);
        let jpeg = encode_jpeg(&img, 90).unwrap();

        let temp_path = write_temp_jpeg(&jpeg).unwrap();
        let written = std::fs::read(&temp_path).unwrap();

        let _ = std::fs::remove_file(&temp_path);

        assert_eq!(written, jpeg);
    }

    #[test]
    fn test_load_image_nonexistent_file() {
        let result = load_image("nonexistent_file.png");
        assert!(result.is_err(), "Should fail for nonexistent file");
    }

    #[test]
    fn test_get_image_info_round_trip() {
        let temp_dir = std::env::temp_dir();
        let test_file_path = temp_dir.join("image_processor_info_test.png");

        let img = create_test_image(5, 3);
        img.save(&test_file_path).unwrap();

        let path_str = test_file_path.to_string_lossy();
        let result = get_image_info(&path_str);

        let _ = std::fs::remove_file(&test_file_path);

        let (width, height, size) = result.unwrap();
        assert_eq!(width, 5);
        assert_eq!(height, 3);
        assert!(size > 0);
    }

    #[test]
    fn test_get_image_info_non_image_file() {
        let temp_dir = std::env::temp_dir();
        let test_file_path = temp_dir.join("image_processor_not_image.png");

        std::fs::write(&test_file_path, b"This is not an image").unwrap();

        let path_str = test_file_path.to_string_lossy();
        let result = get_image_info(&path_str);

        let _ = std::fs::remove_file(&test_file_path);

        assert!(result.is_err(), "Should fail for non-image file");
    }
}
