use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::path::Path;

pub struct InputValidator;

impl InputValidator {
    pub fn validate_endpoint_url(url: &str) -> AppResult<()> {
        let trimmed = url.trim();

        if trimmed.is_empty() {
            return Err(AppError::validation("url", "Endpoint URL cannot be empty"));
        }

        // host[:port][/path] over plain or TLS HTTP
        let endpoint_pattern = Regex::new(r"^https?://[\w\-\.]+(:\d{1,5})?(/[\w\-\./%]*)?$")
            .map_err(|e| AppError::Config(format!("Invalid endpoint pattern: {}", e)))?;

        if !endpoint_pattern.is_match(trimmed) {
            return Err(AppError::invalid_endpoint(trimmed));
        }

        if trimmed.len() > 500 {
            return Err(AppError::validation("url", "Endpoint URL too long"));
        }

        Ok(())
    }

    pub fn validate_file_path(path: &str) -> AppResult<()> {
        if path.trim().is_empty() {
            return Err(AppError::validation("file_path", "File path cannot be empty"));
        }

        let path_obj = Path::new(path);

        // Ensure it's an image file
        if let Some(extension) = path_obj.extension() {
            let ext = extension.to_string_lossy().to_lowercase();
            if !matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "webp" | "gif" | "bmp") {
                return Err(AppError::invalid_file_type(path));
            }
        } else {
            return Err(AppError::validation("file_path", "File must have an extension"));
        }

        // Check file exists and is readable
        if !path_obj.exists() {
            return Err(AppError::file_not_found(path));
        }

        if !path_obj.is_file() {
            return Err(AppError::validation("file_path", "Path is not a file"));
        }

        Ok(())
    }

    pub fn validate_image_file(file_path: &str) -> AppResult<()> {
        Self::validate_file_path(file_path)?;

        let metadata = std::fs::metadata(file_path)?;

        // Uploads beyond this size are rejected before any decoding work
        const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(AppError::file_too_large(file_path));
        }

        Ok(())
    }
}

// File system utilities for the scoped temp area
pub struct FileSystemGuard;

impl FileSystemGuard {
    pub fn create_secure_temp_file(extension: &str) -> AppResult<std::path::PathBuf> {
        let temp_dir = crate::config::get_temp_directory()?;

        // Generate secure random filename
        let random_name = uuid::Uuid::new_v4().to_string();
        let temp_path = temp_dir.join(format!("{}.{}", random_name, extension));

        Ok(temp_path)
    }

    pub fn cleanup_temp_files() -> AppResult<()> {
        let temp_dir = std::env::temp_dir().join("prediction_uploader");
        if temp_dir.exists() {
            std::fs::remove_dir_all(&temp_dir)?;
        }
        Ok(())
    }

    pub fn get_file_size(path: &str) -> AppResult<u64> {
        let metadata = std::fs::metadata(path)?;
        Ok(metadata.len())
    }
}
