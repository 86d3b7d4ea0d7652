use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::image_processor;
use crate::security::InputValidator;
use crate::uploader::payload::UploadPayload;
use image::DynamicImage;
use reqwest::Client;
use std::time::Duration;

/// Returned in place of an empty 2xx response body.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response";

/// Client for the image prediction endpoint. One POST per call,
/// no retry and no shared per-upload state, so sequential uploads
/// cannot interfere with each other.
pub struct PredictionClient {
    client: Client,
    endpoint: String,
    jpeg_quality: u8,
    keep_temp_copy: bool,
}

impl PredictionClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        InputValidator::validate_endpoint_url(&config.endpoint_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url.trim().to_string(),
            jpeg_quality: config.jpeg_quality,
            keep_temp_copy: config.keep_temp_copy,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Encode an in-memory image as JPEG and upload it, returning the
    /// response body text. The JPEG bytes are spooled to the scoped temp
    /// directory when configured; a failed spool is logged and the upload
    /// continues from the in-memory bytes.
    pub async fn upload_image(&self, img: &DynamicImage) -> AppResult<String> {
        let jpeg_bytes = image_processor::encode_jpeg(img, self.jpeg_quality)?;

        if self.keep_temp_copy {
            match image_processor::write_temp_jpeg(&jpeg_bytes) {
                Ok(path) => log::debug!("Kept temp copy at {}", path.display()),
                Err(e) => log::warn!("Failed to write temp copy, uploading from memory: {}", e),
            }
        }

        let payload = UploadPayload::jpeg(jpeg_bytes);
        self.send(&payload).await
    }

    /// Submit a prepared payload as one multipart POST.
    pub async fn send(&self, payload: &UploadPayload) -> AppResult<String> {
        let form = payload.build_form()?;

        log::info!(
            "Uploading {} ({} bytes) to {}",
            payload.filename(),
            payload.byte_len(),
            self.endpoint
        );

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();

        if status.is_success() {
            let response_text = response.text().await?;
            // char-based truncation: a byte index could split a multibyte char
            let preview: String = response_text.chars().take(300).collect();
            log::debug!("Prediction response (first 300 chars): {}", preview);

            if response_text.is_empty() {
                return Ok(NO_RESPONSE_PLACEHOLDER.to_string());
            }
            return Ok(response_text);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let error = AppError::upload_failed(status.as_u16(), &error_text);

        log::error!("Upload to {} failed: {}", self.endpoint, error);
        Err(error)
    }
}

/// Pull the prediction string out of a known JSON response shape.
/// The server contract is not pinned down, so callers fall back to the
/// raw body when this returns None.
pub fn extract_prediction(response_data: &str) -> Option<String> {
    if response_data.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(response_data) {
        Ok(json) => {
            if let Some(prediction) = json.get("prediction") {
                if let Some(text) = prediction.as_str() {
                    return Some(text.to_string());
                }
                return Some(prediction.to_string());
            }
            log::debug!("Response JSON has no 'prediction' field");
            None
        }
        Err(_) => {
            log::debug!("Response body is not JSON, treating as plain text");
            None
        }
    }
}
