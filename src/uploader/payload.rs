use crate::errors::AppResult;
use reqwest::multipart;

/// Form field name the prediction server expects.
pub const FILE_FIELD_NAME: &str = "file";
/// Filename reported in the multipart part.
pub const UPLOAD_FILENAME: &str = "image.jpg";
/// MIME type of the uploaded part.
pub const JPEG_MIME: &str = "image/jpeg";

/// Holds the single file part of an upload request. Constructed fresh
/// per upload; nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    filename: String,
    bytes: Vec<u8>,
    mime_type: String,
    field_name: String,
}

impl UploadPayload {
    /// Payload for JPEG bytes under the fixed wire contract
    /// (field `file`, filename `image.jpg`, MIME `image/jpeg`).
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            filename: UPLOAD_FILENAME.to_string(),
            bytes,
            mime_type: JPEG_MIME.to_string(),
            field_name: FILE_FIELD_NAME.to_string(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn build_form(&self) -> AppResult<multipart::Form> {
        let part = multipart::Part::bytes(self.bytes.clone())
            .file_name(self.filename.clone())
            .mime_str(&self.mime_type)?;

        Ok(multipart::Form::new().part(self.field_name.clone(), part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_payload_pins_wire_contract() {
        let payload = UploadPayload::jpeg(vec![0xFF, 0xD8, 0xFF]);

        assert_eq!(payload.field_name(), "file");
        assert_eq!(payload.filename(), "image.jpg");
        assert_eq!(payload.mime_type(), "image/jpeg");
        assert_eq!(payload.byte_len(), 3);
    }

    #[test]
    fn test_build_form_succeeds_for_valid_payload() {
        let payload = UploadPayload::jpeg(vec![1, 2, 3, 4]);
        assert!(payload.build_form().is_ok());
    }

    #[test]
    fn test_payloads_are_independent() {
        let first = UploadPayload::jpeg(vec![1, 2, 3]);
        let second = UploadPayload::jpeg(vec![4, 5]);

        assert_eq!(first.byte_len(), 3);
        assert_eq!(second.byte_len(), 2);
    }
}
