// Uploader module - one multipart POST per user action
//
// This module is responsible for shipping JPEG-encoded images to the
// prediction endpoint and handing back the response text.

pub mod client;
pub mod payload;

pub use client::{extract_prediction, PredictionClient, NO_RESPONSE_PLACEHOLDER};
pub use payload::UploadPayload;
