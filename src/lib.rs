pub mod config;
pub mod errors;
pub mod image_processor;
pub mod security;
pub mod uploader;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use uploader::{extract_prediction, PredictionClient, UploadPayload};
