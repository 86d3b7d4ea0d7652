use std::env;

use prediction_uploader::config::{self, Config};
use prediction_uploader::errors::AppResult;
use prediction_uploader::security::FileSystemGuard;
use prediction_uploader::uploader::{extract_prediction, PredictionClient};
use prediction_uploader::{image_processor, security};

enum CliCommand {
    ResetConfig,
    Upload {
        image_path: String,
        endpoint: Option<String>,
    },
}

/// Argument parsing happens before the config is touched, so
/// `--reset-config` works even against a config that fails validation.
fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    match args.get(1) {
        Some(flag) if flag == "--reset-config" => Ok(CliCommand::ResetConfig),
        Some(path) => Ok(CliCommand::Upload {
            image_path: path.clone(),
            endpoint: args.get(2).cloned(),
        }),
        None => Err("Usage: prediction-uploader <image-path> [endpoint-url]".to_string()),
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(usage) => {
            eprintln!("{}", usage);
            std::process::exit(2);
        }
    };

    let (image_path, endpoint_override) = match command {
        CliCommand::ResetConfig => {
            if let Err(e) = config::reset_config() {
                eprintln!("Failed to reset configuration: {}", e);
                std::process::exit(1);
            }
            println!("Configuration reset to defaults");
            return;
        }
        CliCommand::Upload {
            image_path,
            endpoint,
        } => (image_path, endpoint),
    };

    let mut config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(2);
    });

    // Initialize logging
    let level = config
        .log_level
        .parse()
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    // Optional endpoint override, ahead of the configured one
    if let Some(endpoint) = endpoint_override {
        config.endpoint_url = endpoint;
    }

    // Drop temp spools from previous runs
    if let Err(e) = FileSystemGuard::cleanup_temp_files() {
        log::warn!("Failed to cleanup temp files: {}", e);
    }

    match run(&config, &image_path).await {
        Ok(prediction) => {
            println!("Prediction: {}", prediction);
        }
        Err(e) => {
            log::error!("Upload failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(config: &Config, image_path: &str) -> AppResult<String> {
    security::InputValidator::validate_image_file(image_path)?;

    if let Ok((width, height, size)) = image_processor::get_image_info(image_path) {
        log::info!(
            "Uploading {} ({}x{}, {} bytes) to {}",
            image_path,
            width,
            height,
            size,
            config.endpoint_url
        );
    }

    let img = image_processor::load_image(image_path)?;

    let client = PredictionClient::new(config)?;
    let response = client.upload_image(&img).await?;

    // Known JSON shapes are unwrapped for display, anything else is
    // shown as-is
    Ok(extract_prediction(&response).unwrap_or(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(rest: &[&str]) -> Vec<String> {
        std::iter::once("prediction-uploader")
            .chain(rest.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_reset_config_needs_no_other_input() {
        let parsed = parse_args(&args(&["--reset-config"]));
        assert!(matches!(parsed, Ok(CliCommand::ResetConfig)));
    }

    #[test]
    fn test_parse_args_upload_with_endpoint_override() {
        let parsed = parse_args(&args(&["photo.png", "http://10.0.0.2:5000/predict"]));
        match parsed {
            Ok(CliCommand::Upload {
                image_path,
                endpoint,
            }) => {
                assert_eq!(image_path, "photo.png");
                assert_eq!(endpoint.as_deref(), Some("http://10.0.0.2:5000/predict"));
            }
            _ => panic!("Expected upload command"),
        }
    }

    #[test]
    fn test_parse_args_without_arguments_prints_usage() {
        let parsed = parse_args(&args(&[]));
        assert!(parsed.is_err());
    }
}
