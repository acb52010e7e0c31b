//! Environment loading for the securewipe CLI

use std::path::PathBuf;

use tracing::{info, warn};

/// Get the securewipe config directory path (~/.securewipe)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".securewipe"))
}

/// Outcome of [`load_dotenv`], logged once tracing is up
#[derive(Debug, Default)]
pub struct DotenvReport {
    pub loaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl DotenvReport {
    pub fn log(&self) {
        for (path, err) in &self.failed {
            warn!("Failed to load {}: {}", path.display(), err);
        }

        if self.loaded.is_empty() {
            info!("Using environment variables only (no .env file found)");
        } else {
            let files: Vec<_> = self.loaded.iter().map(|p| p.display().to_string()).collect();
            info!("Loaded configuration from: {}", files.join(", "));
        }
    }
}

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.securewipe/.env
///
/// dotenvy never overwrites variables that are already set, so loading the
/// current directory first gives it priority over the home file. Must run
/// before argument parsing because clap reads the environment.
pub fn load_dotenv() -> DotenvReport {
    let mut report = DotenvReport::default();

    match dotenvy::dotenv() {
        Ok(path) => report.loaded.push(path),
        Err(e) if e.not_found() => {}
        Err(e) => report.failed.push((PathBuf::from(".env"), e.to_string())),
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => report.loaded.push(env_file),
                Err(e) => report.failed.push((env_file, e.to_string())),
            }
        }
    }

    report
}
