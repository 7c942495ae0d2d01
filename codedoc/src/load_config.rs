/// `load_config` module: Loads a static YAML site file into the core [`BuildConfig`].
///
/// This module is the only place where user-supplied YAML is parsed and mapped to
/// strongly-typed core structs.
///
/// # Responsibilities
/// - Parse the site file (output directory plus site/pages/sections/blocks)
/// - Apply the `CODEDOC_OUTPUT_DIR` environment override
/// - Produce clear diagnostics: read failures name the path, parse failures say "YAML"
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use codedoc_core::config::BuildConfig;
use codedoc_core::site::Site;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Environment variable that replaces `output_dir` from the site file.
pub const OUTPUT_DIR_ENV: &str = "CODEDOC_OUTPUT_DIR";

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    site: Site,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading site configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let output_dir = match std::env::var(OUTPUT_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            info!(output_dir = %dir, "Output directory overridden from environment");
            PathBuf::from(dir)
        }
        _ => raw.output_dir,
    };

    let config = BuildConfig {
        output_dir,
        site: raw.site,
    };
    config.trace_loaded();
    Ok(config)
}
