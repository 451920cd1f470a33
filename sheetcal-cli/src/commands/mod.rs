pub mod build;
pub mod check;

use std::path::{Path, PathBuf};

use anyhow::Result;
use sheetcal_core::config::BuildConfig;

/// Load the config file and layer CLI overrides on top.
///
/// A missing config file is created as a commented template and the run
/// aborts with instructions, unless `--url` makes the file unnecessary.
pub fn load_config(
    path: &Path,
    url: Option<String>,
    output: Option<PathBuf>,
) -> Result<BuildConfig> {
    let mut config = if path.exists() {
        BuildConfig::load(path)?
    } else if url.is_some() {
        BuildConfig::default()
    } else {
        BuildConfig::create_default_config(path)?;
        anyhow::bail!(
            "Config file not found, so a template was written to {}.\n\
            Set source_url there (or pass --url) and run again.",
            path.display()
        );
    };

    if let Some(url) = url {
        config.source_url = Some(url);
    }
    if let Some(output) = output {
        config.output_dir = output;
    }

    Ok(config)
}
