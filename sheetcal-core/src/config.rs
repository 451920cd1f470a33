//! Build configuration, loaded from a `sheetcal.toml` file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use ::config::{Config, File};
use serde::Deserialize;

use crate::error::{SheetCalError, SheetCalResult};

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_calendar() -> String {
    "Events".to_string()
}

fn default_duration_minutes() -> i64 {
    60
}

/// Configuration for one build run.
///
/// Every knob the pipeline has lives here; the core never reads environment
/// variables or other ambient state.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Published CSV export URL of the source spreadsheet.
    pub source_url: Option<String>,

    /// Directory the feeds, manifest, and subscribe page are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Feed that rows without a calendar cell are routed to.
    #[serde(default = "default_calendar")]
    pub default_calendar: String,

    /// Duration applied to timed events that have no End cell.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i64,

    /// IANA timezone that naive Start/End values are interpreted in.
    /// Events are always serialized in UTC; this only affects interpretation.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Extra header aliases, e.g. `"Event" = "Title"`. Applied on top of the
    /// built-in aliases (`Start Date` → `Start`, etc.).
    #[serde(default)]
    pub columns: HashMap<String, String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            source_url: None,
            output_dir: default_output_dir(),
            default_calendar: default_calendar(),
            default_duration_minutes: default_duration_minutes(),
            timezone: None,
            columns: HashMap::new(),
        }
    }
}

impl BuildConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> SheetCalResult<Self> {
        let config: BuildConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()
            .map_err(|e| SheetCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SheetCalError::Config(e.to_string()))?;

        Ok(config)
    }

    /// The source URL, required before a run can fetch anything.
    pub fn require_source_url(&self) -> SheetCalResult<&str> {
        self.source_url.as_deref().ok_or_else(|| {
            SheetCalError::Config(
                "source_url is not set; add it to sheetcal.toml or pass --url".to_string(),
            )
        })
    }

    /// The timezone naive inputs are interpreted in (UTC unless configured).
    pub fn timezone(&self) -> SheetCalResult<Tz> {
        match self.timezone.as_deref() {
            None => Ok(Tz::UTC),
            Some(name) => name
                .parse()
                .map_err(|_| SheetCalError::Config(format!("Unknown timezone '{name}'"))),
        }
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// Create a commented template config file at `path`.
    pub fn create_default_config(path: &Path) -> SheetCalResult<()> {
        let contents = "\
# sheetcal configuration

# Published CSV export URL of the source spreadsheet (required):
# source_url = \"https://docs.google.com/spreadsheets/d/e/.../pub?output=csv\"

# Where feeds, calendars.json, and index.html are written:
# output_dir = \"public\"

# Feed for rows without a Calendar cell:
# default_calendar = \"Events\"

# End time applied to timed events with no End cell:
# default_duration_minutes = 60

# IANA timezone that naive dates/times in the sheet are interpreted in:
# timezone = \"Europe/Helsinki\"

# Extra header aliases:
# [columns]
# \"Event\" = \"Title\"
";

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, contents)?;
        Ok(())
    }
}
