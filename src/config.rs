use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{MarkerPattern, DEFAULT_MARKER_PREFIX};
use crate::error::{AutoversionError, Result};
use crate::publish::PublishOptions;
use crate::resolver::{ResolveOptions, DEFAULT_LOOKBACK};

/// File name looked up in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "autoversion.toml";

/// Represents the optional configuration file for nuget-autoversion.
///
/// Every value can be overridden from the command line. The credential is
/// never read from the file.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub publish: PublishConfig,
}

/// Package feed settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FeedConfig {
    /// Feed root or service index URL
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub package_id: Option<String>,

    /// Request timeout; unset leaves the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_marker_prefix() -> String {
    DEFAULT_MARKER_PREFIX.to_string()
}

fn default_lookback() -> usize {
    DEFAULT_LOOKBACK
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Commit scanning and marker settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,

    #[serde(default = "default_lookback")]
    pub lookback: usize,

    /// Remote markers are pushed to
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            marker_prefix: default_marker_prefix(),
            lookback: default_lookback(),
            remote: default_remote(),
        }
    }
}

fn default_configuration() -> String {
    "Release".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_dotnet() -> String {
    "dotnet".to_string()
}

/// Build, pack and push settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PublishConfig {
    #[serde(default)]
    pub skip_compile_step: bool,

    #[serde(default)]
    pub should_publish: bool,

    /// Build configuration passed as `-c`
    #[serde(default = "default_configuration")]
    pub configuration: String,

    /// Package output directory, relative to the working directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Toolchain program
    #[serde(default = "default_dotnet")]
    pub dotnet: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            skip_compile_step: false,
            should_publish: false,
            configuration: default_configuration(),
            output_dir: default_output_dir(),
            dotnet: default_dotnet(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autoversion.toml` in the working directory
/// 3. `autoversion.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, working_dir: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if working_dir.join(CONFIG_FILE_NAME).exists() {
        Some(working_dir.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    };

    let Some(path) = path else {
        return Ok(Config::default());
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        AutoversionError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&text)
        .map_err(|e| AutoversionError::config(format!("Invalid {}: {}", path.display(), e)))
}

/// Values given on the command line; `None` defers to the file.
///
/// The publish switches are tri-state so the command line can turn off what
/// the file turns on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub credential: Option<String>,
    pub feed_address: Option<String>,
    pub package_id: Option<String>,
    pub marker_prefix: Option<String>,
    pub lookback: Option<usize>,
    pub skip_compile_step: Option<bool>,
    pub should_publish: Option<bool>,
    pub dry_run: bool,
}

/// Fully assembled, validated inputs for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub credential: String,
    pub feed_address: String,
    pub package_id: String,
    pub working_directory: PathBuf,
    pub marker_prefix: String,
    pub lookback: usize,
    pub remote: String,
    pub feed_timeout: Option<Duration>,
    pub skip_compile_step: bool,
    pub should_publish: bool,
    pub configuration: String,
    pub output_dir: PathBuf,
    pub dotnet: String,
    pub dry_run: bool,
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AutoversionError::config(format!("missing required input '{}'", name)))
}

impl Settings {
    /// Merge command-line overrides over the file configuration.
    pub fn assemble(
        config: Config,
        overrides: Overrides,
        working_directory: PathBuf,
    ) -> Result<Self> {
        let credential = required(overrides.credential, "token")?;
        let feed_address = required(overrides.feed_address.or(config.feed.address), "feed")?;
        let package_id = required(overrides.package_id.or(config.feed.package_id), "package-id")?;

        let marker_prefix = overrides
            .marker_prefix
            .filter(|p| !p.is_empty())
            .unwrap_or(config.git.marker_prefix);

        Ok(Settings {
            credential,
            feed_address,
            package_id,
            working_directory,
            marker_prefix: MarkerPattern::new(marker_prefix).prefix().to_string(),
            lookback: overrides.lookback.unwrap_or(config.git.lookback),
            remote: config.git.remote,
            feed_timeout: config.feed.timeout_secs.map(Duration::from_secs),
            skip_compile_step: overrides
                .skip_compile_step
                .unwrap_or(config.publish.skip_compile_step),
            should_publish: overrides
                .should_publish
                .unwrap_or(config.publish.should_publish),
            configuration: config.publish.configuration,
            output_dir: config.publish.output_dir,
            dotnet: config.publish.dotnet,
            dry_run: overrides.dry_run,
        })
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            lookback: self.lookback,
            markers: MarkerPattern::new(self.marker_prefix.clone()),
            package_id: self.package_id.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Dry runs never publish.
    pub fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            skip_compile_step: self.skip_compile_step,
            should_publish: self.should_publish && !self.dry_run,
        }
    }
}
