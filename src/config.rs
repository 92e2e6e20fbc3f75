use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration defaults that can be saved to a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_ext: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_ext: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_metadata: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avconv: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requeue_delay_ms: Option<u64>,
}

/// Fully resolved settings used by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub folder: PathBuf,
    /// Container requested from the video host, e.g. ".m4a"
    pub input_ext: String,
    /// Container produced by the transcoder, e.g. ".mp3"
    pub output_ext: String,
    pub manual: bool,
    pub no_metadata: bool,
    /// Transcode with avconv instead of ffmpeg, see [`crate::pipeline::Encoder`]
    pub avconv: bool,
    /// Debug-level logging, see [`crate::logging::init_from`]
    pub verbose: bool,
    /// Pause after a requeue so an unreachable upstream doesn't spin the loop
    pub requeue_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Config::new().settings()
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the config file path (~/.state/trackgrab/defaults.toml)
    pub fn get_config_path() -> std::result::Result<PathBuf, io::Error> {
        let home = std::env::var("HOME")
            .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "HOME environment variable not set"))?;

        let config_dir = Path::new(&home).join(".state").join("trackgrab");
        Ok(config_dir.join("defaults.toml"))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load config from a file, returning an empty config if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::new());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, toml_string)?;

        Ok(())
    }

    /// Merge this config with another, preferring values from other
    pub fn merge(&mut self, other: &Config) {
        if other.folder.is_some() {
            self.folder = other.folder.clone();
        }
        if other.input_ext.is_some() {
            self.input_ext = other.input_ext.clone();
        }
        if other.output_ext.is_some() {
            self.output_ext = other.output_ext.clone();
        }
        if other.manual.is_some() {
            self.manual = other.manual;
        }
        if other.no_metadata.is_some() {
            self.no_metadata = other.no_metadata;
        }
        if other.avconv.is_some() {
            self.avconv = other.avconv;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.requeue_delay_ms.is_some() {
            self.requeue_delay_ms = other.requeue_delay_ms;
        }
    }

    /// Resolve into settings, filling in defaults
    pub fn settings(&self) -> Settings {
        Settings {
            folder: self.folder.clone().unwrap_or_else(|| PathBuf::from("Music/")),
            input_ext: normalize_ext(self.input_ext.as_deref().unwrap_or(".m4a")),
            output_ext: normalize_ext(self.output_ext.as_deref().unwrap_or(".mp3")),
            manual: self.manual.unwrap_or(false),
            no_metadata: self.no_metadata.unwrap_or(false),
            avconv: self.avconv.unwrap_or(false),
            verbose: self.verbose.unwrap_or(false),
            requeue_delay: Duration::from_millis(self.requeue_delay_ms.unwrap_or(500)),
        }
    }

    /// Print the config in a human-readable format
    pub fn print(&self, title: &str) {
        println!("{}:", title);

        if let Some(folder) = &self.folder {
            println!("  Music folder:       {}", folder.display());
        }
        if let Some(input_ext) = &self.input_ext {
            println!("  Input format:       {}", input_ext);
        }
        if let Some(output_ext) = &self.output_ext {
            println!("  Output format:      {}", output_ext);
        }
        if let Some(manual) = self.manual {
            println!("  Manual selection:   {}", if manual { "enabled" } else { "disabled" });
        }
        if let Some(no_metadata) = self.no_metadata {
            println!("  Metadata tagging:   {}", if no_metadata { "disabled" } else { "enabled" });
        }
        if let Some(avconv) = self.avconv {
            println!("  Transcoder:         {}", if avconv { "avconv" } else { "ffmpeg" });
        }
        if let Some(verbose) = self.verbose {
            println!("  Verbose:            {}", verbose);
        }
        if let Some(delay) = self.requeue_delay_ms {
            println!("  Requeue delay:      {} ms", delay);
        }
    }
}

/// "mp3" and ".mp3" both mean ".mp3"
fn normalize_ext(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
