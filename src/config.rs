use crate::error::Error;
use crate::opts::ConvertOpts;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "SEG2SU_CONFIG";

/// Scale factors applied while decoding SEG-2 positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReadOptions {
    /// Written to `scalco`, follows the header scale convention
    pub coordinate_scale: i16,

    /// Positive elevation multiplier, `scalel` holds its negation
    pub elevation_scale: i16,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            coordinate_scale: 1,
            elevation_scale: 1,
        }
    }
}

impl ReadOptions {
    pub fn new(coordinate_scale: i16, elevation_scale: i16) -> Result<Self, Error> {
        let opts = Self {
            coordinate_scale,
            elevation_scale,
        };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.elevation_scale < 1 {
            return Err(Error::InvalidOption(format!(
                "elevation scale must be at least 1, got {}",
                self.elevation_scale
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConvertConfig {
    #[serde(flatten)]
    pub read: ReadOptions,

    /// Where converted files go, next to each input when unset
    pub output_dir: Option<PathBuf>,

    /// SEG-2 files to convert
    pub inputs: Vec<PathBuf>,
}

impl ConvertConfig {
    pub fn try_from_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(Error::ConfigRead)?;
        let cfg: ConvertConfig = toml::from_str(&content)?;
        Ok(cfg)
    }

    /// Loads the configuration file named by the options or by
    /// `SEG2SU_CONFIG`, then lets every option that is set override it.
    pub fn load_merge_with_opts(opts: ConvertOpts) -> Result<Self, Error> {
        let cfg = if let Some(cfg_path) = &opts.config_file {
            Self::try_from_file(cfg_path)?
        } else if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
            Self::try_from_file(Path::new(&env_path))?
        } else {
            Self::default()
        };

        let read = ReadOptions::new(
            opts.coordinate_scale.unwrap_or(cfg.read.coordinate_scale),
            opts.elevation_scale.unwrap_or(cfg.read.elevation_scale),
        )?;

        Ok(Self {
            read,
            output_dir: opts.output_dir.or(cfg.output_dir),
            inputs: cfg.inputs,
        })
    }

    /// Destination of the SU file converted from `input`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let name = Path::new(input.file_name().unwrap_or_default()).with_extension("su");
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => input.with_extension("su"),
        }
    }
}
