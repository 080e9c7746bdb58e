use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConvertOpts {
    /// Use configuration from file
    #[clap(
        long = "config",
        name = "config file",
        env = "SEG2SU_CONFIG",
        help_heading = "CONVERSION CONFIGURATION"
    )]
    pub config_file: Option<PathBuf>,

    /// Coordinate scale factor written to scalco. Negative values divide,
    /// positive values multiply, 0 and 1 leave coordinates unscaled
    #[clap(
        long,
        allow_negative_numbers = true,
        help_heading = "CONVERSION CONFIGURATION"
    )]
    pub coordinate_scale: Option<i16>,

    /// Elevation multiplier, scalel is written as its negation
    #[clap(long, help_heading = "CONVERSION CONFIGURATION")]
    pub elevation_scale: Option<i16>,

    /// Directory for the .su files, defaults to the directory of each input
    #[clap(long, help_heading = "CONVERSION CONFIGURATION")]
    pub output_dir: Option<PathBuf>,
}
