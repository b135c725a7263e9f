//! Command-line interface (spec.md §6.1), built with `clap`'s derive API.
//! The flag table matches the spec exactly; GUI and ASCII share one struct,
//! differing only in their default `width`/`height` (picked after parsing,
//! since `clap` defaults are static).

use clap::Parser;

use crate::error::Error;
use crate::plane::PlaneConfig;
use crate::xy::XY;

#[derive(Parser, Debug)]
#[command(
    name = "fractal-explorer",
    version = env!("MANDEL_FULL_VERSION"),
    about = "Interactive escape-time fractal (Mandelbrot/Julia) explorer",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Run the headless ASCII backend instead of the GUI.
    #[arg(long)]
    pub ascii: bool,

    #[arg(long = "width", short = 'w')]
    pub width: Option<u32>,

    #[arg(long = "height", short = 'h')]
    pub height: Option<u32>,

    #[arg(long = "help", short = 'H', action = clap::ArgAction::Help)]
    help: Option<bool>,

    #[arg(long = "version", short = 'V', action = clap::ArgAction::Version)]
    version: Option<bool>,

    #[arg(long = "center_x", short = 'x', default_value_t = -0.5)]
    pub center_x: f64,

    #[arg(long = "center_y", short = 'y', default_value_t = 0.0)]
    pub center_y: f64,

    #[arg(long = "from", short = 'f', default_value_t = -2.5)]
    pub from: f64,

    #[arg(long = "to", short = 't')]
    pub to: Option<f64>,

    #[arg(long = "function", short = 'j', default_value_t = 0)]
    pub function: usize,

    #[arg(long = "seed_x", short = 'r', default_value_t = -1.25643)]
    pub seed_x: f64,

    #[arg(long = "seed_y", short = 'i', default_value_t = -0.381086)]
    pub seed_y: f64,

    #[arg(long = "threads", short = 'c')]
    pub threads: Option<u32>,

    #[arg(long = "halt_after", short = 'a', default_value_t = 0)]
    pub halt_after: u64,

    #[arg(long = "skip_rounds", short = 's', default_value_t = 0)]
    pub skip_rounds: u32,
}

impl Cli {
    /// Validates parsed flags and resolves the defaults that differ between
    /// the GUI and ASCII backends into a concrete [`PlaneConfig`].
    pub fn into_plane_config(self) -> Result<PlaneConfig, Error> {
        let width = self.width.unwrap_or(if self.ascii { 79 } else { 800 });
        let height = self.height.unwrap_or(if self.ascii { 24 } else { width * 3 / 4 });
        let to = self.to.unwrap_or(self.from + 4.0);
        let threads = self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1).max(1) as u32)
                .unwrap_or(1)
        });

        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig("width and height must be positive".into()));
        }
        if threads == 0 {
            return Err(Error::InvalidConfig("threads must be positive".into()));
        }
        for (name, value) in [
            ("center_x", self.center_x),
            ("center_y", self.center_y),
            ("from", self.from),
            ("to", to),
            ("seed_x", self.seed_x),
            ("seed_y", self.seed_y),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{name} must be a finite number")));
            }
        }

        let span = to - self.from;
        if span <= 0.0 {
            return Err(Error::InvalidConfig("to must be greater than from".into()));
        }
        let resolution_x = span / width as f64;
        let resolution_y = resolution_x;

        Ok(PlaneConfig {
            width,
            height,
            center: XY::new(self.center_x, self.center_y),
            resolution_x,
            resolution_y,
            function_index: self.function % 2,
            seed: XY::new(self.seed_x, self.seed_y),
            skip_rounds: self.skip_rounds,
            halt_after: self.halt_after,
            num_threads: threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["fractal-explorer"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn gui_defaults_match_spec_table() {
        let config = parse(&[]).into_plane_config().unwrap();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.center.x, -0.5);
        assert_eq!(config.seed.x, -1.25643);
    }

    #[test]
    fn ascii_defaults_differ_from_gui() {
        let config = parse(&["--ascii"]).into_plane_config().unwrap();
        assert_eq!(config.width, 79);
        assert_eq!(config.height, 24);
    }

    #[test]
    fn non_finite_center_is_rejected() {
        let cli = parse(&["--center_x", "nan"]);
        assert!(cli.into_plane_config().is_err());
    }

    #[test]
    fn zero_width_is_rejected() {
        let cli = parse(&["--width", "0"]);
        assert!(cli.into_plane_config().is_err());
    }
}
