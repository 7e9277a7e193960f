use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use ringconfig::{parse_size, Variant};

#[derive(Parser, Debug)]
#[command(
    name = "ringshade",
    author,
    version,
    about = "Render the segmented rainbow ring to PNG frames",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags that select and tweak the ring pattern; shared by render and probe.
#[derive(Args, Debug, Clone, Default)]
pub struct PatternArgs {
    /// Ring configuration file (defaults to `ring.toml` in the config directory when present).
    #[arg(long, value_name = "FILE", env = "RINGSHADE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stock ring variant: `fine` (180 segments) or `coarse` (81 segments).
    #[arg(long, value_name = "VARIANT", value_parser = Variant::parse)]
    pub variant: Option<Variant>,

    /// Explicit segment count; overrides `--variant` and the config file.
    ///
    /// Counts that are not a multiple of the visible period (3 by default) leave a seam
    /// where the spacing of drawn segments breaks.
    #[arg(long, value_name = "N")]
    pub segments: Option<u32>,

    /// Frame size in pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub pattern: PatternArgs,

    /// Timestamp (seconds) to evaluate a still frame at, or the start of a sequence.
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    pub time: Option<f32>,

    /// Flatten frames over a solid colour given as `R,G,B` in [0, 1].
    #[arg(long, value_name = "R,G,B", value_parser = parse_background, conflicts_with = "transparent")]
    pub background: Option<[f32; 3]>,

    /// Keep transparent pixels even when the config file sets a background.
    #[arg(long)]
    pub transparent: bool,

    /// Still image destination (defaults to `ring.png` in the data directory).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Render a numbered frame sequence instead of a still (defaults to `frames/` in the data directory).
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pub sequence: Option<Option<PathBuf>>,

    /// Sequence frame rate.
    #[arg(long, value_name = "FPS", requires = "sequence")]
    pub fps: Option<f32>,

    /// Sequence length (`5s`, `1m 30s`, or plain seconds).
    #[arg(long, value_name = "DURATION", value_parser = parse_duration, requires = "sequence")]
    pub duration: Option<Duration>,

    /// Re-render the still whenever the config file changes.
    #[arg(long, conflicts_with = "sequence")]
    pub watch: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the default configuration file and inspect directories.
    Defaults(DefaultsCommand),
    /// Evaluate one texture coordinate and print the result as JSON.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
pub struct DefaultsCommand {
    #[command(subcommand)]
    pub action: DefaultsAction,
}

#[derive(Subcommand, Debug)]
pub enum DefaultsAction {
    /// Print resolved config and data directories.
    Where,
    /// Write the default `ring.toml` into the config directory.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub pattern: PatternArgs,

    /// Horizontal texture coordinate in [0, 1].
    #[arg(long, allow_hyphen_values = true)]
    pub u: f32,

    /// Vertical texture coordinate in [0, 1], origin at the bottom.
    #[arg(long, allow_hyphen_values = true)]
    pub v: f32,

    /// Elapsed time in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0, allow_hyphen_values = true)]
    pub time: f32,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_background(value: &str) -> Result<[f32; 3], String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("background must not be empty".to_string());
    }

    let channels = trimmed
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| format!("invalid background channel '{}'", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let &[r, g, b] = channels.as_slice() else {
        return Err(format!(
            "background needs three channels (R,G,B), got {}",
            channels.len()
        ));
    };

    if [r, g, b]
        .iter()
        .any(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
    {
        return Err("background channels must lie in [0, 1]".to_string());
    }
    Ok([r, g, b])
}

pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let duration = match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            Duration::try_from_secs_f64(seconds)
                .map_err(|err| format!("invalid duration '{trimmed}': {err}"))?
        }
        Ok(_) => return Err("duration must be a non-negative number of seconds".to_string()),
        Err(_) => humantime::parse_duration(trimmed)
            .map_err(|err| format!("invalid duration '{trimmed}': {err}"))?,
    };

    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
