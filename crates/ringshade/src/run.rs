use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use renderer::{
    BoxedTimeSource, FixedTimeSource, FrameUniforms, PixelCoord, RenderPolicy, RenderReport,
    Renderer, RendererConfig, RingPattern, SystemTimeSource,
};
use ringconfig::RingConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::bindings::{resolve_pattern, resolve_settings, RenderSettings};
use crate::bootstrap::{bootstrap_filesystem, load_config};
use crate::cli::{ProbeArgs, RunArgs};
use crate::paths::AppPaths;
use crate::watch::ConfigWatcher;

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    bootstrap_filesystem(&paths)?;
    let loaded = load_config(args.pattern.config.as_deref(), &paths)?;
    let settings = resolve_settings(&args, &loaded.config)?;
    tracing::debug!(
        config = %paths.config_dir().display(),
        data = %paths.data_dir().display(),
        source = ?loaded.source,
        segments = settings.params.segments,
        size = ?settings.size,
        "resolved ringshade settings"
    );

    if args.watch {
        let Some(source) = loaded.source else {
            bail!(
                "--watch needs a config file; pass --config or run `ringshade defaults init` first"
            );
        };
        return run_watch(&args, &paths, source, settings);
    }

    let sequence_dir = args
        .sequence
        .as_ref()
        .map(|dir| dir.clone().unwrap_or_else(|| paths.default_sequence_dir()));
    let policy = match &sequence_dir {
        Some(directory) => RenderPolicy::Sequence {
            start: args.time.unwrap_or(0.0),
            duration: settings.duration.as_secs_f32(),
            fps: settings.fps,
            directory: directory.clone(),
        },
        None => RenderPolicy::Still {
            time: args.time.unwrap_or(0.0),
            path: output_path(&args, &paths),
        },
    };

    let report = render(&settings, policy)?;
    for path in &report.written {
        tracing::debug!(path = %path.display(), "wrote frame");
    }
    match &sequence_dir {
        Some(directory) => println!(
            "Wrote {} frames to {}",
            report.frames(),
            directory.display()
        ),
        None => {
            if let Some(path) = report.written.first() {
                println!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn output_path(args: &RunArgs, paths: &AppPaths) -> PathBuf {
    args.output.clone().unwrap_or_else(|| paths.default_output())
}

fn render(settings: &RenderSettings, policy: RenderPolicy) -> Result<RenderReport> {
    let mut renderer = Renderer::new(RendererConfig {
        surface_size: settings.size,
        params: settings.params,
        surface_alpha: settings.surface_alpha,
        policy,
    });
    renderer.run()
}

fn run_watch(
    args: &RunArgs,
    paths: &AppPaths,
    config_path: PathBuf,
    mut settings: RenderSettings,
) -> Result<()> {
    let output = output_path(args, paths);
    let mut clock: BoxedTimeSource = match args.time {
        Some(time) => Box::new(FixedTimeSource::new(time)),
        None => Box::new(SystemTimeSource::new()),
    };

    let watcher = ConfigWatcher::new(&config_path)?;
    render_still(&settings, &mut clock, &output)?;
    tracing::info!(
        config = %config_path.display(),
        output = %output.display(),
        "watching config for changes (Ctrl-C to stop)"
    );

    while watcher.wait_for_change() {
        tracing::info!("config changed; re-rendering");
        let reloaded = RingConfig::load(&config_path)
            .map_err(anyhow::Error::from)
            .and_then(|config| resolve_settings(args, &config));
        match reloaded {
            Ok(next) => settings = next,
            Err(err) => {
                let message = format!("{err:#}");
                tracing::warn!(error = %message, "failed to reload config; keeping previous frame");
                continue;
            }
        }
        if let Err(err) = render_still(&settings, &mut clock, &output) {
            let message = format!("{err:#}");
            tracing::warn!(error = %message, "re-render failed");
        }
    }

    tracing::info!("config watcher closed");
    Ok(())
}

fn render_still(
    settings: &RenderSettings,
    clock: &mut BoxedTimeSource,
    output: &Path,
) -> Result<()> {
    let time = clock.sample().seconds;
    render(
        settings,
        RenderPolicy::Still {
            time,
            path: output.to_path_buf(),
        },
    )
    .with_context(|| format!("failed to render still at t={time:.3}s"))?;
    println!("Wrote {} (t={time:.3}s)", output.display());
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub u: f32,
    pub v: f32,
    pub time: f32,
    pub resolution: [u32; 2],
    pub segments: u32,
    pub segment: Option<u32>,
    pub visible: bool,
    pub distance: Option<f32>,
    pub inner_radius: Option<f32>,
    pub outer_radius: Option<f32>,
    pub rgba: [f32; 4],
    pub rgba8: [u8; 4],
}

pub fn probe(args: ProbeArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let loaded = load_config(args.pattern.config.as_deref(), &paths)?;
    let report = build_probe(&args, &loaded.config)?;
    let json = serde_json::to_string_pretty(&report).context("failed to encode probe result")?;
    println!("{json}");
    Ok(())
}

pub fn build_probe(args: &ProbeArgs, config: &RingConfig) -> Result<ProbeReport> {
    let (params, (width, height)) = resolve_pattern(&args.pattern, config)?;
    let pattern = RingPattern::new(params);
    let uniforms = FrameUniforms::at_time(width, height, args.time);
    let coord = PixelCoord::new(args.u, args.v);

    let sample = pattern.sample(coord, &uniforms);
    let colour = pattern.evaluate(coord, &uniforms);

    Ok(ProbeReport {
        u: args.u,
        v: args.v,
        time: args.time,
        resolution: [width, height],
        segments: params.segments,
        segment: sample.map(|s| s.index),
        visible: !colour.is_transparent(),
        distance: sample.map(|s| s.dist),
        inner_radius: sample.map(|s| s.inner_radius),
        outer_radius: sample.map(|s| s.outer_radius),
        rgba: [colour.r, colour.g, colour.b, colour.a],
        rgba8: colour.to_rgba8(),
    })
}
