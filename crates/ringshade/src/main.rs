mod bindings;
mod bootstrap;
mod cli;
mod defaults;
mod paths;
mod run;
mod watch;

use anyhow::Result;
use cli::{Command, DefaultsAction};
use defaults::{describe_paths, init_default_config};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Defaults(defaults_cmd)) => handle_defaults_command(defaults_cmd.action),
        Some(Command::Probe(args)) => run::probe(args),
        None => run::run(cli.run),
    }
}

fn handle_defaults_command(action: DefaultsAction) -> Result<()> {
    let paths = AppPaths::discover()?;

    match action {
        DefaultsAction::Where => run_defaults_where(&paths),
        DefaultsAction::Init { force } => run_defaults_init(&paths, force),
    }
}

fn run_defaults_init(paths: &AppPaths, force: bool) -> Result<()> {
    bootstrap::bootstrap_filesystem(paths)?;
    let report = init_default_config(paths, force)?;

    if !report.written {
        println!(
            "Config already present at {} (use --force to replace it)",
            report.path.display()
        );
    } else if report.replaced {
        println!("Replaced config at {}", report.path.display());
    } else {
        println!("Wrote default config to {}", report.path.display());
    }
    Ok(())
}

fn run_defaults_where(paths: &AppPaths) -> Result<()> {
    let overview = describe_paths(paths);
    println!("Configuration directories:");
    println!("  config:     {}", overview.config_dir.display());
    println!("  data:       {}", overview.data_dir.display());
    println!(
        "  ring.toml:  {} ({})",
        overview.config_file.display(),
        if overview.config_present {
            "present"
        } else {
            "missing"
        }
    );
    println!("Default outputs:");
    println!("  still:      {}", overview.default_output.display());
    println!("  sequence:   {}", overview.default_sequence_dir.display());
    Ok(())
}
