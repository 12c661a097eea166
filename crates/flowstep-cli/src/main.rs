mod common;
mod host;
mod stepper;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use flowstep_core::error::{Error, Result};
use flowstep_runtime::{demo, parse_switch, StartupConfig, Value, WindowEvent};

/// Environment variable holding the log filter, e.g. `FLOWSTEP_LOG=debug`.
const LOG_ENV: &str = "FLOWSTEP_LOG";

#[derive(Parser, Debug)]
#[command(name = "flowstep", version, about = "Run the flowstep demo loop, natively or host-driven")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the label demo until it quits
    Run(RunArgs),
    /// Step the label demo interactively from stdin
    Step(StepArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Drive the loop from this process instead of the blocking main loop
    #[arg(long = "slave")]
    slave: bool,

    /// JSON start-up configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Maximum number of frames before giving up
    #[arg(short = 'f', long = "frames", default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// Seconds of virtual time after which the demo quits
    #[arg(short = 'q', long = "quit-after", default_value_t = 1.0)]
    quit_after: f64,

    /// Key presses queued before the first frame (repeatable)
    #[arg(short = 'k', long = "key", action = ArgAction::Append)]
    keys: Vec<String>,

    /// Print the label text after every frame (host-driven mode only)
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,

    /// Print a JSON summary instead of text
    #[arg(long = "json", default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct StepArgs {
    /// JSON start-up configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    mode: &'static str,
    /// `None` when the frame budget ran out first
    returned: Option<Value>,
    frames: u64,
    text: String,
    keys: Vec<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn render_error(err: &Error) {
    eprintln!("{}: {}", "error".red().bold(), err.msg.red());
    if let Some(frame) = err.frame {
        eprintln!("  --> frame {}", frame);
    }
    common::provide_error_suggestions(&err.msg);
}

/// Builds the start-up configuration: file first, then the environment
/// switch, then the `--slave` flag.
fn load_config(path: Option<&Path>, slave_flag: bool) -> Result<StartupConfig> {
    let mut config = match path {
        Some(p) => StartupConfig::from_path(p)?,
        None => StartupConfig::default(),
    };
    if let Ok(raw) = std::env::var(StartupConfig::SLAVE_MODE_ENV) {
        config.slave_mode = parse_switch(&raw).ok_or_else(|| {
            Error::new(format!(
                "Invalid value for {}: '{}' (expected 1/0, true/false, yes/no, on/off)",
                StartupConfig::SLAVE_MODE_ENV,
                raw
            ))
        })?;
    }
    if slave_flag {
        config.slave_mode = true;
    }
    Ok(config)
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref(), args.slave)?;
    if !config.slave_mode && config.max_frames.is_none() {
        config.max_frames = Some(args.frames);
    }
    let slave_mode = config.slave_mode;

    let mut ev = demo::build(config, Some(args.quit_after))?;
    let queue = ev.events();
    for key in &args.keys {
        queue.post(WindowEvent::Key(key.clone()));
    }

    let returned = if slave_mode {
        ev.start()?;
        let verbose = args.verbose;
        host::drive_frames(&mut ev, args.frames, |ev| {
            if verbose {
                println!("{} {}: {}", "frame".bright_black(), ev.frames(), ev.state().text);
            }
        })
    } else {
        Some(ev.run()?)
    };

    let frames = ev.frames();
    let label = ev.into_state();
    let summary = RunSummary {
        mode: if slave_mode { "slave" } else { "blocking" },
        returned,
        frames,
        text: label.text,
        keys: label.keys,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| Error::new(format!("Failed to serialize summary: {}", e)))?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("{} {}", "mode:".yellow(), summary.mode);
    match &summary.returned {
        Some(value) => println!("{} {}", "returned:".green().bold(), value),
        None => println!("{} {}", "stopped:".yellow().bold(), "frame limit reached"),
    }
    println!("{} {}", "frames:".yellow(), summary.frames);
    println!("{} {}", "text:".yellow(), summary.text);
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Run(args)) => run(args),
        Some(Command::Step(args)) => stepper::start(args.config.as_deref()),
        None => stepper::start(None),
    };
    if let Err(e) = result {
        render_error(&e);
        std::process::exit(1);
    }
}
