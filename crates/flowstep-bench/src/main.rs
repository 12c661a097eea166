use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;

use flowstep_core::{drive_nested, DriveOutcome, DrivenLoop, FlowSignal};
use flowstep_runtime::{demo, EventLoop, StartupConfig, Value, WindowEvent};

#[derive(Parser, Debug)]
#[command(name = "flowstep-bench", about = "Run flowstep loop benchmarks")]
struct Cli {
    /// Scenario(s) to run. If omitted, runs all of them.
    #[arg(short = 's', long = "scenario", value_enum, action = ArgAction::Append)]
    scenarios: Vec<Scenario>,

    /// Iterations per scenario (measured)
    #[arg(short = 'n', long = "iterations", default_value_t = 10)]
    iterations: u32,

    /// Warmup iterations (not measured)
    #[arg(short = 'w', long = "warmup", default_value_t = 2)]
    warmup: u32,

    /// Output JSON file path; default: benchmark/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// List scenarios and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// 600 host-driven frames of the label demo with an empty window
    Idle,
    /// 10 000 queued key events drained in one frame
    Events,
    /// 100 000 polls of a closure adapter through drive_nested
    Nested,
    /// The label demo in the blocking main loop for 600 frames
    Blocking,
}

impl Scenario {
    const ALL: [Scenario; 4] = [Scenario::Idle, Scenario::Events, Scenario::Nested, Scenario::Blocking];

    fn name(self) -> &'static str {
        match self {
            Scenario::Idle => "idle",
            Scenario::Events => "events",
            Scenario::Nested => "nested",
            Scenario::Blocking => "blocking",
        }
    }

    /// Runs the scenario once and returns how many polls it issued.
    fn run(self) -> u64 {
        match self {
            Scenario::Idle => {
                let mut ev = demo::build(StartupConfig::slave(), None).expect("demo config");
                ev.start().expect("slave start");
                let mut polls = 0;
                for _ in 0..600 {
                    ev.idle();
                    loop {
                        polls += 1;
                        match ev.poll() {
                            FlowSignal::Continue => continue,
                            FlowSignal::Break | FlowSignal::Return(_) => break,
                        }
                    }
                }
                polls
            }
            Scenario::Events => {
                let mut ev: EventLoop<u64> = EventLoop::new(StartupConfig::slave(), 0).expect("config");
                ev.start().expect("slave start");
                ev.on_event(|count, _| {
                    *count += 1;
                    FlowSignal::Continue
                });
                let queue = ev.events();
                for i in 0..10_000 {
                    queue.post(WindowEvent::Key(format!("k{}", i % 26)));
                }
                queue.post(WindowEvent::Quit(Value::Unit));
                ev.idle();
                let drive = drive_nested(&mut ev, usize::MAX);
                assert_eq!(drive.outcome, DriveOutcome::Returned(Value::Unit));
                drive.stats.polls as u64
            }
            Scenario::Nested => {
                let mut calls = 0u64;
                let mut adapter = || {
                    calls += 1;
                    match calls {
                        100_000 => FlowSignal::Return(calls),
                        n if n % 10 == 0 => FlowSignal::Break,
                        _ => FlowSignal::Continue,
                    }
                };
                let drive = drive_nested(&mut adapter, usize::MAX);
                drive.stats.polls as u64
            }
            Scenario::Blocking => {
                let config = StartupConfig { max_frames: Some(600), ..StartupConfig::default() };
                let mut ev = demo::build(config, None).expect("demo config");
                ev.run().expect("blocking run");
                ev.frames()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    polls: u64,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    polls_per_sec: f64,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    flowstep_version: String,
    benchmarks: Vec<BenchResult>,
}

fn workspace_root() -> PathBuf {
    // crates/flowstep-bench -> crates -> root
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent().unwrap()
        .parent().unwrap()
        .to_path_buf()
}

fn measure(scenario: Scenario, iterations: u32, warmup: u32) -> (Vec<f64>, u64) {
    for _ in 0..warmup {
        scenario.run();
    }

    let mut totals = Vec::with_capacity(iterations as usize);
    let mut polls = 0;
    for _ in 0..iterations {
        let t0 = Instant::now();
        polls = scenario.run();
        totals.push(dur_ms(t0.elapsed()));
    }
    (totals, polls)
}

fn dur_ms(d: std::time::Duration) -> f64 { d.as_secs_f64() * 1000.0 }

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = if vals.is_empty() { 0.0 } else { vals.iter().sum::<f64>() / (vals.len() as f64) };
    (avg, min, max)
}

fn ensure_dir(p: &Path) {
    if let Err(e) = fs::create_dir_all(p) {
        panic!("Failed to create {}: {}", p.display(), e);
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        println!("Scenarios:");
        for s in Scenario::ALL { println!("- {}", s.name()); }
        return;
    }

    let scenarios: Vec<Scenario> = if cli.scenarios.is_empty() { Scenario::ALL.to_vec() } else { cli.scenarios.clone() };
    if cli.iterations == 0 {
        eprintln!("--iterations must be at least 1.");
        std::process::exit(2);
    }

    let mut results = Vec::new();

    for scenario in scenarios {
        let (totals, polls) = measure(scenario, cli.iterations, cli.warmup);
        let (avg, min, max) = stats(&totals);
        let polls_per_sec = if avg > 0.0 { polls as f64 / (avg / 1000.0) } else { 0.0 };

        println!(
            "{:>10}: avg={:.3}ms min={:.3}ms max={:.3}ms | polls={} ({:.0}/s)",
            scenario.name(), avg, min, max, polls, polls_per_sec
        );

        results.push(BenchResult {
            name: scenario.name().to_string(),
            iterations: cli.iterations,
            polls,
            avg_total_ms: avg,
            min_total_ms: min,
            max_total_ms: max,
            polls_per_sec,
        });
    }

    let out_path = if let Some(p) = cli.output.clone() {
        p
    } else {
        let results_dir = workspace_root().join("benchmark/results");
        ensure_dir(&results_dir);
        // Windows-safe filename timestamp
        let ts_file = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
        results_dir.join(format!("{}.json", ts_file))
    };

    let doc = OutputDoc {
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        flowstep_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };

    let json = serde_json::to_string_pretty(&doc).expect("serialize json");
    if let Some(parent) = out_path.parent() { ensure_dir(parent); }
    fs::write(&out_path, json).expect("write results json");

    println!("\nSaved results to {}", out_path.display());
}
