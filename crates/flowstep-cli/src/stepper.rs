use std::io::{self, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use flowstep_core::error::Result;
use flowstep_core::{DrivenLoop, FlowSignal};
use flowstep_runtime::demo::{self, Label};
use flowstep_runtime::{EventLoop, Value, WindowEvent};

use crate::load_config;

pub fn start(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, true)?;
    let mut ev = demo::build(config, None)?;
    ev.start()?;

    println!("{}", "flowstep stepper. Type :help for help, :exit to leave.".bold().green());

    loop {
        print!("{}", "step> ".cyan());
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => { println!("<input error>"); break; }
        };
        if n == 0 { // EOF
            println!("\nGoodbye.");
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, rest)) = words.split_first() else { continue };

        match cmd {
            ":exit" | ":q" => { println!("Goodbye."); break; }
            ":help" | ":h" => print_help(),
            ":idle" => {
                let count = parse_count(rest.first().copied());
                for _ in 0..count { ev.idle(); }
                print_clock(&ev);
            }
            ":poll" => {
                let signal = ev.poll();
                print_signal(&signal);
            }
            ":drain" => drain(&mut ev),
            ":frame" => {
                let count = parse_count(rest.first().copied());
                for _ in 0..count {
                    if ev.is_finished() { break; }
                    ev.idle();
                    drain(&mut ev);
                }
            }
            ":post" => match parse_event(rest) {
                Some(event) => { ev.events().post(event); println!("{} ({} pending)", "posted".yellow(), ev.events().len()); }
                None => println!("{}", "Usage: :post key <name> | :post resize <w> <h> | :post custom <name>".red()),
            },
            ":pause" => ev.events().post(WindowEvent::Pause),
            ":resume" => ev.events().post(WindowEvent::Resume),
            ":quit" => {
                let value = match rest.first() {
                    Some(raw) => raw.parse::<i64>().map(Value::Int).unwrap_or_else(|_| Value::Str(raw.to_string())),
                    None => Value::Unit,
                };
                ev.stop(value);
            }
            ":state" => print_state(&ev),
            ":reset" => { ev.reset(); println!("{}", "Loop reset.".yellow()); }
            _ => println!("{}", "Unknown command. Type :help.".red()),
        }
    }
    Ok(())
}

fn print_help() {
    println!("{}", "Commands:".bold());
    for (cmd, what) in [
        (":idle [n]", "Run n frames without draining events"),
        (":poll", "Poll the window once and show the signal"),
        (":drain", "Poll until the window breaks or returns"),
        (":frame [n]", "Run n full frames (idle + drain)"),
        (":post key <k>", "Queue a key press (escape finishes the loop)"),
        (":post resize <w> <h>", "Queue a resize"),
        (":post custom <name>", "Queue a custom event"),
        (":pause / :resume", "Queue a pause or resume event"),
        (":quit [v]", "Queue a quit event returning v"),
        (":state", "Show label, clock and window state"),
        (":reset", "Make a finished loop pollable again"),
        (":exit", "Leave the stepper"),
    ] {
        println!("  {:<22} {}", cmd.yellow(), what);
    }
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(1)
}

fn parse_event(words: &[&str]) -> Option<WindowEvent> {
    match words {
        ["key", k] => Some(WindowEvent::Key(k.to_string())),
        ["resize", w, h] => Some(WindowEvent::Resize { width: w.parse().ok()?, height: h.parse().ok()? }),
        ["custom", name] => Some(WindowEvent::Custom(name.to_string(), Value::Unit)),
        _ => None,
    }
}

fn drain(ev: &mut EventLoop<Label>) {
    let mut handled = 0;
    loop {
        match ev.poll() {
            FlowSignal::Continue => { handled += 1; continue; }
            signal => {
                if handled > 0 { println!("{} {}", "handled".bright_black(), handled); }
                print_signal(&signal);
                break;
            }
        }
    }
}

fn print_signal(signal: &FlowSignal<Value>) {
    match signal {
        FlowSignal::Continue => println!("{}", "continue".cyan()),
        FlowSignal::Break => println!("{}", "break".yellow()),
        FlowSignal::Return(value) => {
            println!("{} {}", "returned:".green().bold(), value);
            println!("{}", "Loop finished. Use :reset to keep stepping.".bright_black());
        }
    }
}

fn print_clock(ev: &EventLoop<Label>) {
    println!("{}: {}  {}: {}  {}: {:.3}s", "frame".yellow(), ev.frames(), "ticks".yellow(), ev.clock().frames(), "time".yellow(), ev.clock().time());
}

fn print_state(ev: &EventLoop<Label>) {
    let label = ev.state();
    print_clock(ev);
    println!("{}: {}", "text".yellow(), label.text);
    println!("{}: {}", "keys".yellow(), if label.keys.is_empty() { "<none>".to_string() } else { label.keys.join(", ") });
    println!("{}: {}", "paused".yellow(), ev.window().is_paused());
    println!("{}: {}", "pending".yellow(), ev.events().len());
    println!("{}: {}", "finished".yellow(), ev.is_finished());
}
