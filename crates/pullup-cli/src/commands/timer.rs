use std::io::Write;
use std::time::Duration;

use chrono::Local;
use clap::Subcommand;
use pullup_core::{App, Event};

#[derive(Subcommand)]
pub enum TimerAction {
    /// List a workout's timers
    List { workout: String },
    /// Run a countdown in the foreground
    Run {
        workout: String,
        /// Timer id or name; defaults to the first defined timer
        timer: Option<String>,
        /// Stop after the first completion even for repeating timers
        #[arg(long)]
        once: bool,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now().naive_local();
    let mut app = App::open(now)?;

    match action {
        TimerAction::List { workout } => {
            let w = app
                .scheduler()
                .get(&workout)
                .ok_or_else(|| format!("unknown workout '{workout}'"))?;
            if w.timers.is_empty() {
                println!("no timers defined");
            }
            for timer in &w.timers {
                println!(
                    "{:<36} {:<16} {}s{}",
                    timer.id,
                    timer.name,
                    timer.duration_secs,
                    if timer.repeating { " (repeating)" } else { "" },
                );
            }
        }
        TimerAction::Run {
            workout,
            timer,
            once,
        } => {
            app.select_workout(Some(&workout), now);
            if app.current_workout().is_none() {
                return Err(format!("unknown workout '{workout}'").into());
            }
            let timer_id = resolve_timer_id(&app, timer.as_deref())
                .ok_or("workout has no matching timer")?;
            let started = app
                .start_timer(&timer_id, now)
                .ok_or("timer failed to start")?;
            if let Event::TimerStarted {
                name,
                duration_secs,
                ..
            } = &started
            {
                println!("{name}: {duration_secs}s");
            }

            loop {
                std::thread::sleep(Duration::from_secs(1));
                let now = Local::now().naive_local();
                match app.tick_timer(now) {
                    Some(Event::TimerFinished {
                        name, restarted, ..
                    }) => {
                        print!("\x07");
                        println!("\r{name}: done");
                        if !restarted || once {
                            break;
                        }
                    }
                    _ => {
                        let remaining = app
                            .timers()
                            .runtime(&timer_id)
                            .map(|rt| rt.remaining_secs)
                            .unwrap_or(0);
                        print!("\r{remaining:>5}s ");
                        std::io::stdout().flush().ok();
                    }
                }
            }
        }
    }
    Ok(())
}

fn resolve_timer_id(app: &App, wanted: Option<&str>) -> Option<String> {
    let defs = app.timers().defs();
    match wanted {
        None => defs.first().map(|d| d.id.clone()),
        Some(key) => defs
            .iter()
            .find(|d| d.id == key || d.name.eq_ignore_ascii_case(key))
            .map(|d| d.id.clone()),
    }
}
