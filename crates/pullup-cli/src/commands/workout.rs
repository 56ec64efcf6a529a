use chrono::Local;
use clap::Subcommand;
use pullup_core::{App, DayCode, TimerDef, Workout};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// List workouts with today's status
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one workout with resolved exercises
    Show { id: String },
    /// Mark a workout completed (repeating workouts reschedule instead)
    Complete { id: String },
    /// Add a workout definition
    Add {
        #[arg(long)]
        title: String,
        /// Fixed time of day, HH:MM (ignored with --repeating)
        #[arg(long, default_value = "09:00")]
        time: String,
        /// Comma-separated day codes (Mon,Tue,...); empty = every day
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,
        /// Fire on a rolling interval instead of a fixed time
        #[arg(long)]
        repeating: bool,
        /// Interval in minutes for repeating workouts
        #[arg(long, default_value = "60")]
        every: u32,
        /// Exercise template line; repeat the flag for multiple lines
        #[arg(long = "exercise")]
        exercises: Vec<String>,
        /// Category id from the settings
        #[arg(long)]
        category: Option<String>,
    },
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now().naive_local();
    let mut app = App::open(now)?;

    match action {
        WorkoutAction::List { json } => {
            let rows: Vec<serde_json::Value> = app
                .scheduler()
                .workouts()
                .map(|w| {
                    let status = app.status(&w.id, now);
                    let when = if w.repeating {
                        format!("every {}m", w.repeat_interval_minutes)
                    } else {
                        w.time.clone()
                    };
                    let days = w
                        .days
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    serde_json::json!({
                        "id": w.id,
                        "title": w.title,
                        "when": when,
                        "days": days,
                        "status": status,
                    })
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("no workouts configured (try `pullup-cli seed import`)");
            } else {
                for row in &rows {
                    println!(
                        "{:<36} {:<10} {:<12} {:<16} {}",
                        row["id"].as_str().unwrap_or(""),
                        row["when"].as_str().unwrap_or(""),
                        row["status"]
                            .as_str()
                            .unwrap_or("unknown"),
                        row["days"].as_str().unwrap_or(""),
                        row["title"].as_str().unwrap_or(""),
                    );
                }
            }
        }
        WorkoutAction::Show { id } => {
            let workout = app
                .scheduler()
                .get(&id)
                .ok_or_else(|| format!("unknown workout '{id}'"))?
                .clone();
            println!("{} ({})", workout.title, workout.id);
            if workout.repeating {
                println!("repeats every {} minutes", workout.repeat_interval_minutes);
            } else {
                println!("at {}", workout.time);
            }
            if !workout.days.is_empty() {
                let days = workout
                    .days
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("on {days}");
            }
            if let Some(status) = app.status(&id, now) {
                println!("status: {}", serde_json::to_string(&status)?);
            }
            for line in app.resolved_exercises(&id) {
                println!("  - {line}");
            }
            for timer in &workout.timers {
                println!(
                    "  timer {}: {}s{} ({})",
                    timer.name,
                    timer.duration_secs,
                    if timer.repeating { ", repeating" } else { "" },
                    timer.id,
                );
            }
        }
        WorkoutAction::Complete { id } => {
            let event = app
                .complete(&id, now)
                .ok_or_else(|| format!("unknown workout '{id}'"))?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        WorkoutAction::Add {
            title,
            time,
            days,
            repeating,
            every,
            exercises,
            category,
        } => {
            let days = days
                .iter()
                .filter(|d| !d.is_empty())
                .map(|d| d.parse::<DayCode>())
                .collect::<Result<Vec<_>, _>>()?;
            let default_secs = app.config().timer.default_duration_secs.max(1);
            let workout = Workout {
                id: Uuid::new_v4().to_string(),
                title,
                category,
                time,
                days,
                repeating,
                repeat_interval_minutes: every,
                exercises,
                timers: vec![TimerDef {
                    id: Uuid::new_v4().to_string(),
                    name: "Rest".to_string(),
                    duration_secs: default_secs,
                    repeating: true,
                }],
            };
            let id = workout.id.clone();
            app.add_workout(workout, now)?;
            println!("added workout {id}");
        }
    }
    Ok(())
}
