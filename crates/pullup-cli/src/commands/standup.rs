use chrono::Local;
use clap::Subcommand;
use pullup_core::App;

#[derive(Subcommand)]
pub enum StandupAction {
    /// Show current phase and configured ranges
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Enable the stand-up reminder
    Enable,
    /// Disable the stand-up reminder
    Disable,
}

pub fn run(action: StandupAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now().naive_local();
    let mut app = App::open(now)?;

    match action {
        StandupAction::Status { json } => {
            let config = &app.config().standup;
            let state = app.standup().state();
            if json {
                let row = serde_json::json!({
                    "enabled": config.enabled,
                    "phase": state.phase,
                    "target_at": state.target_at,
                    "sit_minutes": [config.sit_min_minutes, config.sit_max_minutes],
                    "stand_minutes": [config.stand_min_minutes, config.stand_max_minutes],
                });
                println!("{}", serde_json::to_string_pretty(&row)?);
            } else {
                println!(
                    "stand-up reminder: {}",
                    if config.enabled { "enabled" } else { "disabled" }
                );
                println!("phase: {}", serde_json::to_string(&state.phase)?);
                if let Some(target) = state.target_at {
                    println!("next change at {target}");
                }
                println!(
                    "sitting {}-{} min, standing {}-{} min",
                    config.sit_min_minutes,
                    config.sit_max_minutes,
                    config.stand_min_minutes,
                    config.stand_max_minutes,
                );
            }
        }
        StandupAction::Enable => {
            app.set_standup_enabled(true)?;
            println!("stand-up reminder enabled");
        }
        StandupAction::Disable => {
            app.set_standup_enabled(false)?;
            println!("stand-up reminder disabled");
        }
    }
    Ok(())
}
