use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pullup-cli", version, about = "Pullup Alert CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Workout overview and completion
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Run the reminder poll loop
    Watch {
        /// Poll interval in seconds
        #[arg(long, default_value = "1")]
        interval_secs: u64,
        /// Stop after this many ticks (0 = run until interrupted)
        #[arg(long, default_value = "0")]
        ticks: u64,
    },
    /// Rest timers for a workout
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Stand-up reminder control
    Standup {
        #[command(subcommand)]
        action: commands::standup::StandupAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Seed data import
    Seed {
        #[command(subcommand)]
        action: commands::seed::SeedAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Workout { action } => commands::workout::run(action),
        Commands::Watch {
            interval_secs,
            ticks,
        } => commands::watch::run(interval_secs, ticks),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Standup { action } => commands::standup::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Seed { action } => commands::seed::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
