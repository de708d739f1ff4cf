use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mindwell-cli", version, about = "Mindwell CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guided session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Mood tracking
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Journaling
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Goal tracking
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Support resource directory
    Resources {
        #[command(subcommand)]
        action: commands::resources::ResourcesAction,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Journal { action } => commands::journal::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Resources { action } => commands::resources::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
