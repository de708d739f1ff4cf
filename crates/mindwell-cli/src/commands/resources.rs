use clap::Subcommand;
use mindwell_core::resources;

#[derive(Subcommand)]
pub enum ResourcesAction {
    /// List the resource directory
    List {
        /// Show a single category
        #[arg(long)]
        category: Option<String>,
    },
    /// Crisis support contacts
    Crisis,
}

pub fn run(action: ResourcesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ResourcesAction::List { category } => match category {
            Some(name) => {
                let found = resources::by_category(&name)
                    .ok_or_else(|| format!("no resource category '{name}'"))?;
                println!("{}", serde_json::to_string_pretty(found)?);
            }
            None => {
                println!("{}", serde_json::to_string_pretty(resources::directory())?);
            }
        },
        ResourcesAction::Crisis => {
            println!("If you are in immediate danger, call {}.", resources::EMERGENCY);
            println!(
                "Suicide & Crisis Lifeline: {} | Crisis Text Line: text HOME to {}",
                resources::SUICIDE_PREVENTION_LIFELINE,
                resources::CRISIS_TEXT_LINE
            );
            println!(
                "{}",
                serde_json::to_string_pretty(resources::crisis_support())?
            );
        }
    }
    Ok(())
}
