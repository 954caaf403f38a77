use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use kookpal::{fetch_recipe, search_recipes, server, suggest_ingredients, RelayConfig};

#[derive(Debug, Parser)]
#[command(name = "kookpal", version, about = "Find recipes from the ingredients you have")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the recipe relay
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Suggest ingredient names for partially typed text
    Suggest {
        text: String,
    },
    /// Search recipes that use the given ingredients
    Search {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Show full details for a recipe
    Recipe {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Command::Suggest { text } => {
            let suggestions = suggest_ingredients(&text);
            if !suggestions.matches.is_empty() {
                for name in &suggestions.matches {
                    println!("{}", name);
                }
            } else if !suggestions.did_you_mean.is_empty() {
                println!("Did you mean: {}", suggestions.did_you_mean.join(", "));
            } else {
                println!("No matching ingredients");
            }
        }
        Command::Serve { host, port } => {
            let mut config = RelayConfig::load()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            server::serve(config).await?;
        }
        Command::Search { ingredients } => {
            let config = RelayConfig::load()?;
            let ingredients: Vec<String> =
                ingredients.iter().map(|i| i.trim().to_lowercase()).collect();
            info!("Searching recipes for: {}", ingredients.join(", "));

            let recipes = search_recipes(&config, &ingredients).await?;
            println!("{}", serde_json::to_string_pretty(&recipes)?);
        }
        Command::Recipe { id } => {
            let config = RelayConfig::load()?;
            let recipe = fetch_recipe(&config, &id).await?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
    }

    Ok(())
}
