use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use pantrychef::config::{load_config, print_schema};
use pantrychef::models::{Ingredient, Recipe, UserProfile};
use pantrychef::resources::{ImageUpload, ResourceError};
use pantrychef::session::LoginError;
use pantrychef::startup::build_state;
use pantrychef::state::AppState;
use pantrychef::utils::logger::init_logging;

#[derive(Parser)]
#[command(name = "pantrychef", version, about = "Pantry and recipe client")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, short, default_value = "./config.yaml")]
    config: PathBuf,

    /// Print raw JSON instead of a summary.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in through the identity provider.
    Login,
    /// Forget the current session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Check that the backend is reachable.
    Ping,
    /// Print the JSON schema of the configuration file.
    Schema,
    #[command(subcommand)]
    Recipes(RecipeCommand),
    #[command(subcommand)]
    Ingredients(IngredientCommand),
    /// Detect ingredients on a receipt or pantry photo.
    Detect { image: PathBuf },
    /// Ask the AI endpoint for recipes using these ingredients.
    Generate {
        #[arg(required = true)]
        ingredients: Vec<String>,
        /// Also store the generated text as a saved recipe.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand)]
enum RecipeCommand {
    List,
    Get { id: String },
    /// Recipes using any of these ingredients.
    Search {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    Popular,
    Recent,
    Saved,
    Save { id: String },
    Unsave { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum IngredientCommand {
    List,
    Get { id: String },
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
    },
    Delete { id: String },
    Search { query: String },
    Category { category: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Cannot read {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("Login failed: {0}")]
    Login(#[from] LoginError),
}

impl CliError {
    fn user_message(&self) -> String {
        match self {
            CliError::Input { .. } | CliError::Login(_) => self.to_string(),
            CliError::Resource(e) => e.user_message(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Schema = cli.command {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error printing schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let state = match build_state(Arc::new(config)).await {
        Ok(state) => state,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&state, cli.command, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Request failed: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Command, json: bool) -> Result<(), CliError> {
    let api = &state.resources;
    match command {
        Command::Schema => {}
        Command::Login => report_login(state.session.login().await)?,
        Command::Logout => {
            state.session.logout().await;
            println!("Logged out");
        }
        Command::Whoami => {
            let session = state.session.current();
            match session.user() {
                Some(user) if json => emit(user),
                Some(user) => println!("{}", user.display_name()),
                None => println!("Not logged in ({})", session.status()),
            }
        }
        Command::Ping => {
            let status = api.test_connection().await;
            if json {
                emit(&status);
            } else {
                println!("{} (status {})", status.message, status.status);
            }
        }
        Command::Recipes(cmd) => run_recipes(state, cmd, json).await?,
        Command::Ingredients(cmd) => run_ingredients(state, cmd, json).await?,
        Command::Detect { image } => {
            let upload = ImageUpload::from_path(&image)
                .await
                .map_err(|source| CliError::Input {
                    path: image.display().to_string(),
                    source,
                })?;
            let result = api.detect_ingredients(upload).await?;
            if json {
                emit(&result);
            } else if result.success {
                println!(
                    "Found {} ingredients: {}",
                    result.ingredients().len(),
                    result.ingredient_names().join(", ")
                );
            } else {
                println!(
                    "{}",
                    result.message.as_deref().unwrap_or("No ingredients detected")
                );
            }
        }
        Command::Generate { ingredients, save } => {
            let text = api.generate_recipes(&ingredients).await?;
            println!("{}", text);
            if save {
                let saved = api.save_generated_recipe(&text, &ingredients).await?;
                if saved.success {
                    eprintln!("Recipe saved.");
                } else {
                    eprintln!(
                        "Could not save recipe{}",
                        saved.message.map(|m| format!(": {}", m)).unwrap_or_default()
                    );
                }
            }
        }
    }
    Ok(())
}

/// A cancelled login is not a failure; anything else that went wrong is.
fn report_login(result: Result<UserProfile, LoginError>) -> Result<(), CliError> {
    match result {
        Ok(user) => {
            println!("Logged in as {}", user.display_name());
            Ok(())
        }
        Err(e) if e.is_cancellation() => {
            eprintln!("Login cancelled");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_recipes(state: &AppState, cmd: RecipeCommand, json: bool) -> Result<(), ResourceError> {
    let api = &state.resources;
    let recipes = match cmd {
        RecipeCommand::List => api.list_recipes().await?,
        RecipeCommand::Get { id } => vec![api.get_recipe(&id).await?],
        RecipeCommand::Search { ingredients } => api.search_recipes(&ingredients).await?,
        RecipeCommand::Popular => api.popular_recipes().await?,
        RecipeCommand::Recent => api.recent_recipes().await?,
        RecipeCommand::Saved => api.saved_recipes().await?,
        RecipeCommand::Save { id } => vec![api.save_recipe(&id).await?],
        RecipeCommand::Unsave { id } => {
            api.unsave_recipe(&id).await?;
            println!("Recipe {} removed from saved recipes", id);
            return Ok(());
        }
        RecipeCommand::Delete { id } => {
            api.delete_recipe(&id).await?;
            println!("Recipe {} deleted", id);
            return Ok(());
        }
    };

    if json {
        emit(&recipes);
    } else if recipes.is_empty() {
        println!("No recipes found");
    } else {
        recipes.iter().for_each(print_recipe);
    }
    Ok(())
}

async fn run_ingredients(
    state: &AppState,
    cmd: IngredientCommand,
    json: bool,
) -> Result<(), ResourceError> {
    let api = &state.resources;
    let ingredients = match cmd {
        IngredientCommand::List => api.list_ingredients().await?,
        IngredientCommand::Get { id } => vec![api.get_ingredient(&id).await?],
        IngredientCommand::Add { name, category } => {
            let ingredient = Ingredient::manual(&name, category.as_deref());
            vec![api.create_ingredient(&ingredient).await?]
        }
        IngredientCommand::Delete { id } => {
            api.delete_ingredient(&id).await?;
            println!("Ingredient {} deleted", id);
            return Ok(());
        }
        IngredientCommand::Search { query } => api.search_ingredients(&query).await?,
        IngredientCommand::Category { category } => api.ingredients_by_category(&category).await?,
    };

    if json {
        emit(&ingredients);
    } else if ingredients.is_empty() {
        println!("No ingredients found");
    } else {
        ingredients.iter().for_each(print_ingredient);
    }
    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    let minutes = recipe
        .total_time_minutes()
        .map(|m| format!(" ({} min)", m))
        .unwrap_or_default();
    println!(
        "{}  {}{}",
        recipe.id.as_deref().unwrap_or("-"),
        recipe.title.as_deref().unwrap_or("Untitled"),
        minutes
    );
}

fn print_ingredient(ingredient: &Ingredient) {
    let mut line = format!(
        "{}  {}",
        ingredient.id.as_deref().unwrap_or("-"),
        ingredient.name()
    );
    if let Some(category) = &ingredient.category {
        line.push_str(&format!(" [{}]", category));
    }
    if ingredient.detected() {
        line.push_str(" (scanned)");
    }
    if let Some(day) = ingredient.added_on() {
        line.push_str(&format!(" added {}", day));
    }
    println!("{}", line);
}

fn emit<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(out) => println!("{}", out),
        Err(e) => eprintln!("Could not serialize output: {}", e),
    }
}
