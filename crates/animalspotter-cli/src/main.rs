//! Animal Spotter CLI - browse animal sightings from the terminal.
//!
//! Every command logs in first (tokens are never saved), then lists names
//! or shows a single sighting with its picture.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use animalspotter_core::utils::{format_coordinates, format_observed_at, sorted_names};
use animalspotter_core::{ApiClient, ApiError, Config, Credentials};

/// Environment variable read before prompting for a password
const PASSWORD_ENV: &str = "ANIMALSPOTTER_PASSWORD";

#[derive(Debug, Parser)]
#[command(name = "animalspotter", version, about = "Browse Animal Spotter sightings")]
struct Cli {
    /// Service base URL (overrides config and ANIMALSPOTTER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Account username (defaults to the last one used)
    #[arg(long, short, global = true)]
    username: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account, then log in with it
    Signup,
    /// List every known animal
    List {
        /// Sort alphabetically instead of keeping the service order
        #[arg(long)]
        sort: bool,
    },
    /// Show one sighting
    Show {
        /// Animal name as shown by `list`
        name: String,
        /// Save the animal's picture to this file
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if let Some(ref base_url) = cli.base_url {
        config.apply_base_url_override(base_url);
    }
    debug!(base_url = %config.base_url, "Config loaded");

    let api = ApiClient::new(&config)?;
    let credentials = prompt_credentials(cli.username.as_deref(), config.last_username.as_deref())?;

    if let Command::Signup = cli.command {
        api.register(&credentials).await?;
        println!("Account created for {}", credentials.username);
    }

    api.authenticate(&credentials)
        .await
        .context("Login failed")?;
    info!(username = %credentials.username, "Logged in");

    if config.last_username.as_deref() != Some(credentials.username.as_str()) {
        config.last_username = Some(credentials.username.clone());
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
    drop(credentials);

    match cli.command {
        Command::Signup => println!("Login successful!"),
        Command::List { sort } => list(&api, sort).await?,
        Command::Show { name, image } => show(&api, &name, image.as_deref()).await?,
    }
    Ok(())
}

async fn list(api: &ApiClient, sort: bool) -> Result<()> {
    let names = api.list_animal_names().await?;
    let names = if sort { sorted_names(&names) } else { names };

    if names.is_empty() {
        println!("No animals have been spotted yet.");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

async fn show(api: &ApiClient, name: &str, image_path: Option<&Path>) -> Result<()> {
    let animal = api.fetch_animal(name).await?;

    println!("{}", animal.name);
    println!("  Seen:     {}", format_observed_at(&animal.observed_at.with_timezone(&Local)));
    println!("  Where:    {}", format_coordinates(animal.latitude, animal.longitude));
    println!("  Notes:    {}", animal.description);

    // The sighting is still useful without its picture
    match api.fetch_image(&animal.image_url).await {
        Ok(picture) => {
            let (width, height) = picture.dimensions();
            println!("  Picture:  {}x{} {:?}", width, height, picture.format);
            if let Some(path) = image_path {
                picture
                    .image
                    .save(path)
                    .with_context(|| format!("Failed to save image to {}", path.display()))?;
                println!("  Saved to: {}", path.display());
            }
        }
        Err(e) => {
            warn!(error = %e, url = %animal.image_url, "Failed to fetch image");
            println!("  Picture:  unavailable ({})", e);
        }
    }
    Ok(())
}

fn prompt_credentials(username: Option<&str>, last_username: Option<&str>) -> Result<Credentials> {
    let username = match username {
        Some(u) => u.to_string(),
        None => prompt_username(last_username)?,
    };

    let password = match std::env::var(PASSWORD_ENV) {
        Ok(p) if !p.is_empty() => p,
        _ => rpassword::prompt_password("Password: ")?,
    };

    let credentials = Credentials::new(username, password);
    if !credentials.is_complete() {
        anyhow::bail!("Username and password required");
    }
    Ok(credentials)
}

fn prompt_username(last_username: Option<&str>) -> Result<String> {
    match last_username {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_username) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

/// Turn an error chain into something a person can act on
fn user_message(error: &anyhow::Error) -> String {
    match error.chain().find_map(|e| e.downcast_ref::<ApiError>()) {
        Some(api) if api.requires_login() => {
            "Your session was rejected. Please log in again.".to_string()
        }
        Some(ApiError::UnexpectedStatus { status: 401, .. }) => {
            "Invalid username or password".to_string()
        }
        Some(ApiError::UnexpectedStatus { status: status @ 400..=499, .. }) => {
            format!("The service rejected the request (status {})", status)
        }
        Some(api) if api.is_transient() => {
            format!("Unable to reach the Animal Spotter service, try again later ({})", api)
        }
        _ => format!("{:#}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_show() {
        let cli = Cli::try_parse_from(["animalspotter", "-u", "joe", "show", "Lion", "--image", "lion.png"])
            .unwrap();
        assert_eq!(cli.username.as_deref(), Some("joe"));
        match cli.command {
            Command::Show { name, image } => {
                assert_eq!(name, "Lion");
                assert_eq!(image, Some(PathBuf::from("lion.png")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_user_message_classification() {
        let err = anyhow::Error::new(ApiError::InvalidToken);
        assert!(user_message(&err).contains("log in again"));

        let err = anyhow::Error::new(ApiError::UnexpectedStatus {
            status: 401,
            body: String::new(),
        })
        .context("Login failed");
        assert_eq!(user_message(&err), "Invalid username or password");

        let err = anyhow::Error::new(ApiError::UnexpectedStatus {
            status: 409,
            body: "taken".to_string(),
        });
        assert_eq!(user_message(&err), "The service rejected the request (status 409)");

        let err = anyhow::Error::new(ApiError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert!(user_message(&err).contains("try again later"));

        let err = anyhow::Error::new(ApiError::EmptyBody);
        assert_eq!(user_message(&err), "Response body was empty");
    }
}
