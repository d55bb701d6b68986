use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use cityweather_core::{
    Config, FileCityStore, SavedCityService, SearchFlow, WeatherFlow, WeatherView,
    repository_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and the next hours for a city.
    Show {
        /// City name; defaults to the saved city.
        city: Option<String>,

        /// Remember the resolved city for next time.
        #[arg(long)]
        save: bool,
    },

    /// Print the saved city.
    Saved,

    /// Forget the saved city.
    Forget,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, save } => show(city, save).await,
            Command::Saved => {
                let saved = saved_city_service()?;
                match saved.current().city {
                    Some(city) => println!("{city}"),
                    None => println!("No saved city."),
                }
                Ok(())
            }
            Command::Forget => {
                if !saved_city_service()?.forget().await {
                    bail!("Could not clear saved city; see log output for details.");
                }
                println!("Saved city cleared.");
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>, save: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");
    let repository = repository_from_config(&config)?;
    // A broken saved-city file must not stop an explicit lookup.
    let saved = SavedCityService::new(FileCityStore::open_default_or_memory());

    let search = SearchFlow::new(repository.clone());
    match city {
        Some(city) => search.set_text(city),
        None => search.prefill(&saved.current()),
    }

    if !search.state().is_search_enabled {
        bail!(
            "No city given and no saved city.\n\
             Hint: run `cityweather show <CITY>`."
        );
    }

    let mut selected = None;
    search.submit(|location| selected = Some(location)).await;

    let location = match selected {
        Some(location) => location,
        None => {
            let message = search.state().error_message.unwrap_or_else(|| "Search failed.".into());
            return Err(anyhow!(message));
        }
    };

    let weather = WeatherFlow::new(repository, saved);
    weather.load(location).await;

    let state = weather.state();
    match state.view() {
        WeatherView::Ready(_) => {}
        WeatherView::Error(message) => return Err(anyhow!(message.to_string())),
        WeatherView::Loading | WeatherView::Initial => bail!("Weather data unavailable."),
    }

    if let Some(display) = weather.display() {
        print!("{}", render::weather(&display));
    }

    if save {
        if weather.save_favorite_city().await {
            println!("Saved city updated.");
        } else {
            eprintln!("Could not save city; see log output for details.");
        }
    }

    Ok(())
}

fn saved_city_service() -> anyhow::Result<SavedCityService> {
    let store = FileCityStore::open_default().context("Failed to open saved city store")?;
    Ok(SavedCityService::new(Arc::new(store)))
}
