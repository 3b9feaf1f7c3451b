use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, Dashboard, DisplayMode, FileStore, RecentSearchStore, Units,
    provider::provider_from_config,
};
use inquire::{Password, Select, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard in your terminal")]
pub struct Cli {
    /// Render with the light palette regardless of the configured mode.
    #[arg(long, global = true)]
    pub light: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show current weather, air quality and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show the most recently searched city again.
    Refresh,

    /// List recent searches.
    History {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },

    /// Interactive dashboard (default when no command is given).
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if self.light {
            config.display_mode = DisplayMode::Light;
        }

        tracing::debug!(command = ?self.command, units = %config.units, "starting");

        match self.command.unwrap_or(Command::Dashboard) {
            Command::Configure => configure(config),
            Command::Show { city } => {
                let mut dash = open_dashboard(&config)?;
                dash.search(&city.join(" ")).await;
                print!("{}", render::state(&dash.state(), config.units, dash.display_mode()));
                Ok(())
            }
            Command::Refresh => {
                let mut dash = open_dashboard(&config)?;
                if !dash.select_history(0).await {
                    println!("No recent searches yet. Try `weather-dashboard show <city>`.");
                    return Ok(());
                }
                print!("{}", render::state(&dash.state(), config.units, dash.display_mode()));
                Ok(())
            }
            Command::History { clear } => {
                let mut history = RecentSearchStore::load(FileStore::open_default()?);
                if clear {
                    history.clear();
                    println!("Recent searches cleared.");
                } else {
                    print!("{}", render::history(history.entries(), config.display_mode));
                }
                Ok(())
            }
            Command::Dashboard => interactive(&config).await,
        }
    }
}

fn open_dashboard(config: &Config) -> anyhow::Result<Dashboard<FileStore>> {
    let provider = provider_from_config(config)?;
    let store = FileStore::open_default()?;
    Ok(Dashboard::new(provider, store, config.display_mode))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("API key prompt was cancelled")?;
    config.set_api_key(api_key.trim().to_string());

    let units = Select::new("Units:", vec![Units::Metric, Units::Imperial, Units::Standard])
        .prompt()
        .context("Units prompt was cancelled")?;
    config.units = units;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

const SEARCH: &str = "Search for a city";
const REFRESH: &str = "Refresh";
const TOGGLE: &str = "Toggle light/dark";
const QUIT: &str = "Quit";

#[derive(Debug, PartialEq, Eq)]
enum MenuAction {
    Search,
    Recent(usize),
    Refresh,
    Toggle,
    Quit,
}

/// Menu lines: search, one per recent city, then the fixed actions.
fn menu(history: &[String], can_refresh: bool) -> Vec<String> {
    let mut options = vec![SEARCH.to_string()];
    options.extend(history.iter().map(|c| format!("Recent: {c}")));
    if can_refresh {
        options.push(REFRESH.to_string());
    }
    options.push(TOGGLE.to_string());
    options.push(QUIT.to_string());
    options
}

/// Map a picked menu line back to its action. Recent cities are resolved by
/// position, never by their text.
fn action(index: usize, value: &str, history_len: usize) -> MenuAction {
    if (1..=history_len).contains(&index) {
        return MenuAction::Recent(index - 1);
    }
    match value {
        SEARCH => MenuAction::Search,
        REFRESH => MenuAction::Refresh,
        TOGGLE => MenuAction::Toggle,
        _ => MenuAction::Quit,
    }
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let mut dash = open_dashboard(config)?;
    print!("{}", render::state(&dash.state(), config.units, dash.display_mode()));

    loop {
        let history_len = dash.history().len();
        let options = menu(dash.history(), dash.orchestrator().current_city().is_some());

        let Ok(choice) = Select::new("Weather Dashboard", options).raw_prompt() else {
            break;
        };

        match action(choice.index, &choice.value, history_len) {
            MenuAction::Search => {
                let Ok(city) = Text::new("City:").prompt() else {
                    continue;
                };
                dash.search(&city).await;
            }
            MenuAction::Recent(i) => {
                dash.select_history(i).await;
            }
            MenuAction::Refresh => dash.refresh().await,
            MenuAction::Toggle => {
                dash.toggle_display_mode();
            }
            MenuAction::Quit => break,
        }

        print!("{}", render::state(&dash.state(), config.units, dash.display_mode()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn recent_city_is_resolved_by_position() {
        let history = cities(&["Recent: Recent: Springs", "Quit"]);
        let options = menu(&history, true);

        assert_eq!(options[1], "Recent: Recent: Recent: Springs");
        assert_eq!(action(1, &options[1], history.len()), MenuAction::Recent(0));
        assert_eq!(action(2, &options[2], history.len()), MenuAction::Recent(1));
    }

    #[test]
    fn fixed_actions_follow_recent_cities() {
        let history = cities(&["Oslo"]);
        let options = menu(&history, true);

        assert_eq!(options, [SEARCH, "Recent: Oslo", REFRESH, TOGGLE, QUIT]);
        assert_eq!(action(0, &options[0], 1), MenuAction::Search);
        assert_eq!(action(2, &options[2], 1), MenuAction::Refresh);
        assert_eq!(action(3, &options[3], 1), MenuAction::Toggle);
        assert_eq!(action(4, &options[4], 1), MenuAction::Quit);
    }

    #[test]
    fn refresh_is_hidden_before_first_search() {
        let options = menu(&[], false);
        assert_eq!(options, [SEARCH, TOGGLE, QUIT]);
    }
}
