mod output;
mod saved;
mod search;

use clap::{Args, Parser, Subcommand, ValueEnum};
use eatwhat_core::{AppConfig, DietaryTag, FilterSpec, ListType, MapTheme, PriceLevel, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eatwhat")]
#[command(about = "Find somewhere to eat nearby, or let the wheel decide")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for restaurants around a position.
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Search by free text, anywhere.
    Explore {
        query: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show photos, reviews and hours for one venue.
    Details { id: String },
    /// Show or change a venue's saved lists.
    Saved {
        id: String,
        /// Venue name sent with a toggle.
        #[arg(long, default_value = "")]
        name: String,
        /// Add the venue to this list, or remove it if already there.
        #[arg(long, value_enum)]
        toggle: Option<ListArg>,
        /// Bearer token for the favorites service; without one you are
        /// signed out.
        #[arg(long, env = "EATWHAT_SAVED_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Show or change persistent settings.
    Settings {
        /// Wheel tick volume, 0.0 (silent) to 1.0.
        #[arg(long)]
        volume: Option<f64>,
        #[arg(long, value_enum)]
        map_theme: Option<ThemeArg>,
    },
}

/// Filter selections shared by `nearby` and `explore`.
#[derive(Debug, Clone, Args)]
struct FilterArgs {
    /// Distance ceiling and search radius in kilometers.
    #[arg(long, default_value_t = 15.0)]
    radius_km: f64,
    /// Maximum venues to collect from the provider.
    #[arg(long, default_value_t = 50)]
    limit: usize,
    /// Keep only venues in this area (repeatable).
    #[arg(long = "area")]
    areas: Vec<String>,
    /// Keep venues tagged with this cuisine (repeatable).
    #[arg(long = "cuisine")]
    cuisines: Vec<String>,
    /// Keep venues with this dietary option: halal, vegetarian, vegan.
    #[arg(long = "dietary")]
    dietary: Vec<DietaryTag>,
    /// Keep venues at this price: `$`..`$$$$` or 1-4 (repeatable).
    #[arg(long = "price", value_parser = parse_price)]
    prices: Vec<PriceLevel>,
    #[arg(long, default_value_t = 0.0)]
    min_rating: f64,
    /// Only venues open right now.
    #[arg(long)]
    open_now: bool,
    /// Narrow results by name, cuisine, area or address.
    #[arg(long = "filter", default_value = "")]
    local_query: String,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            area_whitelist: self.areas.iter().cloned().collect(),
            max_distance_km: self.radius_km,
            cuisine_whitelist: self.cuisines.iter().cloned().collect(),
            dietary_whitelist: self.dietary.iter().copied().collect(),
            price_whitelist: self.prices.iter().copied().collect(),
            min_rating: self.min_rating,
            open_now_only: self.open_now,
            result_limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct OutputArgs {
    /// Spin the decision wheel over the results.
    #[arg(long)]
    spin: bool,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListArg {
    Favorites,
    WantToGo,
    Starred,
}

impl From<ListArg> for ListType {
    fn from(value: ListArg) -> Self {
        match value {
            ListArg::Favorites => ListType::Favorites,
            ListArg::WantToGo => ListType::WantToGo,
            ListArg::Starred => ListType::Starred,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Standard,
    Dark,
    Retro,
    Satellite,
    Hybrid,
    Silver,
    Aubergine,
}

impl From<ThemeArg> for MapTheme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Standard => MapTheme::Standard,
            ThemeArg::Dark => MapTheme::Dark,
            ThemeArg::Retro => MapTheme::Retro,
            ThemeArg::Satellite => MapTheme::Satellite,
            ThemeArg::Hybrid => MapTheme::Hybrid,
            ThemeArg::Silver => MapTheme::Silver,
            ThemeArg::Aubergine => MapTheme::Aubergine,
        }
    }
}

fn parse_price(raw: &str) -> Result<PriceLevel, String> {
    PriceLevel::from_tag(raw).ok_or_else(|| format!("expected $..$$$$ or 1-4, got \"{raw}\""))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("eatwhat: try `eatwhat nearby --lat 3.139 --lng 101.6869` or `eatwhat --help`");
        return Ok(());
    };

    match command {
        Commands::Nearby {
            lat,
            lng,
            filters,
            output,
        } => {
            let (config, settings) = start_search()?;
            let position = eatwhat_core::Coordinates::new(lat, lng);
            search::run_nearby(&config, &settings, position, &filters, &output).await?;
        }
        Commands::Explore {
            query,
            filters,
            output,
        } => {
            let (config, settings) = start_search()?;
            search::run_explore(&config, &settings, &query, &filters, &output).await?;
        }
        Commands::Details { id } => {
            let (config, _) = start_search()?;
            search::run_details(&config, &id).await?;
        }
        Commands::Saved {
            id,
            name,
            toggle,
            token,
        } => {
            let config = eatwhat_core::load_base_config()?;
            init_tracing(&config.log_level)?;
            search::first_run(&config.settings_path)?;
            saved::run_saved(&config, &id, &name, toggle.map(ListType::from), token).await?;
        }
        Commands::Settings { volume, map_theme } => {
            let config = eatwhat_core::load_base_config()?;
            init_tracing(&config.log_level)?;
            let settings = search::update_settings(
                &config.settings_path,
                volume,
                map_theme.map(MapTheme::from),
            )?;
            println!("{}", output::settings_block(&settings));
        }
    }

    Ok(())
}

/// Loads the full configuration, which requires the places credential.
fn start_search() -> anyhow::Result<(AppConfig, Settings)> {
    let config = eatwhat_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    let settings = search::first_run(&config.settings_path)?;
    Ok((config, settings))
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
