//! `nearby`, `explore` and `details` command handlers.

use std::path::Path;
use std::time::Duration;

use eatwhat_core::{AppConfig, Coordinates, MapTheme, Settings};
use eatwhat_places::{describe_position, locate, FixedPosition, PlacesClient};
use eatwhat_reconcile::{Notice, Reconciler, Ticket};
use eatwhat_wheel::DecisionWheel;

use crate::output;
use crate::{FilterArgs, OutputArgs};

/// Loads settings and marks the welcome as seen on first run. A failed
/// write is logged and the run continues.
pub(crate) fn first_run(path: &Path) -> anyhow::Result<Settings> {
    let settings = eatwhat_core::load_settings(path)?;
    if settings.seen_welcome {
        return Ok(settings);
    }

    eprintln!("{}", output::WELCOME);
    let settings = settings.with_welcome_seen();
    if let Err(e) = eatwhat_core::save_settings(path, &settings) {
        tracing::warn!(path = %path.display(), error = %e, "could not persist settings");
    }
    Ok(settings)
}

/// Applies any changes and writes them back; with no changes the stored
/// settings are returned untouched.
pub(crate) fn update_settings(
    path: &Path,
    volume: Option<f64>,
    map_theme: Option<MapTheme>,
) -> anyhow::Result<Settings> {
    let mut settings = eatwhat_core::load_settings(path)?;
    if volume.is_none() && map_theme.is_none() {
        return Ok(settings);
    }
    if let Some(volume) = volume {
        settings = settings.with_wheel_volume(volume);
    }
    if let Some(theme) = map_theme {
        settings = settings.with_map_theme(theme);
    }
    eatwhat_core::save_settings(path, &settings)?;
    Ok(settings)
}

pub(crate) async fn run_nearby(
    config: &AppConfig,
    settings: &Settings,
    position: Coordinates,
    filters: &FilterArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)?;
    let timeout = Duration::from_secs(config.geolocation_timeout_secs);
    let position = locate(&FixedPosition(position), timeout).await?;

    if let Some(address) = describe_position(&client, position).await {
        eprintln!("Searching near {address}");
    }

    let mut reconciler = Reconciler::new(filters.to_spec());
    reconciler.set_local_query(filters.local_query.clone());
    let ticket = reconciler.locate(position);
    execute(&client, &mut reconciler, ticket).await?;
    present(&mut reconciler, settings, output).await
}

pub(crate) async fn run_explore(
    config: &AppConfig,
    settings: &Settings,
    query: &str,
    filters: &FilterArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)?;
    let mut reconciler = Reconciler::new(filters.to_spec());
    reconciler.set_local_query(filters.local_query.clone());

    let Some(ticket) = reconciler.explore(query) else {
        anyhow::bail!("search text must not be blank");
    };
    execute(&client, &mut reconciler, ticket).await?;
    present(&mut reconciler, settings, output).await
}

pub(crate) async fn run_details(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)?;
    let details = client.details(id).await?;
    println!("{}", output::details_block(&details));
    Ok(())
}

/// Runs the ticket's search and hands the outcome to the reconciler.
async fn execute(
    client: &PlacesClient,
    reconciler: &mut Reconciler,
    ticket: Ticket,
) -> anyhow::Result<()> {
    match client.search(&ticket.request).await {
        Ok(venues) => {
            reconciler.apply_results(ticket.token, venues);
            Ok(())
        }
        Err(e) => match reconciler.apply_failure(ticket.token, &e) {
            Some(Notice::Error(message)) => anyhow::bail!(message),
            None => Ok(()),
        },
    }
}

async fn present(
    reconciler: &mut Reconciler,
    settings: &Settings,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let displayed = reconciler.displayed();

    if output.json {
        println!("{}", serde_json::to_string_pretty(&displayed)?);
    } else if displayed.is_empty() {
        println!("No restaurants match the current filters.");
        let areas = reconciler.available_areas();
        if !areas.is_empty() {
            println!("Areas in these results: {}", areas.join(", "));
        }
    } else {
        for (rank, venue) in displayed.iter().enumerate() {
            println!("{:>2}. {}", rank + 1, output::venue_line(venue));
        }
    }

    if output.spin {
        #[allow(clippy::cast_possible_truncation)]
        let volume = settings.volume() as f32;
        let mut wheel = DecisionWheel::new(&displayed, volume);
        if wheel.is_empty() {
            println!("Nothing to spin.");
            return Ok(());
        }
        eprintln!("Spinning over {} restaurants...", wheel.candidates().len());
        if let Some(winner) = wheel.choose().await {
            if let Some(focused) = reconciler.focus(&winner.id) {
                println!("The wheel picked: {}", output::venue_line(&focused));
            }
        }
    }

    Ok(())
}
