//! `saved` command handler.

use eatwhat_core::{AuthSession, BaseConfig, ListType, SavedLists, Venue, DEFAULT_CENTER};
use eatwhat_places::{SaveToggle, SavedClient, ToggleOutcome};

pub(crate) fn session_for(token: Option<&str>) -> AuthSession {
    match token.map(str::trim) {
        Some(t) if !t.is_empty() => AuthSession::SignedIn {
            name: None,
            email: None,
        },
        _ => AuthSession::SignedOut,
    }
}

pub(crate) fn describe_lists(lists: SavedLists) -> String {
    let names: Vec<&str> = ListType::ALL
        .into_iter()
        .filter(|list| lists.contains(*list))
        .map(ListType::as_str)
        .collect();
    if names.is_empty() {
        "not saved".to_owned()
    } else {
        names.join(", ")
    }
}

/// A placeholder venue carrying only what the favorites service needs.
fn stub_venue(id: &str, name: &str) -> Venue {
    Venue {
        id: id.to_owned(),
        name: name.to_owned(),
        cuisine_tags: std::collections::BTreeSet::new(),
        rating: 0.0,
        price_level: None,
        coordinates: DEFAULT_CENTER,
        address_text: String::new(),
        area_label: String::new(),
        dietary_tags: std::collections::BTreeSet::new(),
        opening_schedule: None,
        photo_url: None,
        phone_number: None,
        derived_distance_km: None,
    }
}

pub(crate) async fn run_saved(
    config: &BaseConfig,
    id: &str,
    name: &str,
    toggle: Option<ListType>,
    token: Option<String>,
) -> anyhow::Result<()> {
    let session = session_for(token.as_deref());
    let client = SavedClient::from_config(config, token)?;
    let mut state = SaveToggle::new(&stub_venue(id, name));

    let Some(list) = toggle else {
        if !session.is_signed_in() {
            println!("Sign in to see saved lists (pass --token or set EATWHAT_SAVED_TOKEN).");
            return Ok(());
        }
        let lists = state.load(&session, &client).await?;
        println!("{id}: {}", describe_lists(lists));
        return Ok(());
    };

    if session.is_signed_in() {
        state.load(&session, &client).await?;
    }
    match state.toggle(&session, &client, list).await {
        ToggleOutcome::Saved(lists) => println!("{id}: {}", describe_lists(lists)),
        ToggleOutcome::SignInRequired => {
            println!("Sign in to save restaurants (pass --token or set EATWHAT_SAVED_TOKEN).");
        }
        ToggleOutcome::RolledBack { error, .. } => {
            anyhow::bail!("could not update {list}: {error}");
        }
    }
    Ok(())
}
