use anyhow::Result;

use super::Config;
use crate::api::events;

#[tracing::instrument(skip(config))]
pub async fn list(config: &Config, joined_only: bool) -> Result<()> {
    let found = events::list(&config.api, joined_only).await?;

    if found.is_empty() {
        println!("No conservation events found.");
        return Ok(());
    }

    for e in &found {
        let marker = if e.joined { "*" } else { " " };
        println!(
            "{} {:<10} {:<28} {:<16} {}  {} spots left",
            marker,
            e.id,
            e.title,
            e.location,
            e.date,
            e.spots_left()
        );
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn join(config: &Config, id: &str) -> Result<()> {
    let rsvp = events::join(&config.api, id).await?;
    println!(
        "Registered for event {}. {} spots left.",
        rsvp.event_id, rsvp.spots_left
    );
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn leave(config: &Config, id: &str) -> Result<()> {
    events::leave(&config.api, id).await?;
    println!("Cancelled registration for event {}.", id);
    Ok(())
}
