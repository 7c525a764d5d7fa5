use anyhow::Result;
use futures_util::try_join;

use super::Config;
use crate::api::profile::{self, ProfileUpdate};
use crate::api::events;

/// Shows the profile alongside joined events. The two fetches run
/// concurrently, each with its own independent retry state.
#[tracing::instrument(skip(config))]
pub async fn show(config: &Config) -> Result<()> {
    let (user, joined) = try_join!(
        profile::fetch(&config.api),
        events::list(&config.api, true)
    )?;

    println!("{} <{}>", user.name, user.email);
    println!("Points: {}", user.points);
    if !user.badges.is_empty() {
        println!("Badges: {}", user.badges.join(", "));
    }
    if let Some(bio) = &user.bio {
        println!("\n{}", bio);
    }

    if !joined.is_empty() {
        println!("\nJoined conservation events:");
        for e in &joined {
            println!("  {:<28} {:<16} {}", e.title, e.location, e.date);
        }
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn update(config: &Config, name: Option<String>, bio: Option<String>) -> Result<()> {
    if name.is_none() && bio.is_none() {
        println!("Nothing to update. Pass --name or --bio.");
        return Ok(());
    }

    let updated = profile::update(&config.api, &ProfileUpdate { name, bio }).await?;
    println!("Profile updated for {}.", updated.name);
    Ok(())
}
