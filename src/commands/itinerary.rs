use anyhow::Result;

use super::Config;
use crate::api::itineraries::{self, PlanRequest};

#[tracing::instrument(skip(config))]
pub async fn list(config: &Config) -> Result<()> {
    let itineraries = itineraries::list(&config.api).await?;

    if itineraries.is_empty() {
        println!("No itineraries yet. Plan one with `ecovia itinerary plan`.");
        return Ok(());
    }

    for i in &itineraries {
        println!(
            "{:<10} {:<24} {} to {}",
            i.id, i.destination, i.start_date, i.end_date
        );
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn plan(
    config: &Config,
    destination: String,
    start_date: String,
    end_date: String,
    interests: Vec<String>,
) -> Result<()> {
    let request = PlanRequest {
        destination,
        start_date,
        end_date,
        interests,
    };
    let itinerary = itineraries::plan(&config.api, &request).await?;

    println!(
        "Itinerary {} for {} ({} to {}):",
        itinerary.id, itinerary.destination, itinerary.start_date, itinerary.end_date
    );
    for day in &itinerary.days {
        println!("\nDay {}:", day.day);
        for activity in &day.activities {
            println!("  {}", activity);
        }
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn remove(config: &Config, id: &str) -> Result<()> {
    itineraries::remove(&config.api, id).await?;
    println!("Removed itinerary {}.", id);
    Ok(())
}
