use anyhow::Result;

use super::Config;
use crate::api::accommodations::{self, AccommodationQuery};

#[tracing::instrument(skip(config))]
pub async fn list(config: &Config, location: Option<String>, page: Option<u32>) -> Result<()> {
    let query = AccommodationQuery {
        location,
        page,
        per_page: None,
    };
    let found = accommodations::list(&config.api, &query).await?;

    if found.is_empty() {
        println!("No accommodations found.");
        return Ok(());
    }

    for a in &found {
        println!(
            "{:<10} {:<28} {:<18} eco {:.1}  {:>7.2}/night",
            a.id, a.name, a.location, a.eco_rating, a.price_per_night
        );
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn show(config: &Config, id: &str) -> Result<()> {
    let a = accommodations::get(&config.api, id).await?;

    println!("{} ({})", a.name, a.location);
    println!("Eco rating: {:.1} / 5.0 ({} reviews)", a.eco_rating, a.review_count);
    println!("Price per night: {:.2}", a.price_per_night);
    if let Some(description) = &a.description {
        println!("\n{}", description);
    }
    if !a.amenities.is_empty() {
        println!("\nAmenities:");
        for amenity in &a.amenities {
            println!("  {}", amenity);
        }
    }
    Ok(())
}
