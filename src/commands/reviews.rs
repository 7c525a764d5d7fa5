use anyhow::Result;

use super::Config;
use crate::api::reviews::{self, NewReview};

#[tracing::instrument(skip(config))]
pub async fn list(config: &Config, accommodation_id: &str) -> Result<()> {
    let reviews = reviews::list(&config.api, accommodation_id).await?;

    if reviews.is_empty() {
        println!("No reviews yet for {}.", accommodation_id);
        return Ok(());
    }

    for r in &reviews {
        println!("[{}/5] {} ({})", r.rating, r.author, r.created_at);
        println!("  {}", r.comment);
    }
    Ok(())
}

#[tracing::instrument(skip(config, comment))]
pub async fn add(
    config: &Config,
    accommodation_id: &str,
    rating: u8,
    comment: String,
) -> Result<()> {
    let review = reviews::add(
        &config.api,
        accommodation_id,
        &NewReview { rating, comment },
    )
    .await?;
    println!("Review {} submitted.", review.id);
    Ok(())
}
