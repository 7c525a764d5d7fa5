use anyhow::Result;
use log::debug;

use super::Config;

#[tracing::instrument(skip(config, password))]
pub async fn login(config: &Config, email: &str, password: &str) -> Result<()> {
    let user = config.session.login(email, password).await?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

#[tracing::instrument(skip(config, password))]
pub async fn register(config: &Config, name: &str, email: &str, password: &str) -> Result<()> {
    let user = config.session.register(name, email, password).await?;
    println!("Welcome to Ecovia, {}! You are signed in.", user.name);
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn logout(config: &Config) -> Result<()> {
    debug!("Signing out...");
    config.session.logout().await?;
    println!("Signed out.");
    Ok(())
}
