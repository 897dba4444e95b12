use anyhow::Result;
use catalog_service::client::ApiClient;
use colored::Colorize;

use crate::utils;

pub async fn execute(client: &ApiClient, verbose: bool) -> Result<()> {
    println!("{}", "Checking service health...".bold());
    println!();

    print!("Health endpoint... ");
    match client.health().await {
        Ok(body) => {
            println!("{}", "✓ OK".green().bold());
            if verbose {
                println!("  Response: {}", body);
            }
        }
        Err(e) => {
            println!("{}", "✗ FAILED".red().bold());
            utils::error(&e.to_string());
            return Err(e.into());
        }
    }

    print!("Readiness endpoint... ");
    match client.readiness().await {
        Ok(body) => {
            println!("{}", "✓ OK".green().bold());
            if verbose {
                println!("  Response: {}", body);
            }
        }
        Err(e) => {
            println!("{}", "✗ FAILED".red().bold());
            utils::error(&e.to_string());
            return Err(e.into());
        }
    }

    println!();
    utils::success("Service is healthy and ready!");

    Ok(())
}
