use std::path::Path;

use colored::Colorize;

pub async fn run(file: &Path, amount: u32, max_fund_loss: u32, degrade: bool) -> Result<(), String> {
    let mut session = super::open_session(file)?;
    let outcome = session
        .tax_resources(amount, max_fund_loss)
        .await
        .map_err(|e| e.to_string())?;

    println!(
        "  Funds {}, Resources tax {}",
        outcome.funds, outcome.resources_tax
    );
    if !outcome.overtaxed {
        return Ok(());
    }

    println!("  {}", "Resources overtaxed.".yellow().bold());
    if degrade {
        session
            .degrade_resources()
            .await
            .map_err(|e| e.to_string())?;
        println!(
            "  Resources degraded to {}.",
            session.record().stats.resources.exponent
        );
    } else {
        println!("  {}", "Rerun with --degrade to reduce the exponent.".dimmed());
    }
    Ok(())
}
