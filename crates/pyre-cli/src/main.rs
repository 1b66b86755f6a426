//! CLI frontend for the Pyre rules engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pyre",
    about = "Pyre: derived stats, tests, and advancement for dice-pool characters",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a character's derived sheet
    Sheet {
        /// Character JSON file
        file: PathBuf,

        /// Print the derived snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log a test against a stat or skill
    Test {
        /// Character JSON file
        file: PathBuf,

        /// Stat or skill name (case-insensitive)
        stat: String,

        /// Difficulty: routine, difficult, challenging, routine/difficult
        difficulty: String,

        /// The test failed
        #[arg(long)]
        failed: bool,

        /// Confirm the advancement if the test makes the ability eligible
        #[arg(long)]
        advance: bool,
    },

    /// Spend a fate point to reroll part of a finished roll
    Fate {
        /// Character JSON file
        file: PathBuf,

        /// Stat or skill that was rolled
        stat: String,

        /// Faces of the original roll, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        dice: Vec<u32>,

        /// Successes the original roll scored
        #[arg(long)]
        successes: u32,

        /// Obstacle of the original roll
        #[arg(long)]
        ob: u32,

        /// Difficulty group of the original roll
        #[arg(long, default_value = "difficult")]
        difficulty: String,

        /// Beginner's luck: the stat the skill was rolled with
        #[arg(long)]
        root: Option<String>,

        /// Pain flag to set if the reroll saves the roll: shrugging or gritting
        #[arg(long)]
        ptgs: Option<String>,

        /// RNG seed for the reroll
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Tax Resources after a failed Resources test
    Tax {
        /// Character JSON file
        file: PathBuf,

        /// Tax amount
        amount: u32,

        /// Funds dice the player will spend before Resources is taxed
        #[arg(long, default_value = "0")]
        max_fund_loss: u32,

        /// Degrade Resources if the tax reaches the exponent
        #[arg(long)]
        degrade: bool,
    },

    /// Equip or unequip an armor item
    Equip {
        /// Character JSON file
        file: PathBuf,

        /// Armor item name (case-insensitive)
        item: String,

        /// Unequip instead
        #[arg(long)]
        off: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PYRE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sheet { file, json } => commands::sheet::run(&file, json),
        Commands::Test {
            file,
            stat,
            difficulty,
            failed,
            advance,
        } => commands::test::run(&file, &stat, &difficulty, !failed, advance).await,
        Commands::Fate {
            file,
            stat,
            dice,
            successes,
            ob,
            difficulty,
            root,
            ptgs,
            seed,
        } => {
            let args = commands::fate::FateArgs {
                stat,
                dice,
                successes,
                ob,
                difficulty,
                root,
                ptgs,
                seed,
            };
            commands::fate::run(&file, args).await
        }
        Commands::Tax {
            file,
            amount,
            max_fund_loss,
            degrade,
        } => commands::tax::run(&file, amount, max_fund_loss, degrade).await,
        Commands::Equip { file, item, off } => commands::equip::run(&file, &item, !off).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
