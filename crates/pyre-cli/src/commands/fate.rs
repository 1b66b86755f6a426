use std::path::Path;

use colored::Colorize;
use pyre_core::{PtgsAction, StatKey, StatRef};
use pyre_mechanics::{FateRerollRequest, RandomRoller, RerollTarget, TestDifficulty};

pub struct FateArgs {
    pub stat: String,
    pub dice: Vec<u32>,
    pub successes: u32,
    pub ob: u32,
    pub difficulty: String,
    pub root: Option<String>,
    pub ptgs: Option<String>,
    pub seed: u64,
}

pub async fn run(file: &Path, args: FateArgs) -> Result<(), String> {
    let difficulty: TestDifficulty = args.difficulty.parse()?;
    let ptgs_action = args.ptgs.as_deref().map(parse_ptgs).transpose()?;
    let mut session = super::open_session(file)?;

    let target = match session.resolve(&args.stat).map_err(|e| e.to_string())? {
        StatRef::Stat(key) => {
            if args.root.is_some() {
                return Err(format!("{} is not a skill; --root needs a skill", args.stat));
            }
            RerollTarget::Stat(key)
        }
        StatRef::Skill(skill) => match args.root.as_deref() {
            None => RerollTarget::Skill(skill),
            Some(root) if root.eq_ignore_ascii_case("skill") => RerollTarget::Learning {
                skill,
                root: None,
            },
            Some(root) => RerollTarget::Learning {
                skill,
                root: Some(root_stat(&session, root)?),
            },
        },
    };

    let request = FateRerollRequest {
        target,
        faces: args.dice,
        successes: args.successes,
        obstacle: args.ob,
        difficulty,
        ptgs_action,
    };
    let mut roller = RandomRoller::seeded(args.seed);
    let report = session
        .fate_reroll(&request, &mut roller)
        .await
        .map_err(|e| e.to_string())?;

    let verdict = if report.success {
        "success".green().bold()
    } else {
        "failure".red().bold()
    };
    println!(
        "  {} fate reroll: {} -> {}",
        report.roll_name, report.original, report.rerolled
    );
    println!(
        "  {} + {} vs Ob {}: {verdict}",
        report.successes, report.new_successes, report.obstacle
    );
    if report.flipped {
        println!("  {}", "Saved by fate.".green());
    }
    if let Some(proposal) = &report.proposal {
        println!("  {}", proposal.to_string().green().bold());
    }
    println!("  Fate remaining: {}", report.fate_remaining);
    Ok(())
}

fn parse_ptgs(s: &str) -> Result<PtgsAction, String> {
    match s.trim().to_lowercase().as_str() {
        "shrugging" | "shrug" => Ok(PtgsAction::Shrugging),
        "gritting" | "grit" => Ok(PtgsAction::Gritting),
        other => Err(format!("unknown pain flag: {other}")),
    }
}

fn root_stat<P: pyre_mechanics::Persistence>(
    session: &pyre_mechanics::CharacterSession<P>,
    name: &str,
) -> Result<StatKey, String> {
    session
        .record()
        .stats
        .find_by_name(name)
        .ok_or_else(|| format!("unknown stat: {name}"))
}
