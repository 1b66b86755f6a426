use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use pyre_core::{StatKey, StatRef};
use pyre_mechanics::TrackingState;

pub fn run(file: &Path, json: bool) -> Result<(), String> {
    let session = super::open_session(file)?;
    let record = session.record();
    let snap = session.snapshot();

    if json {
        let out = serde_json::to_string_pretty(snap).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        record.name.bold(),
        format!("({}, revision {})", record.kind, record.revision).dimmed()
    );
    println!(
        "  Fate {}  Persona {}  Deeds {}",
        record.fate, record.persona, record.deeds
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ability", "Exp", "Routine", "Difficult", "Challenging", ""]);

    let mut abilities: Vec<(StatRef, String)> = StatKey::ALL
        .into_iter()
        .map(|k| (StatRef::Stat(k), record.stats.display_name(k).to_string()))
        .collect();
    abilities.extend(
        snap.skill_tests
            .keys()
            .filter_map(|id| record.item(*id).ok().map(|i| (StatRef::Skill(*id), i.name.clone()))),
    );

    for (target, name) in &abilities {
        let Ok(ability) = record.ability(*target) else {
            continue;
        };
        let needed = snap.tests_needed(*target);
        let state = match snap.tracking_state(record, *target) {
            Ok(TrackingState::Eligible) => "ready to advance".green().to_string(),
            _ => String::new(),
        };
        table.add_row(vec![
            name.clone(),
            format!("{}{}", ability.shade, ability.exponent),
            format!("{}/{}", ability.routine, needed.routine),
            format!("{}/{}", ability.difficult, needed.difficult),
            format!("{}/{}", ability.challenging, needed.challenging),
            state,
        ]);
    }
    println!("{table}");
    println!();

    println!("  {:<14} {}", "Reflexes", snap.reflexes);
    println!("  {:<14} {}", "Mortal wound", snap.mortal_wound);
    println!("  {:<14} {}", "Hesitation", snap.hesitation);
    println!("  {:<14} {}", "Thresholds", snap.thresholds);
    let wound_dice = if snap.wound_dice() > 0 {
        snap.wound_dice().to_string().red().to_string()
    } else {
        "0".to_string()
    };
    println!(
        "  {:<14} {}  (superficial {}, +{} Ob)",
        "Wound dice", wound_dice, snap.pain.superficial_count, snap.pain.ob_penalty
    );
    println!(
        "  {:<14} {} spells, Ob {}",
        "Sustained", snap.sustained.max_sustained, snap.sustained.max_ob_sustained
    );

    let names = snap.modifiers.roll_names();
    if !names.is_empty() {
        println!();
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Roll", "Dice", "Ob", "Source", "Optional"]);
        for name in names {
            for m in snap.modifiers.bucket(name) {
                let optional = if m.optional { "yes" } else { "" };
                table.add_row(vec![
                    name.to_string(),
                    m.dice.map(|d| format!("{d:+}")).unwrap_or_default(),
                    m.obstacle.map(|o| format!("{o:+}")).unwrap_or_default(),
                    m.label.clone(),
                    optional.to_string(),
                ]);
            }
        }
        println!("{table}");
    }

    let inv = &snap.inventory;
    if !inv.forks.is_empty() {
        let forks: Vec<&str> = inv.forks.iter().map(|s| s.name.as_str()).collect();
        println!("  {:<14} {}", "Forks", forks.join(", "));
    }
    if !inv.toolkits.is_empty() {
        println!("  {:<14} {}", "Toolkits", inv.toolkits.join(", "));
    }
    if !inv.circles_bonus.is_empty() || !inv.circles_malus.is_empty() {
        println!("  {:<14} {:+}", "Circles", inv.circles_net());
    }

    Ok(())
}
