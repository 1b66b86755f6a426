use std::path::Path;

pub async fn run(file: &Path, item: &str, equipped: bool) -> Result<(), String> {
    let mut session = super::open_session(file)?;
    let id = session
        .record()
        .find_item(item)
        .map(|i| i.id)
        .ok_or_else(|| format!("no item named '{item}'"))?;

    session
        .set_equipped(id, equipped)
        .await
        .map_err(|e| e.to_string())?;

    let penalties = session.snapshot().encumbrance;
    println!(
        "  {} {item}.",
        if equipped { "Equipped" } else { "Unequipped" }
    );
    println!(
        "  Clumsy weight: helm Ob {}, health/forte Ob {}, agility Ob {}, speed -{}D/+{} Ob",
        penalties.helmet_ob,
        penalties.health_forte,
        penalties.agility,
        penalties.speed_dice,
        penalties.speed_ob
    );
    Ok(())
}
