use std::path::PathBuf;
use tibia_spells::entities::dynamic_string::StringPool;
use tibia_spells::entities::spell_definitions::seed_builtin_spells;
use tibia_spells::entities::spell_registry::build_spell_table;
use tibia_spells::world::spells_dat::SPELLS_FILE_NAME;
use tibia_spells::{SpellDefinition, SpellId, SpellTable, MAX_SPELLS};

fn compare(id: SpellId, file: &SpellDefinition, builtin: &SpellDefinition, out: &mut Vec<String>) {
    let name = builtin.comment();
    let mut check = |field: &str, file_value: String, builtin_value: String| {
        if file_value != builtin_value {
            out.push(format!(
                "{} ({}) {}: file={} builtin={}",
                id.0, name, field, file_value, builtin_value
            ));
        }
    };
    check("comment", file.comment().to_string(), builtin.comment().to_string());
    check("words", file.words.spoken(), builtin.words.spoken());
    check("level", file.level.to_string(), builtin.level.to_string());
    check("mana", file.mana.to_string(), builtin.mana.to_string());
    check("soul", file.soul_points.to_string(), builtin.soul_points.to_string());
    check("flags", file.flags.to_string(), builtin.flags.to_string());
    check(
        "rune",
        format!("{}/{}", file.rune_group, file.rune_number),
        format!("{}/{}", builtin.rune_group, builtin.rune_number),
    );
    check("runelevel", file.rune_level.to_string(), builtin.rune_level.to_string());
    check("amount", file.amount.to_string(), builtin.amount.to_string());
}

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    let Some(data_dir) = args.get(1).map(PathBuf::from) else {
        return Err("usage: spell_validate <data-dir>".to_string());
    };
    if !data_dir.join(SPELLS_FILE_NAME).is_file() {
        return Err(format!(
            "{} has no {}",
            data_dir.display(),
            SPELLS_FILE_NAME
        ));
    }

    let mut pool = StringPool::new();
    let (file_table, report) =
        build_spell_table(&data_dir, &mut pool).map_err(|err| err.to_string())?;
    let mut builtin = SpellTable::new();
    seed_builtin_spells(&mut builtin).map_err(|err| err.to_string())?;

    let mut missing = Vec::new();
    let mut extra = Vec::new();
    let mut mismatches = Vec::new();
    for number in 1..MAX_SPELLS as u16 {
        let id = SpellId(number);
        match (file_table.is_valid(id), builtin.is_valid(id)) {
            (true, true) => {
                if let (Some(file), Some(seed)) = (file_table.get(id), builtin.get(id)) {
                    compare(id, file, seed, &mut mismatches);
                }
            }
            (false, true) => missing.push(id),
            (true, false) => extra.push(id),
            (false, false) => {}
        }
    }

    println!("spell data check:");
    println!("- source: {}", report.source);
    println!("- file spells: {}", report.valid);
    println!("- builtin spells: {}", builtin.valid_count());
    println!("- templated: {}", report.templated);
    println!("- missing from file: {}", missing.len());
    println!("- only in file: {}", extra.len());
    println!("- mismatches: {}", mismatches.len());
    for id in &missing {
        println!("missing: {}", id.0);
    }
    for id in &extra {
        println!("only in file: {}", id.0);
    }
    if !mismatches.is_empty() {
        println!("mismatches:");
        for mismatch in mismatches {
            println!("- {}", mismatch);
        }
        return Err("spell data differs from builtin list".to_string());
    }

    Ok(())
}
