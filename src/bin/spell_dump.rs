use serde::Serialize;
use std::path::PathBuf;
use tibia_spells::entities::dynamic_string::StringPool;
use tibia_spells::entities::spell_definitions::seed_builtin_spells;
use tibia_spells::entities::spell_registry::build_spell_table;
use tibia_spells::world::spells_dat::write_spells_dat;
use tibia_spells::{SpellDefinition, SpellTable};

const USAGE: &str = "usage: spell_dump (<data-dir> | --builtin) [--dat]";

#[derive(Serialize)]
struct SpellDumpEntry<'a> {
    number: u16,
    spoken: String,
    #[serde(flatten)]
    spell: &'a SpellDefinition,
}

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_dat = args.iter().any(|arg| arg == "--dat");
    let builtin = args.iter().any(|arg| arg == "--builtin");
    let data_dir = args.iter().find(|arg| !arg.starts_with("--")).map(PathBuf::from);

    let table = if builtin {
        let mut table = SpellTable::new();
        seed_builtin_spells(&mut table).map_err(|err| err.to_string())?;
        table
    } else {
        let data_dir = data_dir.ok_or_else(|| USAGE.to_string())?;
        let mut pool = StringPool::new();
        let (table, report) =
            build_spell_table(&data_dir, &mut pool).map_err(|err| err.to_string())?;
        eprintln!("spell_dump: {} spells from {}", report.valid, report.source);
        table
    };

    if as_dat {
        print!("{}", write_spells_dat(&table));
        return Ok(());
    }

    let entries: Vec<SpellDumpEntry<'_>> = table
        .iter_valid()
        .map(|(id, spell)| SpellDumpEntry {
            number: id.0,
            spoken: spell.words.spoken(),
            spell,
        })
        .collect();
    let yaml =
        serde_yaml::to_string(&entries).map_err(|err| format!("yaml encode failed: {}", err))?;
    print!("{}", yaml);
    Ok(())
}
