pub mod admin;
mod config;
pub mod entities;
pub mod error;
pub mod scripting;
pub mod telemetry;
pub mod world;

pub use config::AppConfig;
pub use entities::spell_registry::{LoadReport, SpellRegistry, SpellSource};
pub use entities::spells::{SpellDefinition, SpellId, SpellTable, MAX_SPELLS};
pub use entities::syllables::{SpellWord, MAX_SPELL_SYLLABLES};
pub use error::{ScriptErrorKind, SpellError, WordError};

pub fn run(args: &[String]) -> Result<(), String> {
    let config = AppConfig::from_args(args)?;
    telemetry::logging::init(&config.root)?;

    let registry = SpellRegistry::new(&config.data_dir);
    let report = registry
        .init()
        .map_err(|err| format!("tibia-spells: spell load failed: {}", err))?;
    let table = registry.snapshot();
    let runes = table.iter_valid().filter(|(_, spell)| spell.has_rune()).count();

    println!("tibia-spells: spell list");
    println!("- root: {}", config.root.display());
    println!("- data dir: {}", config.data_dir.display());
    println!("- source: {}", report.source);
    println!("- number blocks: {}", report.blocks);
    println!("- valid spells: {}", report.valid);
    println!("- rune spells: {}", runes);
    println!("- templated spells: {}", report.templated);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    admin::console::run_console(&registry, stdin.lock(), &mut stdout)
}
