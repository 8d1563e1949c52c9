use crate::entities::spell_registry::SpellRegistry;
use crate::entities::spells::{SpellDefinition, SpellId};
use crate::telemetry::logging;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    ReloadSpells,
    SpellInfo { id: SpellId },
    FindSpell { words: String },
    Unknown(String),
}

pub fn parse_admin_command(message: &str) -> Result<Option<AdminCommand>, String> {
    let trimmed = message.trim();
    let Some(body) = trimmed.strip_prefix('!') else {
        return Ok(None);
    };

    let (command, rest) = match body.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (body, ""),
    };
    if command.is_empty() {
        return Err("admin command missing name".to_string());
    }
    let command = command.to_ascii_lowercase();
    let parsed = match command.as_str() {
        "reloadspells" | "spellreload" => AdminCommand::ReloadSpells,
        "spell" | "spellinfo" => AdminCommand::SpellInfo {
            id: parse_spell_id(rest)?,
        },
        "findspell" => {
            if rest.is_empty() {
                return Err("admin command missing spell words".to_string());
            }
            AdminCommand::FindSpell {
                words: rest.to_string(),
            }
        }
        _ => AdminCommand::Unknown(command),
    };
    Ok(Some(parsed))
}

fn parse_spell_id(value: &str) -> Result<SpellId, String> {
    if value.is_empty() {
        return Err("admin command missing spell number".to_string());
    }
    value
        .parse::<u16>()
        .map(SpellId)
        .map_err(|_| format!("admin command expected spell number, got '{value}'"))
}

/// Runs `command` and returns the reply shown to the administrator.
pub fn execute_admin_command(command: &AdminCommand, registry: &SpellRegistry) -> String {
    match command {
        AdminCommand::ReloadSpells => {
            logging::log_game("admin: spell reload requested");
            match registry.reload() {
                Ok(report) if report.changed => {
                    format!("spells reloaded: {} spells from {}", report.valid, report.source)
                }
                Ok(report) => format!("spells reloaded: {} spells, source unchanged", report.valid),
                Err(err) => format!("spell reload failed: {}", err),
            }
        }
        AdminCommand::SpellInfo { id } => match registry.get(*id) {
            Some(spell) if spell.is_valid() => describe_spell(*id, &spell),
            _ => format!("spell {} does not exist", id.0),
        },
        AdminCommand::FindSpell { words } => {
            let table = registry.snapshot();
            match table.find_by_words(words).and_then(|id| Some((id, table.get(id)?))) {
                Some((id, spell)) => describe_spell(id, spell),
                None => format!("no spell for '{}'", words),
            }
        }
        AdminCommand::Unknown(name) => format!("unknown admin command '{}'", name),
    }
}

pub fn describe_spell(id: SpellId, spell: &SpellDefinition) -> String {
    let mut line = format!(
        "spell {}: {} \"{}\" level {} mana {} soul {}",
        id.0,
        spell.comment(),
        spell.words.spoken(),
        spell.level,
        spell.mana,
        spell.soul_points
    );
    if spell.has_rune() {
        line.push_str(&format!(
            " rune {}/{} x{} runelevel {}",
            spell.rune_group, spell.rune_number, spell.amount, spell.rune_level
        ));
    }
    line.push_str(&format!(" flags {} params {:?}", spell.flags, spell.params));
    if spell.template != 0 {
        line.push_str(&format!(" template {}", spell.template));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_admin_command_ignores_non_command() {
        assert_eq!(parse_admin_command("exura").unwrap(), None);
    }

    #[test]
    fn parse_admin_command_parses_reload() {
        assert_eq!(
            parse_admin_command("!ReloadSpells").unwrap(),
            Some(AdminCommand::ReloadSpells)
        );
    }

    #[test]
    fn parse_admin_command_parses_spell_number() {
        assert_eq!(
            parse_admin_command("!spell 12").unwrap(),
            Some(AdminCommand::SpellInfo { id: SpellId(12) })
        );
        assert!(parse_admin_command("!spell").is_err());
        assert!(parse_admin_command("!spell twelve").is_err());
    }

    #[test]
    fn parse_admin_command_keeps_spell_words() {
        assert_eq!(
            parse_admin_command("!findspell  exura gran ").unwrap(),
            Some(AdminCommand::FindSpell {
                words: "exura gran".to_string()
            })
        );
    }

    #[test]
    fn execute_admin_command_against_builtin_spells() {
        let dir = std::env::temp_dir().join(format!("tibia-spells-admin-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let registry = SpellRegistry::new(&dir);
        registry.init().unwrap();

        let reply = execute_admin_command(&AdminCommand::SpellInfo { id: SpellId(4) }, &registry);
        assert_eq!(
            reply,
            "spell 4: Intense Healing Rune \"adura gran\" level 15 mana 240 soul 2 \
             rune 79/5 x1 runelevel 1 flags 8 params [0, 0, 0, 0]"
        );
        let reply = execute_admin_command(
            &AdminCommand::FindSpell {
                words: "utevo lux".to_string(),
            },
            &registry,
        );
        assert!(reply.starts_with("spell 10: Light"));
        let reply = execute_admin_command(&AdminCommand::SpellInfo { id: SpellId(36) }, &registry);
        assert_eq!(reply, "spell 36 does not exist");
        let reply = execute_admin_command(&AdminCommand::ReloadSpells, &registry);
        assert_eq!(reply, "spells reloaded: 66 spells, source unchanged");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
