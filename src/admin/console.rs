use crate::admin::commands::{execute_admin_command, parse_admin_command};
use crate::entities::spell_registry::SpellRegistry;
use std::io::{BufRead, Write};

const CONSOLE_HELP: &str =
    "commands start with '!' (!spell <nr>, !findspell <words>, !reloadspells, !quit)";

/// Reads admin commands line by line until end of input or `!quit`.
pub fn run_console(
    registry: &SpellRegistry,
    input: impl BufRead,
    output: &mut impl Write,
) -> Result<(), String> {
    for line in input.lines() {
        let line = line.map_err(|err| format!("console read failed: {}", err))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("!quit") {
            break;
        }
        let reply = match parse_admin_command(line) {
            Ok(Some(command)) => execute_admin_command(&command, registry),
            Ok(None) => CONSOLE_HELP.to_string(),
            Err(err) => err,
        };
        writeln!(output, "{}", reply).map_err(|err| format!("console write failed: {}", err))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn run_console_answers_each_command() {
        let dir = std::env::temp_dir().join(format!("tibia-spells-console-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let registry = SpellRegistry::new(&dir);
        registry.init().unwrap();

        let input = Cursor::new("!spell 6\n\n!spell x\n!quit\n!spell 1\n");
        let mut output = Vec::new();
        run_console(&registry, input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("spell 6: Haste \"utani hur\""));
        assert_eq!(lines[1], "admin command expected spell number, got 'x'");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
