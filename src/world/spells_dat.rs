use crate::entities::dynamic_string::StringPool;
use crate::entities::spells::{log_spell_debug, SpellDefinition, SpellTable, MAX_SPELLS};
use crate::entities::syllables::SpellWord;
use crate::error::{ScriptErrorKind, SpellError};
use crate::scripting::script::{read_script_text, ScriptReader, Token};
use std::path::Path;

pub const SPELLS_FILE_NAME: &str = "spells.dat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpellProperty {
    Number,
    Mana,
    Level,
    Flags,
    RuneGroup,
    RuneNumber,
    RuneLevel,
    SoulPoints,
    Amount,
    Template,
    Param(usize),
    Effect,
    Animation,
    Words,
    Comment,
}

// Several names write the same slot so data files can say what a parameter
// means for the spell at hand.
const PROPERTIES: &[(&str, SpellProperty)] = &[
    ("number", SpellProperty::Number),
    ("mana", SpellProperty::Mana),
    ("level", SpellProperty::Level),
    ("flags", SpellProperty::Flags),
    ("runegroup", SpellProperty::RuneGroup),
    ("runenumber", SpellProperty::RuneNumber),
    ("runelevel", SpellProperty::RuneLevel),
    ("soulpoints", SpellProperty::SoulPoints),
    ("amount", SpellProperty::Amount),
    ("template", SpellProperty::Template),
    ("based_on", SpellProperty::Template),
    ("param1", SpellProperty::Param(0)),
    ("param2", SpellProperty::Param(1)),
    ("param3", SpellProperty::Param(2)),
    ("param4", SpellProperty::Param(3)),
    ("effect", SpellProperty::Effect),
    ("visual_effect", SpellProperty::Effect),
    ("visualeffect", SpellProperty::Effect),
    ("animation", SpellProperty::Animation),
    ("missile_animation", SpellProperty::Animation),
    ("missileanimation", SpellProperty::Animation),
    ("min", SpellProperty::Param(0)),
    ("min_damage", SpellProperty::Param(0)),
    ("mindamage", SpellProperty::Param(0)),
    ("delta", SpellProperty::Param(1)),
    ("delta_damage", SpellProperty::Param(1)),
    ("deltadamage", SpellProperty::Param(1)),
    ("radius", SpellProperty::Param(2)),
    ("angle", SpellProperty::Param(3)),
    ("brightness", SpellProperty::Param(0)),
    ("duration", SpellProperty::Param(1)),
    ("speed_percent", SpellProperty::Param(0)),
    ("speedpercent", SpellProperty::Param(0)),
    ("arrow_type", SpellProperty::Param(0)),
    ("arrowtype", SpellProperty::Param(0)),
    ("arrow_count", SpellProperty::Param(1)),
    ("arrowcount", SpellProperty::Param(1)),
    ("words", SpellProperty::Words),
    ("comment", SpellProperty::Comment),
];

fn lookup_property(name: &str) -> Option<SpellProperty> {
    PROPERTIES
        .iter()
        .find(|(property, _)| *property == name)
        .map(|(_, property)| *property)
}

/// Reads `path` into a fresh table. Templates are not applied here.
pub fn load_spells_dat(path: &Path, pool: &mut StringPool) -> Result<SpellTable, SpellError> {
    let content = read_script_text(path)?;
    let mut table = SpellTable::new();
    parse_spells_dat(&path.display().to_string(), &content, &mut table, pool)?;
    Ok(table)
}

/// Applies every statement in `content` to `table` and returns how many
/// `number` blocks were read. The first bad statement aborts the parse.
pub fn parse_spells_dat(
    origin: &str,
    content: &str,
    table: &mut SpellTable,
    pool: &mut StringPool,
) -> Result<usize, SpellError> {
    let mut reader = ScriptReader::new(origin, content);
    let mut current: Option<usize> = None;
    let mut blocks = 0usize;

    loop {
        let name = match reader.next_token()? {
            Token::EndOfFile => break,
            Token::Identifier(name) => name,
            _ => return Err(reader.error(ScriptErrorKind::Expected("identifier"))),
        };
        reader.read_symbol('=')?;
        let property = lookup_property(&name);

        if property == Some(SpellProperty::Number) {
            let value = reader.read_number()?;
            let number = usize::try_from(value)
                .ok()
                .filter(|number| *number < MAX_SPELLS)
                .ok_or_else(|| reader.error(ScriptErrorKind::IllegalSpellNumber(value)))?;
            table.reset(number);
            current = Some(number);
            blocks += 1;
            log_spell_debug(&format!("{}:{}: spell {}", origin, reader.line(), number));
            continue;
        }

        let Some(number) = current else {
            return Err(reader.error(ScriptErrorKind::PropertyBeforeNumber));
        };
        let Some(property) = property else {
            return Err(reader.error(ScriptErrorKind::UnknownProperty(name)));
        };
        let spell = table
            .slot_mut(number)
            .ok_or_else(|| reader.error(ScriptErrorKind::IllegalSpellNumber(number as i64)))?;
        apply_property(&mut reader, spell, property, &name, pool)?;
    }

    Ok(blocks)
}

fn apply_property(
    reader: &mut ScriptReader<'_>,
    spell: &mut SpellDefinition,
    property: SpellProperty,
    name: &str,
    pool: &mut StringPool,
) -> Result<(), SpellError> {
    match property {
        SpellProperty::Number => {}
        SpellProperty::Mana => spell.mana = read_field(reader, name)?,
        SpellProperty::Level => spell.level = read_field(reader, name)?,
        SpellProperty::Flags => spell.flags = read_field(reader, name)?,
        SpellProperty::RuneGroup => spell.rune_group = read_field(reader, name)?,
        SpellProperty::RuneNumber => spell.rune_number = read_field(reader, name)?,
        SpellProperty::RuneLevel => spell.rune_level = read_field(reader, name)?,
        SpellProperty::SoulPoints => spell.soul_points = read_field(reader, name)?,
        SpellProperty::Amount => spell.amount = read_field(reader, name)?,
        SpellProperty::Template => {
            let value = reader.read_number()?;
            spell.template = u16::try_from(value)
                .ok()
                .filter(|template| usize::from(*template) < MAX_SPELLS)
                .ok_or_else(|| reader.error(ScriptErrorKind::IllegalTemplate(value)))?;
        }
        SpellProperty::Param(slot) => spell.params[slot] = read_field(reader, name)?,
        SpellProperty::Effect => spell.effect = read_field(reader, name)?,
        SpellProperty::Animation => spell.animation = read_field(reader, name)?,
        SpellProperty::Words => spell.words = read_words(reader)?,
        SpellProperty::Comment => {
            let text = reader.read_string()?;
            spell.comment = Some(pool.add(&text));
        }
    }
    Ok(())
}

fn read_field<T: TryFrom<i64>>(reader: &mut ScriptReader<'_>, name: &str) -> Result<T, SpellError> {
    let value = reader.read_number()?;
    T::try_from(value).map_err(|_| {
        reader.error(ScriptErrorKind::NumberOutOfRange {
            property: name.to_string(),
            value,
        })
    })
}

fn read_words(reader: &mut ScriptReader<'_>) -> Result<SpellWord, SpellError> {
    reader.read_symbol('{')?;
    let mut word = SpellWord::new();
    loop {
        match reader.next_token()? {
            Token::Special('}') => return Ok(word),
            Token::Special(',') => {}
            Token::Identifier(syllable) => word
                .push_name(&syllable)
                .map_err(|err| reader.error(err.into()))?,
            Token::EndOfFile => return Err(reader.error(ScriptErrorKind::UnterminatedWords)),
            _ => return Err(reader.error(ScriptErrorKind::Expected("syllable"))),
        }
    }
}

/// Renders every non-empty slot of `table` in the `spells.dat` format.
pub fn write_spells_dat(table: &SpellTable) -> String {
    let mut out = String::from("# spells.dat\n");
    let empty = SpellDefinition::default();
    for number in 1..MAX_SPELLS {
        let Some(spell) = table.slot(number) else {
            continue;
        };
        if *spell == empty {
            continue;
        }
        out.push('\n');
        out.push_str(&format!("number = {}\n", number));
        if !spell.words.is_empty() {
            let names: Vec<&str> = spell.words.names().collect();
            out.push_str(&format!("words = {{{}}}\n", names.join(", ")));
        }
        for (name, value) in [
            ("template", i64::from(spell.template)),
            ("level", i64::from(spell.level)),
            ("mana", i64::from(spell.mana)),
            ("flags", i64::from(spell.flags)),
            ("runegroup", i64::from(spell.rune_group)),
            ("runenumber", i64::from(spell.rune_number)),
            ("runelevel", i64::from(spell.rune_level)),
            ("soulpoints", i64::from(spell.soul_points)),
            ("amount", i64::from(spell.amount)),
            ("param1", i64::from(spell.params[0])),
            ("param2", i64::from(spell.params[1])),
            ("param3", i64::from(spell.params[2])),
            ("param4", i64::from(spell.params[3])),
            ("effect", i64::from(spell.effect)),
            ("animation", i64::from(spell.animation)),
        ] {
            if value != 0 {
                out.push_str(&format!("{} = {}\n", name, value));
            }
        }
        if let Some(comment) = spell.comment.as_deref() {
            out.push_str(&format!("comment = \"{}\"\n", escape_string(comment)));
        }
    }
    out
}

fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::spell_definitions::seed_builtin_spells;
    use crate::entities::spells::SpellId;
    use crate::entities::syllables::find_syllable;

    fn parse(content: &str) -> Result<SpellTable, SpellError> {
        let mut table = SpellTable::new();
        let mut pool = StringPool::new();
        parse_spells_dat("spells.dat", content, &mut table, &mut pool)?;
        Ok(table)
    }

    fn kind(content: &str) -> ScriptErrorKind {
        let err = parse(content).expect_err("parse should fail");
        err.script_kind().cloned().expect("script error")
    }

    #[test]
    fn parses_single_record() {
        let table = parse("number = 5\nmana = 100\nwords = { ex ura }\ncomment = \"Test\"\n")
            .expect("parse");
        let spell = table.get(SpellId(5)).expect("spell 5");
        assert_eq!(spell.mana, 100);
        assert_eq!(
            spell.words.as_slice(),
            &[find_syllable("ex").unwrap(), find_syllable("ura").unwrap()]
        );
        assert_eq!(spell.comment(), "Test");
        assert!(table.is_valid(SpellId(5)));
    }

    #[test]
    fn aliases_write_the_same_slots() {
        let table = parse(
            "number = 9\n\
             min_damage = 10 delta = 20 radius = 3 angle = 45\n\
             visual_effect = 7 missileanimation = 4 based_on = 2\n\
             number = 10 brightness = 6 duration = 500\n\
             number = 11 speed_percent = 30 arrow_count = 5\n",
        )
        .expect("parse");
        let spell = table.get(SpellId(9)).unwrap();
        assert_eq!(spell.params, [10, 20, 3, 45]);
        assert_eq!(spell.effect, 7);
        assert_eq!(spell.animation, 4);
        assert_eq!(spell.template, 2);
        assert_eq!(table.get(SpellId(10)).unwrap().params, [6, 500, 0, 0]);
        assert_eq!(table.get(SpellId(11)).unwrap().params, [30, 5, 0, 0]);
    }

    #[test]
    fn number_statement_resets_record() {
        let table = parse(
            "number = 3 mana = 50 comment = \"Old\"\n\
             number = 3 level = 8\n",
        )
        .expect("parse");
        let spell = table.get(SpellId(3)).unwrap();
        assert_eq!(spell.mana, 0);
        assert_eq!(spell.level, 8);
        assert!(!spell.is_valid());
    }

    #[test]
    fn comma_separated_words_are_accepted() {
        let table = parse("number = 2 words = {ex,ura,gran} comment = \"Intense Healing\"")
            .expect("parse");
        assert_eq!(table.get(SpellId(2)).unwrap().words.spoken(), "exura gran");
    }

    #[test]
    fn property_before_number_fails() {
        assert_eq!(kind("mana = 10\nnumber = 1"), ScriptErrorKind::PropertyBeforeNumber);
    }

    #[test]
    fn unknown_property_fails() {
        assert_eq!(
            kind("number = 1\ncooldown = 2"),
            ScriptErrorKind::UnknownProperty("cooldown".to_string())
        );
    }

    #[test]
    fn illegal_spell_number_fails() {
        assert_eq!(kind("number = 256"), ScriptErrorKind::IllegalSpellNumber(256));
        assert_eq!(kind("number = -1"), ScriptErrorKind::IllegalSpellNumber(-1));
    }

    #[test]
    fn unknown_syllable_fails() {
        assert_eq!(
            kind("number = 1 words = { zzz }"),
            ScriptErrorKind::UnknownSyllable("zzz".to_string())
        );
    }

    #[test]
    fn too_many_syllables_fails() {
        assert_eq!(
            kind("number = 1 words = { para para para para para para para para para para para }"),
            ScriptErrorKind::TooManySyllables
        );
    }

    #[test]
    fn unterminated_words_fails() {
        assert_eq!(kind("number = 1 words = { ex ura"), ScriptErrorKind::UnterminatedWords);
    }

    #[test]
    fn narrow_fields_reject_large_values() {
        assert_eq!(
            kind("number = 1 runegroup = 300"),
            ScriptErrorKind::NumberOutOfRange {
                property: "runegroup".to_string(),
                value: 300
            }
        );
        assert_eq!(kind("number = 1 template = 256"), ScriptErrorKind::IllegalTemplate(256));
    }

    #[test]
    fn error_reports_origin_and_line() {
        let err = parse("number = 1\nmana = 10\nbogus = 1\n").unwrap_err();
        assert_eq!(err.to_string(), "spells.dat:3: unknown spell property 'bogus'");
    }

    #[test]
    fn comments_are_pooled() {
        let mut table = SpellTable::new();
        let mut pool = StringPool::new();
        parse_spells_dat(
            "spells.dat",
            "number = 34 comment = \"Get Item\" number = 35 comment = \"Get Item\"",
            &mut table,
            &mut pool,
        )
        .expect("parse");
        assert_eq!(pool.len(), 1);
        let first = table.get(SpellId(34)).unwrap().comment.clone().unwrap();
        let second = table.get(SpellId(35)).unwrap().comment.clone().unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn written_builtin_table_parses_back() {
        let mut seeded = SpellTable::new();
        seed_builtin_spells(&mut seeded).expect("seed");
        let text = write_spells_dat(&seeded);
        let parsed = parse(&text).expect("parse written table");
        assert_eq!(parsed, seeded);
    }

    #[test]
    fn load_spells_dat_reads_file() {
        let dir = std::env::temp_dir().join(format!("tibia-spells-dat-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SPELLS_FILE_NAME);
        std::fs::write(&path, "number = 6\nwords = {ut, ani, hur}\ncomment = \"Haste\"\n").unwrap();

        let mut pool = StringPool::new();
        let table = load_spells_dat(&path, &mut pool).expect("load");
        assert!(table.is_valid(SpellId(6)));

        let missing = load_spells_dat(&dir.join("missing.dat"), &mut pool);
        assert!(matches!(missing, Err(SpellError::Io { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
