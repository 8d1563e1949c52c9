use crate::entities::spells::{SpellDefinition, SpellTable};
use crate::entities::syllables::{SpellWord, MAX_SPELL_SYLLABLES};
use crate::error::SpellError;
use std::sync::Arc;

struct WordLength<const N: usize>;

impl<const N: usize> WordLength<N> {
    const FITS: () = assert!(N <= MAX_SPELL_SYLLABLES, "spell word exceeds syllable capacity");
}

/// Fluent setter over one freshly cleared slot of the built-in list.
pub struct SpellSeed<'a> {
    spell: &'a mut SpellDefinition,
}

impl<'a> SpellSeed<'a> {
    pub fn mana(self, mana: i32) -> Self {
        self.spell.mana = mana;
        self
    }

    pub fn level(self, level: u16) -> Self {
        self.spell.level = level;
        self
    }

    pub fn flags(self, flags: u16) -> Self {
        self.spell.flags = flags;
        self
    }

    pub fn rune(self, group: u8, number: u8) -> Self {
        self.spell.rune_group = group;
        self.spell.rune_number = number;
        self
    }

    pub fn rune_level(self, level: u16) -> Self {
        self.spell.rune_level = level;
        self
    }

    pub fn amount(self, amount: i32) -> Self {
        self.spell.amount = amount;
        self
    }

    pub fn soul_points(self, soul_points: i32) -> Self {
        self.spell.soul_points = soul_points;
        self
    }

    pub fn comment(self, comment: &'static str) -> Self {
        self.spell.comment = Some(Arc::from(comment));
        self
    }
}

/// Clears spell `number` and gives it the spoken word `syllables`. The word
/// length is checked at compile time; syllable names are checked here.
pub fn create<'a, const N: usize>(
    table: &'a mut SpellTable,
    number: u8,
    syllables: [&str; N],
) -> Result<SpellSeed<'a>, SpellError> {
    let () = WordLength::<N>::FITS;
    let words = SpellWord::from_names(syllables).map_err(|kind| SpellError::Seed {
        number: u16::from(number),
        kind,
    })?;
    let spell = table.seed_slot(number);
    spell.words = words;
    Ok(SpellSeed { spell })
}

/// Fills `table` with the spells the server ships with, used when the data
/// directory has no `spells.dat`.
pub fn seed_builtin_spells(table: &mut SpellTable) -> Result<(), SpellError> {
    create(table, 1, ["ex", "ura"])?.mana(25).level(9).flags(8).comment("Light Healing");
    create(table, 2, ["ex", "ura", "gran"])?.mana(40).level(11).flags(8).comment("Intense Healing");
    create(table, 3, ["ex", "ura", "vita"])?
        .mana(160)
        .level(20)
        .flags(8)
        .comment("Ultimate Healing");
    create(table, 4, ["ad", "ura", "gran"])?
        .mana(240)
        .level(15)
        .rune(79, 5)
        .rune_level(1)
        .flags(8)
        .amount(1)
        .soul_points(2)
        .comment("Intense Healing Rune");
    create(table, 5, ["ad", "ura", "vita"])?
        .mana(400)
        .level(24)
        .rune(79, 13)
        .rune_level(4)
        .flags(8)
        .amount(1)
        .soul_points(3)
        .comment("Ultimate Healing Rune");
    create(table, 6, ["ut", "ani", "hur"])?.mana(60).level(14).flags(2).comment("Haste");
    create(table, 7, ["ad", "ori"])?
        .mana(120)
        .level(15)
        .rune(79, 27)
        .flags(9)
        .amount(5)
        .soul_points(1)
        .comment("Light Magic Missile");
    create(table, 8, ["ad", "ori", "gran"])?
        .mana(280)
        .level(25)
        .rune(79, 51)
        .rune_level(4)
        .flags(9)
        .amount(5)
        .soul_points(2)
        .comment("Heavy Magic Missile");
    create(table, 9, ["ut", "evo", "res", "para"])?.level(25).flags(1).comment("Summon Creature");
    create(table, 10, ["ut", "evo", "lux"])?.mana(20).level(8).comment("Light");
    create(table, 11, ["ut", "evo", "gran", "lux"])?.mana(60).level(13).comment("Great Light");
    create(table, 12, ["ad", "eta", "sio"])?
        .mana(200)
        .level(16)
        .rune(79, 30)
        .rune_level(5)
        .flags(1)
        .amount(1)
        .soul_points(3)
        .comment("Convince Creature");
    create(table, 13, ["ex", "evo", "mort", "hur"])?
        .mana(250)
        .level(38)
        .flags(1)
        .comment("Energy Wave");
    create(table, 14, ["ad", "evo", "ina"])?
        .mana(600)
        .level(27)
        .rune(79, 31)
        .rune_level(4)
        .amount(1)
        .soul_points(2)
        .comment("Chameleon");
    create(table, 15, ["ad", "ori", "flam"])?
        .mana(160)
        .level(17)
        .rune(79, 42)
        .rune_level(2)
        .flags(9)
        .amount(2)
        .soul_points(2)
        .comment("Fireball");
    create(table, 16, ["ad", "ori", "gran", "flam"])?
        .mana(480)
        .level(23)
        .rune(79, 44)
        .rune_level(4)
        .flags(9)
        .amount(2)
        .soul_points(3)
        .comment("Great Fireball");
    create(table, 17, ["ad", "evo", "mas", "flam"])?
        .mana(600)
        .level(27)
        .rune(79, 45)
        .rune_level(5)
        .flags(1)
        .amount(2)
        .soul_points(4)
        .comment("Firebomb");
    create(table, 18, ["ad", "evo", "mas", "hur"])?
        .mana(720)
        .level(31)
        .rune(79, 53)
        .rune_level(6)
        .flags(1)
        .amount(3)
        .soul_points(4)
        .comment("Explosion");
    create(table, 19, ["ex", "evo", "flam", "hur"])?
        .mana(80)
        .level(18)
        .flags(9)
        .comment("Fire Wave");
    create(table, 20, ["ex", "iva", "para"])?.mana(20).level(8).comment("Find Person");
    create(table, 21, ["ad", "ori", "vita", "vis"])?
        .mana(880)
        .level(45)
        .rune(79, 8)
        .rune_level(15)
        .flags(1)
        .amount(1)
        .soul_points(5)
        .comment("Sudden Death");
    create(table, 22, ["ex", "evo", "vis", "lux"])?
        .mana(100)
        .level(23)
        .flags(1)
        .comment("Energy Beam");
    create(table, 23, ["ex", "evo", "gran", "vis", "lux"])?
        .mana(200)
        .level(29)
        .flags(1)
        .comment("Great Energy Beam");
    create(table, 24, ["ex", "evo", "gran", "mas", "vis"])?
        .mana(1200)
        .level(60)
        .flags(3)
        .comment("Ultimate Explosion");
    create(table, 25, ["ad", "evo", "grav", "flam"])?
        .mana(240)
        .level(15)
        .rune(79, 41)
        .rune_level(1)
        .flags(1)
        .amount(3)
        .soul_points(1)
        .comment("Fire Field");
    create(table, 26, ["ad", "evo", "grav", "pox"])?
        .mana(200)
        .level(14)
        .rune(79, 25)
        .flags(1)
        .amount(3)
        .soul_points(1)
        .comment("Poison Field");
    create(table, 27, ["ad", "evo", "grav", "vis"])?
        .mana(320)
        .level(18)
        .rune(79, 17)
        .rune_level(3)
        .flags(1)
        .amount(3)
        .soul_points(2)
        .comment("Energy Field");
    create(table, 28, ["ad", "evo", "mas", "grav", "flam"])?
        .mana(780)
        .level(33)
        .rune(79, 43)
        .rune_level(6)
        .flags(1)
        .amount(4)
        .soul_points(4)
        .comment("Fire Wall");
    create(table, 29, ["ex", "ana", "pox"])?.mana(30).level(10).comment("Antidote");
    create(table, 30, ["ad", "ito", "grav"])?
        .mana(120)
        .level(17)
        .rune(79, 1)
        .rune_level(3)
        .amount(3)
        .soul_points(2)
        .comment("Destroy Field");
    create(table, 31, ["ad", "ana", "pox"])?
        .mana(200)
        .level(15)
        .rune(79, 6)
        .amount(1)
        .soul_points(1)
        .comment("Antidote Rune");
    create(table, 32, ["ad", "evo", "mas", "grav", "pox"])?
        .mana(640)
        .level(29)
        .rune(79, 29)
        .rune_level(5)
        .flags(1)
        .amount(4)
        .soul_points(3)
        .comment("Poison Wall");
    create(table, 33, ["ad", "evo", "mas", "grav", "vis"])?
        .mana(1000)
        .level(41)
        .rune(79, 19)
        .rune_level(9)
        .flags(1)
        .amount(4)
        .soul_points(5)
        .comment("Energy Wall");
    create(table, 34, ["al", "evo", "para", "para"])?.comment("Get Item");
    create(table, 35, ["al", "evo", "para"])?.comment("Get Item");
    create(table, 37, ["al", "ani", "para"])?.comment("Move");
    create(table, 38, ["ut", "evo", "res", "ina", "para"])?
        .mana(100)
        .level(23)
        .comment("Creature Illusion");
    create(table, 39, ["ut", "ani", "gran", "hur"])?
        .mana(100)
        .level(20)
        .flags(2)
        .comment("Strong Haste");
    create(table, 40, ["al", "evo", "cogni", "para"])?.comment("Get Experience");
    create(table, 41, ["al", "eta", "para"])?.comment("Change Data");
    create(table, 42, ["ex", "evo", "pan"])?.mana(120).level(14).soul_points(1).comment("Food");
    create(table, 44, ["ut", "amo", "vita"])?.mana(50).level(14).comment("Magic Shield");
    create(table, 45, ["ut", "ana", "vid"])?.mana(440).level(35).comment("Invisible");
    create(table, 46, ["al", "evo", "cogni", "para", "para"])?.comment("Get Skill Experience");
    create(table, 47, ["al", "ani", "sio", "para"])?.comment("Teleport to Friend");
    create(table, 48, ["ex", "evo", "con", "pox"])?
        .mana(130)
        .level(16)
        .soul_points(2)
        .comment("Poisoned Arrow");
    create(table, 49, ["ex", "evo", "con", "flam"])?
        .mana(290)
        .level(25)
        .soul_points(3)
        .comment("Explosive Arrow");
    create(table, 50, ["ad", "evo", "res", "flam"])?
        .mana(600)
        .level(27)
        .rune(79, 48)
        .rune_level(7)
        .flags(3)
        .amount(2)
        .soul_points(3)
        .comment("Soulfire");
    create(table, 51, ["ex", "evo", "con"])?
        .mana(100)
        .level(13)
        .soul_points(1)
        .comment("Conjure Arrow");
    create(table, 52, ["al", "liber", "sio", "para"])?.comment("Retrieve Friend");
    create(table, 53, ["al", "evo", "res", "para"])?.comment("Summon Wild Creature");
    create(table, 54, ["ad", "ana", "ani"])?
        .mana(1400)
        .level(54)
        .rune(79, 18)
        .rune_level(18)
        .flags(3)
        .amount(1)
        .soul_points(3)
        .comment("Paralyze");
    create(table, 55, ["ad", "evo", "mas", "vis"])?
        .mana(880)
        .level(37)
        .rune(79, 2)
        .rune_level(10)
        .flags(3)
        .amount(2)
        .soul_points(5)
        .comment("Energybomb");
    create(table, 56, ["ex", "evo", "gran", "mas", "pox"])?
        .mana(600)
        .level(50)
        .flags(3)
        .comment("Poison Storm");
    create(table, 57, ["om", "ana", "liber", "para", "para", "para"])?.comment("Banish Account");
    create(table, 58, ["al", "iva", "tera"])?.comment("Get Position");
    create(table, 60, ["om", "ani", "para"])?.comment("Temple Teleport");
    create(table, 61, ["om", "ana", "gran", "liber", "para", "para"])?.comment("Delete Account");
    create(table, 62, ["om", "amo", "para"])?.comment("Set Namerule");
    create(table, 63, ["al", "evo", "vis", "para"])?.comment("Create Gold");
    create(table, 64, ["al", "eta", "vita", "para"])?.comment("Change Profession or Sex");
    create(table, 65, ["om", "isa", "para", "para"])?.comment("Entry in Criminal Record");
    create(table, 66, ["om", "ana", "hora", "para"])?.comment("Namelock");
    create(table, 67, ["om", "ana", "para"])?.comment("Kick Player");
    create(table, 68, ["om", "ana", "gran", "res", "para", "para"])?.comment("Delete Character");
    create(table, 69, ["om", "ana", "vis", "para", "para"])?.comment("Banish IP Address");
    // 70 (om ana res para para para) has no surviving description and would
    // never be valid, so it is not seeded.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::spells::SpellId;

    fn seeded() -> SpellTable {
        let mut table = SpellTable::new();
        seed_builtin_spells(&mut table).expect("seed builtin spells");
        table
    }

    #[test]
    fn builtin_spells_are_valid() {
        let table = seeded();
        assert_eq!(table.valid_count(), 66);
        assert!(!table.is_valid(SpellId(0)));
        assert!(!table.is_valid(SpellId(36)));
        assert!(!table.is_valid(SpellId(43)));
        assert!(!table.is_valid(SpellId(59)));
        assert!(!table.is_valid(SpellId(70)));
        assert!(table.get(SpellId(70)).unwrap().words.is_empty());
    }

    #[test]
    fn builtin_rune_fields() {
        let table = seeded();
        let spell = table.get(SpellId(4)).unwrap();
        assert_eq!(spell.comment(), "Intense Healing Rune");
        assert_eq!(spell.words.spoken(), "adura gran");
        assert_eq!((spell.rune_group, spell.rune_number), (79, 5));
        assert_eq!(spell.mana, 240);
        assert_eq!(spell.level, 15);
        assert_eq!(spell.rune_level, 1);
        assert_eq!(spell.soul_points, 2);
        assert_eq!(spell.amount, 1);
        assert_eq!(spell.flags, 8);
    }

    #[test]
    fn builtin_words_resolve_to_their_spell() {
        let table = seeded();
        for (id, spell) in table.iter_valid() {
            let found = table.find_by_words(&spell.words.spoken()).expect("lookup by words");
            let found_words = &table.get(found).unwrap().words;
            assert_eq!(found_words, &spell.words, "spell {:?}", id);
        }
        assert_eq!(table.find_by_rune(79, 42), Some(SpellId(15)));
    }

    #[test]
    fn create_rejects_unknown_syllable() {
        let mut table = SpellTable::new();
        let err = create(&mut table, 1, ["ex", "nope"]).err().expect("unknown syllable");
        assert!(matches!(err, SpellError::Seed { number: 1, .. }));
    }

    #[test]
    fn create_clears_previous_contents() {
        let mut table = SpellTable::new();
        create(&mut table, 3, ["ex", "ura"]).unwrap().mana(10).comment("First");
        create(&mut table, 3, ["ex", "ura", "vita"]).unwrap().level(20);
        let spell = table.get(SpellId(3)).unwrap();
        assert_eq!(spell.mana, 0);
        assert_eq!(spell.level, 20);
        assert!(!spell.is_valid());
    }
}
