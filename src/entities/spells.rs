use crate::entities::dynamic_string::DynamicString;
use crate::entities::syllables::{parse_spoken_words, SpellWord};
use crate::telemetry::logging;
use serde::Serialize;
use std::sync::OnceLock;

pub const MAX_SPELLS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SpellId(pub u16);

impl SpellId {
    /// Table slot for this id; `None` for the reserved id 0 and anything
    /// past the table.
    pub fn index(self) -> Option<usize> {
        let index = usize::from(self.0);
        (index > 0 && index < MAX_SPELLS).then_some(index)
    }
}

/// One spell as read from `spells.dat`. Numeric fields use 0 for "not set";
/// a set template fills those from the referenced spell at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpellDefinition {
    pub words: SpellWord,
    pub rune_group: u8,
    pub rune_number: u8,
    pub comment: Option<DynamicString>,
    pub level: u16,
    pub rune_level: u16,
    pub flags: u16,
    pub mana: i32,
    pub soul_points: i32,
    pub amount: i32,
    /// Handler specific values (damage range, radius, duration, ...).
    pub params: [i32; 4],
    pub effect: i32,
    pub animation: i32,
    pub template: u16,
}

impl SpellDefinition {
    pub fn is_valid(&self) -> bool {
        self.comment.as_deref().is_some_and(|comment| !comment.is_empty())
    }

    pub fn comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    pub fn has_rune(&self) -> bool {
        self.rune_group != 0 || self.rune_number != 0
    }

    /// Copies every unset field from `base`. Words and comment belong to the
    /// spell itself and are never taken over.
    pub fn inherit_from(&mut self, base: &SpellDefinition) {
        fn fill<T: Copy + Default + PartialEq>(field: &mut T, base: T) {
            if *field == T::default() {
                *field = base;
            }
        }
        fill(&mut self.mana, base.mana);
        fill(&mut self.soul_points, base.soul_points);
        fill(&mut self.amount, base.amount);
        for (slot, base_value) in self.params.iter_mut().zip(base.params) {
            fill(slot, base_value);
        }
        fill(&mut self.effect, base.effect);
        fill(&mut self.animation, base.animation);
        fill(&mut self.flags, base.flags);
        fill(&mut self.level, base.level);
        fill(&mut self.rune_level, base.rune_level);
        fill(&mut self.rune_group, base.rune_group);
        fill(&mut self.rune_number, base.rune_number);
    }
}

/// Fixed-size spell list indexed by spell number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellTable {
    spells: Box<[SpellDefinition]>,
}

impl Default for SpellTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellTable {
    pub fn new() -> Self {
        Self {
            spells: vec![SpellDefinition::default(); MAX_SPELLS].into_boxed_slice(),
        }
    }

    pub fn is_valid(&self, id: SpellId) -> bool {
        self.get(id).is_some_and(SpellDefinition::is_valid)
    }

    pub fn get(&self, id: SpellId) -> Option<&SpellDefinition> {
        self.spells.get(id.index()?)
    }

    /// Visual effect override of a valid spell, `default` otherwise.
    pub fn effect(&self, id: SpellId, default: i32) -> i32 {
        self.valid(id)
            .map(|spell| spell.effect)
            .filter(|effect| *effect != 0)
            .unwrap_or(default)
    }

    /// Missile animation override of a valid spell, `default` otherwise.
    pub fn animation(&self, id: SpellId, default: i32) -> i32 {
        self.valid(id)
            .map(|spell| spell.animation)
            .filter(|animation| *animation != 0)
            .unwrap_or(default)
    }

    pub fn iter_valid(&self) -> impl Iterator<Item = (SpellId, &SpellDefinition)> {
        self.spells
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, spell)| spell.is_valid())
            .map(|(index, spell)| (SpellId(index as u16), spell))
    }

    pub fn valid_count(&self) -> usize {
        self.iter_valid().count()
    }

    /// Matches typed player input against the spoken words of valid spells.
    pub fn find_by_words(&self, input: &str) -> Option<SpellId> {
        let word = parse_spoken_words(input);
        if word.is_empty() {
            return None;
        }
        self.iter_valid()
            .find(|(_, spell)| spell.words == word)
            .map(|(id, _)| id)
    }

    pub fn find_by_rune(&self, group: u8, number: u8) -> Option<SpellId> {
        if group == 0 && number == 0 {
            return None;
        }
        self.iter_valid()
            .find(|(_, spell)| spell.rune_group == group && spell.rune_number == number)
            .map(|(id, _)| id)
    }

    fn valid(&self, id: SpellId) -> Option<&SpellDefinition> {
        self.get(id).filter(|spell| spell.is_valid())
    }

    /// Clears slot `number` and hands it out for editing. Slot 0 is
    /// addressable here so a data file may mention it, but it never becomes
    /// visible through the lookups.
    pub(crate) fn reset(&mut self, number: usize) -> Option<&mut SpellDefinition> {
        let spell = self.spells.get_mut(number)?;
        *spell = SpellDefinition::default();
        Some(spell)
    }

    /// Like [`SpellTable::reset`]; every `u8` addresses a slot.
    pub(crate) fn seed_slot(&mut self, number: u8) -> &mut SpellDefinition {
        let spell = &mut self.spells[usize::from(number)];
        *spell = SpellDefinition::default();
        spell
    }

    pub(crate) fn slot(&self, number: usize) -> Option<&SpellDefinition> {
        self.spells.get(number)
    }

    pub(crate) fn slot_mut(&mut self, number: usize) -> Option<&mut SpellDefinition> {
        self.spells.get_mut(number)
    }
}

fn spell_debug_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("TIBIA_SPELL_DEBUG")
            .ok()
            .map(|value| {
                let value = value.trim().to_ascii_lowercase();
                matches!(value.as_str(), "1" | "true" | "yes" | "on")
            })
            .unwrap_or(false)
    })
}

pub(crate) fn log_spell_debug(message: &str) {
    if spell_debug_enabled() {
        logging::log_game(message);
    }
}
