pub mod dynamic_string;
pub mod spell_definitions;
pub mod spell_registry;
pub mod spell_templates;
pub mod spells;
pub mod syllables;
