pub mod spells_dat;
