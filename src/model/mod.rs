pub mod encounter;
pub mod encounter_data;
pub mod npc;
pub mod sitrep;
