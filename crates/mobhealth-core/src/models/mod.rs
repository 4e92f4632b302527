pub mod creature;
pub mod level_entry;

pub use creature::CreatureRecord;
pub use level_entry::LevelEntry;
