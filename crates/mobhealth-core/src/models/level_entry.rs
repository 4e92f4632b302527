use std::fmt;

use serde::Serialize;

/// Health of a creature at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelEntry {
    pub name: String,
    pub level: i64,
    pub health: i64,
}

impl LevelEntry {
    /// Lookup key `name:level`, with `"` escaped for embedding in a quoted string.
    pub fn key(&self) -> String {
        format!("{}:{}", self.name.replace('"', "\\\""), self.level)
    }
}

/// Table field form: `["name:level"] = health,`
impl fmt::Display for LevelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[\"{}\"] = {},", self.key(), self.health)
    }
}
