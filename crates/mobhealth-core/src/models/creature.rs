use serde::Serialize;

/// Level and health bounds of one creature template row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatureRecord {
    pub name: String,
    pub min_level: i64,
    pub max_level: i64,
    pub min_health: i64,
    pub max_health: i64,
}

impl CreatureRecord {
    pub fn new(
        name: impl Into<String>,
        min_level: i64,
        max_level: i64,
        min_health: i64,
        max_health: i64,
    ) -> Self {
        Self {
            name: name.into(),
            min_level,
            max_level,
            min_health,
            max_health,
        }
    }

    /// Number of levels in the inclusive range. Zero when the range is inverted,
    /// saturating at `usize::MAX` for spans wider than the address space.
    pub fn level_count(&self) -> usize {
        inclusive_len(self.min_level, self.max_level).unwrap_or(usize::MAX)
    }
}

/// Length of `from..=to`, or `None` when it does not fit in a `usize`.
pub(crate) fn inclusive_len(from: i64, to: i64) -> Option<usize> {
    if to < from {
        return Some(0);
    }
    usize::try_from(to.abs_diff(from)).ok()?.checked_add(1)
}
