use crate::models::creature::inclusive_len;
use crate::models::{CreatureRecord, LevelEntry};

/// Lazily expands a creature record into one entry per level, lowest level first.
///
/// Health grows linearly from `min_health` at `min_level` towards `max_health`, and the
/// offset is truncated toward zero. Because of the truncation the last level can land
/// one short of `max_health`. Differences are taken in `f64`, so bounds anywhere in the
/// `i64` range are accepted; the resulting health saturates at the `i64` limits.
pub struct Levels<'a> {
    record: &'a CreatureRecord,
    slope: f64,
    next: i64,
    done: bool,
}

impl<'a> Levels<'a> {
    pub fn new(record: &'a CreatureRecord) -> Self {
        let slope = if record.max_level == record.min_level {
            0.0
        } else {
            (record.max_health as f64 - record.min_health as f64)
                / (record.max_level as f64 - record.min_level as f64)
        };
        Self {
            record,
            slope,
            next: record.min_level,
            done: record.max_level < record.min_level,
        }
    }

    fn health_at(&self, level: i64) -> i64 {
        let offset = (self.slope * (level as f64 - self.record.min_level as f64)) as i128;
        let health = self.record.min_health as i128 + offset;
        i64::try_from(health).unwrap_or(if health < 0 { i64::MIN } else { i64::MAX })
    }
}

impl Iterator for Levels<'_> {
    type Item = LevelEntry;

    fn next(&mut self) -> Option<LevelEntry> {
        if self.done {
            return None;
        }
        let level = self.next;
        if level >= self.record.max_level {
            self.done = true;
        } else {
            self.next += 1;
        }
        Some(LevelEntry {
            name: self.record.name.clone(),
            level,
            health: self.health_at(level),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        match inclusive_len(self.next, self.record.max_level) {
            Some(remaining) => (remaining, Some(remaining)),
            None => (usize::MAX, None),
        }
    }
}

impl CreatureRecord {
    /// Per-level health entries for this creature.
    pub fn levels(&self) -> Levels<'_> {
        Levels::new(self)
    }
}

/// Expand every record in order.
pub fn interpolate_all(records: &[CreatureRecord]) -> impl Iterator<Item = LevelEntry> + '_ {
    records.iter().flat_map(CreatureRecord::levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healths(record: &CreatureRecord) -> Vec<i64> {
        record.levels().map(|e| e.health).collect()
    }

    #[test]
    fn test_single_level() {
        let record = CreatureRecord::new("Hogger", 11, 11, 666, 666);
        let entries: Vec<_> = record.levels().collect();
        assert_eq!(
            entries,
            vec![LevelEntry {
                name: "Hogger".into(),
                level: 11,
                health: 666
            }]
        );
    }

    #[test]
    fn test_single_level_uses_min_health() {
        let record = CreatureRecord::new("Odd", 5, 5, 100, 300);
        assert_eq!(healths(&record), vec![100]);
    }

    #[test]
    fn test_wolf_range() {
        let record = CreatureRecord::new("Wolf", 1, 3, 10, 30);
        let entries: Vec<_> = record.levels().collect();
        let levels: Vec<i64> = entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(healths(&record), vec![10, 20, 30]);
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        // slope = 2/3: offsets 0, 0.67, 1.33, 2.0
        let record = CreatureRecord::new("Rat", 1, 4, 10, 12);
        assert_eq!(healths(&record), vec![10, 10, 11, 12]);

        // slope = 100/3: 33.33 and 66.67 both truncate down
        let record = CreatureRecord::new("Boar", 10, 13, 100, 200);
        assert_eq!(healths(&record), vec![100, 133, 166, 200]);
    }

    #[test]
    fn test_truncates_toward_zero_when_decreasing() {
        // slope = -2/3: offsets 0, -0.67, -1.33, -2.0 truncate to 0, 0, -1, -2
        let record = CreatureRecord::new("Wisp", 1, 4, 12, 10);
        assert_eq!(healths(&record), vec![12, 12, 11, 10]);
    }

    #[test]
    fn test_count_and_contiguity() {
        let record = CreatureRecord::new("Murloc", 7, 19, 150, 800);
        let entries: Vec<_> = record.levels().collect();
        assert_eq!(entries.len(), 13);
        assert_eq!(record.levels().size_hint(), (13, Some(13)));
        assert_eq!(entries[0].level, 7);
        assert_eq!(entries[0].health, 150);
        for pair in entries.windows(2) {
            assert_eq!(pair[1].level, pair[0].level + 1);
            assert!(pair[1].health >= pair[0].health);
        }
    }

    #[test]
    fn test_monotonic_decreasing() {
        let record = CreatureRecord::new("Shade", 20, 35, 5000, 1234);
        let hp = healths(&record);
        assert_eq!(hp[0], 5000);
        for pair in hp.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let record = CreatureRecord::new("Broken", 10, 5, 100, 50);
        assert_eq!(record.levels().count(), 0);
        assert_eq!(record.level_count(), 0);
    }

    #[test]
    fn test_interpolate_all_keeps_record_order() {
        let records = vec![
            CreatureRecord::new("B", 2, 3, 20, 30),
            CreatureRecord::new("A", 1, 1, 5, 5),
        ];
        let keys: Vec<String> = interpolate_all(&records).map(|e| e.key()).collect();
        assert_eq!(keys, vec!["B:2", "B:3", "A:1"]);
    }

    #[test]
    fn test_extreme_health_bounds_do_not_overflow() {
        let record = CreatureRecord::new("Edge", 1, 2, i64::MIN, i64::MAX);
        let hp = healths(&record);
        assert_eq!(hp.len(), 2);
        assert_eq!(hp, vec![i64::MIN, i64::MAX]);
    }

    #[test]
    fn test_extreme_level_span_is_lazy() {
        let record = CreatureRecord::new("Edge", i64::MIN, i64::MAX, 0, 100);
        let mut levels = record.levels();
        assert_eq!(levels.size_hint(), (usize::MAX, None));
        let first = levels.next().unwrap();
        assert_eq!(first.level, i64::MIN);
        assert_eq!(first.health, 0);
        assert_eq!(levels.next().unwrap().level, i64::MIN + 1);
    }

    #[test]
    fn test_top_level_terminates() {
        let record = CreatureRecord::new("Edge", i64::MAX - 1, i64::MAX, 10, 20);
        let levels: Vec<i64> = record.levels().map(|e| e.level).collect();
        assert_eq!(levels, vec![i64::MAX - 1, i64::MAX]);
    }
}
