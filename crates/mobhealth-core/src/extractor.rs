use crate::error::{MobHealthError, Result};
use crate::models::CreatureRecord;
use crate::sql::{InsertStatement, SqlValue};

/// A creature template column this tool reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    MinLevel,
    MaxLevel,
    MinHealth,
    MaxHealth,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::MinLevel,
        Field::MaxLevel,
        Field::MinHealth,
        Field::MaxHealth,
    ];

    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "name" => Some(Field::Name),
            "minlevel" => Some(Field::MinLevel),
            "maxlevel" => Some(Field::MaxLevel),
            "minhealth" => Some(Field::MinHealth),
            "maxhealth" => Some(Field::MaxHealth),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::MinLevel => "minlevel",
            Field::MaxLevel => "maxlevel",
            Field::MinHealth => "minhealth",
            Field::MaxHealth => "maxhealth",
        }
    }
}

/// Column position -> field, built once per statement.
#[derive(Debug)]
pub struct ColumnMap {
    fields: Vec<Option<Field>>,
}

impl ColumnMap {
    pub fn new(columns: &[String]) -> Self {
        Self {
            fields: columns.iter().map(|c| Field::from_column(c)).collect(),
        }
    }

    /// Recognized fields that no column maps to.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.fields.contains(&Some(*f)))
            .collect()
    }

    /// Build a record from one row. Values of unrecognized columns are ignored.
    pub fn record_from_row(&self, row: &[SqlValue]) -> Result<CreatureRecord> {
        let mut record = CreatureRecord::default();
        for (field, value) in self.fields.iter().zip(row) {
            let field = match field {
                Some(f) => *f,
                None => continue,
            };

            if field == Field::Name {
                record.name = value.as_text().unwrap_or_default().to_string();
                continue;
            }

            let num = parse_int(field, value)?;
            match field {
                Field::MinLevel => record.min_level = num,
                Field::MaxLevel => record.max_level = num,
                Field::MinHealth => record.min_health = num,
                Field::MaxHealth => record.max_health = num,
                Field::Name => {}
            }
        }
        Ok(record)
    }
}

fn parse_int(field: Field, value: &SqlValue) -> Result<i64> {
    let parsed = match value {
        SqlValue::Str(s) | SqlValue::Number(s) => s.parse::<i64>().ok(),
        SqlValue::Null => None,
    };
    parsed.ok_or_else(|| MobHealthError::NumericFormat {
        column: field.column().to_string(),
        value: value.as_text().unwrap_or("NULL").to_string(),
    })
}

/// Accumulates creature records from insert statements, in row order.
#[derive(Debug, Default)]
pub struct Extractor {
    records: Vec<CreatureRecord>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert every row of `stmt` into a record. Returns the number of rows added.
    ///
    /// Recognized columns missing from the statement leave their fields at zero;
    /// this is logged, not rejected.
    pub fn handle_insert(&mut self, stmt: &InsertStatement) -> Result<usize> {
        let map = ColumnMap::new(&stmt.columns);

        let missing = map.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.column()).collect();
            log::warn!(
                "Insert into `{}` lacks column(s) {}; those fields default to 0",
                stmt.table,
                names.join(", ")
            );
        }

        for (i, row) in stmt.rows.iter().enumerate() {
            if row.len() != stmt.columns.len() {
                return Err(MobHealthError::RowWidth {
                    table: stmt.table.clone(),
                    row: i + 1,
                    values: row.len(),
                    columns: stmt.columns.len(),
                });
            }
            self.records.push(map.record_from_row(row)?);
        }
        Ok(stmt.rows.len())
    }

    pub fn records(&self) -> &[CreatureRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CreatureRecord> {
        self.records
    }
}
