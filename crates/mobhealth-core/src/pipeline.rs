use std::path::Path;

use serde::Serialize;

use crate::encoding::decode_dump_bytes;
use crate::error::Result;
use crate::export::{self, DEFAULT_VARIABLE};
use crate::extractor::Extractor;
use crate::filter::filter_statements;
use crate::models::CreatureRecord;
use crate::source::read_source;
use crate::sql::{DumpParser, Statement};

/// Table the creature definitions are read from.
pub const DEFAULT_TABLE: &str = "creature_template";

/// Settings for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Source table holding creature definitions.
    pub table: String,
    /// Name of the generated table variable.
    pub variable_name: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            variable_name: DEFAULT_VARIABLE.to_string(),
        }
    }
}

/// Counters gathered over one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractStats {
    pub bytes_read: usize,
    pub bytes_retained: usize,
    pub statements_parsed: usize,
    pub statements_skipped: usize,
    pub creatures: usize,
    pub entries_written: usize,
}

#[derive(Debug)]
pub struct ExtractResult {
    pub records: Vec<CreatureRecord>,
    pub stats: ExtractStats,
}

/// Runs the dump -> creature records -> health table pipeline.
pub struct HealthExtractor {
    config: ExtractConfig,
}

impl HealthExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Filter, parse and extract creature records from raw dump bytes.
    pub fn extract_bytes(&self, dump: &[u8]) -> Result<ExtractResult> {
        let mut stats = ExtractStats {
            bytes_read: dump.len(),
            ..Default::default()
        };

        let filtered = filter_statements(dump, &self.config.table);
        stats.bytes_retained = filtered.len();
        let text = decode_dump_bytes(filtered);

        let mut extractor = Extractor::new();
        for statement in DumpParser::new(&text) {
            stats.statements_parsed += 1;
            match statement? {
                Statement::Insert(insert) if insert.table == self.config.table => {
                    let rows = extractor.handle_insert(&insert)?;
                    log::debug!("Extracted {} rows from insert into `{}`", rows, insert.table);
                }
                Statement::Insert(insert) => {
                    log::debug!("Skipping insert into `{}`", insert.table);
                    stats.statements_skipped += 1;
                }
                Statement::Other { keyword } => {
                    log::debug!("Skipping {} statement", keyword);
                    stats.statements_skipped += 1;
                }
            }
        }

        let records = extractor.into_records();
        stats.creatures = records.len();
        log::info!(
            "Extracted {} creatures from {} statements",
            stats.creatures,
            stats.statements_parsed
        );
        Ok(ExtractResult { records, stats })
    }

    /// Read the dump at `input` (`.sql` or `.7z`) and extract its creature records.
    pub fn extract_file(&self, input: &Path) -> Result<ExtractResult> {
        let dump = read_source(input)?;
        self.extract_bytes(&dump)
    }

    /// Full run: extract from `input`, then write the table to `output`.
    ///
    /// Nothing is written unless extraction succeeds.
    pub fn run(&self, input: &Path, output: &Path) -> Result<ExtractStats> {
        let ExtractResult { records, mut stats } = self.extract_file(input)?;
        stats.entries_written = export::write_table_file(output, &self.config.variable_name, &records)?;
        Ok(stats)
    }
}

impl ExtractStats {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
