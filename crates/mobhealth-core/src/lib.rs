pub mod encoding;
pub mod error;
pub mod export;
pub mod extractor;
pub mod filter;
pub mod interpolate;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod sql;

pub use error::{MobHealthError, Result};
pub use export::{write_table, write_table_file, DEFAULT_VARIABLE};
pub use extractor::Extractor;
pub use filter::filter_statements;
pub use models::{CreatureRecord, LevelEntry};
pub use pipeline::{ExtractConfig, ExtractResult, ExtractStats, HealthExtractor, DEFAULT_TABLE};
pub use source::read_source;
