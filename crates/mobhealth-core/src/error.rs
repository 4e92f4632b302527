use thiserror::Error;

#[derive(Error, Debug)]
pub enum MobHealthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Unsupported source '{0}': use a .sql file or a .7z archive")]
    UnsupportedSource(String),

    #[error("Archive {0} doesn't contain a .sql file")]
    MissingSqlMember(String),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Row {row} of insert into `{table}` has {values} values for {columns} columns")]
    RowWidth {
        table: String,
        row: usize,
        values: usize,
        columns: usize,
    },

    #[error("Bad number '{value}' in column `{column}`: not a base-10 integer")]
    NumericFormat { column: String, value: String },
}

pub type Result<T> = std::result::Result<T, MobHealthError>;
