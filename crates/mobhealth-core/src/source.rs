use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sevenz_rust::{Password, SevenZReader};

use crate::error::{MobHealthError, Result};

/// Kind of dump input, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sql,
    SevenZip,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("sql") => Ok(SourceKind::Sql),
            Some("7z") => Ok(SourceKind::SevenZip),
            _ => Err(MobHealthError::UnsupportedSource(path.display().to_string())),
        }
    }
}

/// Read the whole dump at `path`: a plain `.sql` file, or the first `.sql` member of a `.7z` archive.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    match SourceKind::from_path(path)? {
        SourceKind::Sql => {
            let mut bytes = Vec::new();
            BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
            log::info!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
        SourceKind::SevenZip => read_sql_member(path),
    }
}

fn read_sql_member(path: &Path) -> Result<Vec<u8>> {
    let mut archive = SevenZReader::open(path, Password::empty())
        .map_err(|e| MobHealthError::Archive(format!("{}: {}", path.display(), e)))?;

    let mut found: Option<(String, Vec<u8>)> = None;
    archive
        .for_each_entries(|entry, reader| {
            let is_sql = !entry.is_directory() && entry.name().to_ascii_lowercase().ends_with(".sql");
            if is_sql && found.is_none() {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                found = Some((entry.name().to_string(), bytes));
            } else {
                if is_sql {
                    log::warn!("Ignoring extra SQL member {}", entry.name());
                }
                std::io::copy(reader, &mut std::io::sink())?;
            }
            Ok(true)
        })
        .map_err(|e| MobHealthError::Archive(format!("{}: {}", path.display(), e)))?;

    match found {
        Some((name, bytes)) => {
            log::info!("Read {} bytes from {} in {}", bytes.len(), name, path.display());
            Ok(bytes)
        }
        None => Err(MobHealthError::MissingSqlMember(path.display().to_string())),
    }
}
