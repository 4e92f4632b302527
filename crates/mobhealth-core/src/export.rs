use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::interpolate::interpolate_all;
use crate::models::CreatureRecord;

/// Variable the client add-on reads its prefilled table from.
pub const DEFAULT_VARIABLE: &str = "MobHealth3DB";

/// Write all records as one table assignment, one field per level.
///
/// Returns the number of fields written. The closing brace has no trailing newline.
pub fn write_table<W: Write>(out: &mut W, variable: &str, records: &[CreatureRecord]) -> Result<usize> {
    writeln!(out, "{} = {{", variable)?;
    let mut written = 0usize;
    for entry in interpolate_all(records) {
        writeln!(out, "\t{}", entry)?;
        written += 1;
    }
    write!(out, "}}")?;
    Ok(written)
}

/// Write the table to `path` via a temporary file in the same directory.
///
/// The destination is only replaced once the whole table has been written and flushed.
pub fn write_table_file(path: &Path, variable: &str, records: &[CreatureRecord]) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir)?;
    let mut out = BufWriter::new(tmp);
    let written = write_table(&mut out, variable, records)?;
    let tmp = out.into_inner().map_err(|e| e.into_error())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    log::info!("Wrote {} entries to {}", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(records: &[CreatureRecord]) -> String {
        let mut out = Vec::new();
        write_table(&mut out, DEFAULT_VARIABLE, records).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_wolf_table() {
        let text = render(&[CreatureRecord::new("Wolf", 1, 3, 10, 30)]);
        assert_eq!(
            text,
            "MobHealth3DB = {\n\t[\"Wolf:1\"] = 10,\n\t[\"Wolf:2\"] = 20,\n\t[\"Wolf:3\"] = 30,\n}"
        );
    }

    #[test]
    fn test_single_level_line() {
        let text = render(&[CreatureRecord::new("Name", 5, 5, 200, 200)]);
        assert_eq!(text, "MobHealth3DB = {\n\t[\"Name:5\"] = 200,\n}");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render(&[]), "MobHealth3DB = {\n}");
    }

    #[test]
    fn test_escaped_key() {
        let text = render(&[CreatureRecord::new("Ogre\"Boss", 9, 9, 1, 1)]);
        assert!(text.contains("\t[\"Ogre\\\"Boss:9\"] = 1,\n"), "got: {}", text);
    }

    #[test]
    fn test_no_sorting_or_dedup() {
        let text = render(&[
            CreatureRecord::new("Zed", 1, 1, 5, 5),
            CreatureRecord::new("Abe", 1, 1, 6, 6),
            CreatureRecord::new("Zed", 1, 1, 7, 7),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "MobHealth3DB = {",
                "\t[\"Zed:1\"] = 5,",
                "\t[\"Abe:1\"] = 6,",
                "\t[\"Zed:1\"] = 7,",
                "}",
            ]
        );
    }

    #[test]
    fn test_custom_variable() {
        let mut out = Vec::new();
        let n = write_table(&mut out, "PrefillDB", &[CreatureRecord::new("Imp", 2, 3, 8, 9)]).unwrap();
        assert_eq!(n, 2);
        assert!(String::from_utf8(out).unwrap().starts_with("PrefillDB = {\n"));
    }

    #[test]
    fn test_write_table_file_replaces_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("MobHealth.lua");
        std::fs::write(&path, "stale").unwrap();

        let n = write_table_file(&path, DEFAULT_VARIABLE, &[CreatureRecord::new("Wolf", 1, 3, 10, 30)]).unwrap();
        assert_eq!(n, 3);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("MobHealth3DB = {\n"));
        assert!(text.ends_with("\t[\"Wolf:3\"] = 30,\n}"));

        // Only the destination remains in the directory
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
