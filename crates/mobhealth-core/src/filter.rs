/// Statement terminator used by the dumps this tool reads.
pub const STATEMENT_DELIMITER: &[u8] = b";\r\n";

/// Reduce a raw dump to the insert statements that target `table`.
///
/// The input is split on [`STATEMENT_DELIMITER`] and only segments starting with
/// ``INSERT INTO `<table>` `` are kept, each re-terminated with the delimiter.
/// Trailing bytes after the last delimiter are dropped even when they carry the
/// prefix. A delimiter inside a quoted literal splits that statement.
pub fn filter_statements(input: &[u8], table: &str) -> Vec<u8> {
    let prefix = format!("INSERT INTO `{}`", table);
    let prefix = prefix.as_bytes();

    let mut out = Vec::new();
    let mut seen = 0usize;
    let mut kept = 0usize;
    for segment in terminated_segments(input, STATEMENT_DELIMITER) {
        seen += 1;
        if segment.starts_with(prefix) {
            out.extend_from_slice(segment);
            out.extend_from_slice(STATEMENT_DELIMITER);
            kept += 1;
        }
    }

    log::debug!(
        "Statement filter kept {} of {} segments ({} of {} bytes)",
        kept,
        seen,
        out.len(),
        input.len()
    );
    out
}

/// Segments of `haystack` that are followed by `delim`. The unterminated remainder is not yielded.
fn terminated_segments<'a>(haystack: &'a [u8], delim: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'a {
    let mut rest = haystack;
    std::iter::from_fn(move || {
        let pos = rest.windows(delim.len()).position(|w| w == delim)?;
        let segment = &rest[..pos];
        rest = &rest[pos + delim.len()..];
        Some(segment)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &[u8] = b"-- MySQL dump\r\n\r\n/*!40101 SET NAMES utf8 */;\r\n\
INSERT INTO `creature_template` VALUES (1,'Wolf');\r\n\
INSERT INTO `item_template` VALUES (2,'Sword');\r\n\
INSERT INTO `creature_template` VALUES (3,'Bear');\r\n\
UNLOCK TABLES;\r\n";

    #[test]
    fn test_keeps_only_target_inserts() {
        let out = filter_statements(DUMP, "creature_template");
        assert_eq!(
            out,
            b"INSERT INTO `creature_template` VALUES (1,'Wolf');\r\n\
INSERT INTO `creature_template` VALUES (3,'Bear');\r\n"
                .to_vec()
        );
    }

    #[test]
    fn test_other_table_name() {
        let out = filter_statements(DUMP, "item_template");
        assert_eq!(out, b"INSERT INTO `item_template` VALUES (2,'Sword');\r\n".to_vec());
    }

    #[test]
    fn test_unterminated_tail_is_dropped() {
        let input = b"INSERT INTO `creature_template` VALUES (1,'Wolf');\r\nINSERT INTO `creature_template` VALUES (2,'Bear');";
        let out = filter_statements(input, "creature_template");
        assert_eq!(out, b"INSERT INTO `creature_template` VALUES (1,'Wolf');\r\n".to_vec());
    }

    #[test]
    fn test_lf_only_dump_retains_nothing() {
        let input = b"INSERT INTO `creature_template` VALUES (1,'Wolf');\nINSERT INTO `creature_template` VALUES (2,'Bear');\n";
        assert!(filter_statements(input, "creature_template").is_empty());
    }

    #[test]
    fn test_leading_blank_line_drops_segment() {
        let input = b"SET x=1;\r\n\r\nINSERT INTO `creature_template` VALUES (1,'Wolf');\r\n";
        assert!(filter_statements(input, "creature_template").is_empty());
    }

    #[test]
    fn test_double_semicolon_keeps_inner_terminator() {
        let input = b"INSERT INTO `creature_template` VALUES (1,'Wolf');;\r\n";
        let out = filter_statements(input, "creature_template");
        assert_eq!(out, b"INSERT INTO `creature_template` VALUES (1,'Wolf');;\r\n".to_vec());
    }

    #[test]
    fn test_no_delimiter_at_all() {
        let input = b"INSERT INTO `creature_template` VALUES (1,'Wolf')";
        assert!(filter_statements(input, "creature_template").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_statements(b"", "creature_template").is_empty());
    }
}
