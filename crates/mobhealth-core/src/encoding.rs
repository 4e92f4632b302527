use encoding_rs::WINDOWS_1252;

/// Decode dump bytes into text, tolerating dumps exported with a latin1 connection charset.
///
/// Strategy:
/// 1. Fast path: if the whole buffer is valid UTF-8, reuse its allocation as the `String`.
/// 2. Otherwise decode line by line: UTF-8 where the line is valid, Windows-1252 where it isn't.
///
/// Line endings are preserved byte for byte, so statement delimiters survive decoding.
pub fn decode_dump_bytes(bytes: Vec<u8>) -> String {
    let bytes = match String::from_utf8(bytes) {
        Ok(s) => return s,
        Err(e) => e.into_bytes(),
    };

    let mut result = String::with_capacity(bytes.len());
    let mut fallback_lines = 0usize;
    for (i, line) in bytes.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            result.push('\n');
        }
        match std::str::from_utf8(line) {
            Ok(s) => result.push_str(s),
            Err(_) => {
                let (cow, _, _) = WINDOWS_1252.decode(line);
                result.push_str(&cow);
                fallback_lines += 1;
            }
        }
    }
    log::debug!("Decoded {} line(s) as Windows-1252", fallback_lines);
    result
}
