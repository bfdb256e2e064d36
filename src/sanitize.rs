//! Repair of encoding artifacts in converted text.
//!
//! Source bundles regularly mix encodings: a UTF-8 file that went through a
//! Latin-1 editor at some point shows `Ã©` for `é` and `â€™` for `’`. These
//! fixes undo that damage and flatten typographic variants that add noise to
//! a plain-text corpus.
//!
//! [`fix_text`] applies every fix in a fixed order and is idempotent.

use encoding_rs::WINDOWS_1252;

/// Upper bound on mojibake repair passes (text can be double-encoded).
const MAX_MOJIBAKE_PASSES: usize = 4;

/// Byte that `c` came from if the text was wrongly decoded as Latin-1 or
/// Windows-1252. ASCII never takes part in mojibake and yields `None`.
fn single_byte_for(c: char) -> Option<u8> {
    let cp = u32::from(c);
    if cp < 0x80 {
        return None;
    }
    if let Ok(byte) = u8::try_from(cp) {
        return Some(byte);
    }

    let mut buf = [0u8; 4];
    let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match (unmappable, bytes.as_ref()) {
        (false, [byte]) if *byte >= 0x80 => Some(*byte),
        _ => None,
    }
}

/// Whether `chars` read like the Latin-1 rendering of one UTF-8 sequence.
///
/// Only the leads that real mojibake produces count: `Â` and `Ã` for the
/// Latin-1 block and `â€` for general punctuation. Genuine text such as
/// `ß“` also forms valid UTF-8 bytes and must stay as it is.
fn is_mojibake_sequence(chars: &[char]) -> bool {
    matches!(
        chars,
        ['\u{c2}' | '\u{c3}', _] | ['\u{e2}', '\u{20ac}', _]
    )
}

/// Re-decode one run of single-byte-mappable characters as UTF-8.
///
/// Each decoded sequence is kept only when its source characters look like
/// mojibake; everything else keeps its original characters, so genuine
/// Latin-1 text survives untouched.
fn repair_run(run: &[char], out: &mut String) {
    let bytes: Vec<u8> = run.iter().filter_map(|c| single_byte_for(*c)).collect();
    let mut pos = 0;

    for chunk in bytes.utf8_chunks() {
        for decoded in chunk.valid().chars() {
            let source = &run[pos..pos + decoded.len_utf8()];
            if is_mojibake_sequence(source) {
                out.push(decoded);
            } else {
                out.extend(source);
            }
            pos += source.len();
        }

        let invalid = chunk.invalid().len();
        out.extend(&run[pos..pos + invalid]);
        pos += invalid;
    }
}

fn fix_mojibake_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Vec<char> = Vec::new();

    for c in text.chars() {
        if single_byte_for(c).is_some() {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            repair_run(&run, &mut out);
            run.clear();
        }
        out.push(c);
    }
    if !run.is_empty() {
        repair_run(&run, &mut out);
    }

    out
}

/// Undo UTF-8 text that was decoded as Latin-1 or Windows-1252.
///
/// ```rust
/// use tex2corpus::sanitize::fix_mojibake;
///
/// assert_eq!(fix_mojibake("cafÃ©"), "café");
/// assert_eq!(fix_mojibake("itâ€™s"), "it\u{2019}s");
/// assert_eq!(fix_mojibake("café"), "café");
/// ```
#[must_use]
pub fn fix_mojibake(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_MOJIBAKE_PASSES {
        let next = fix_mojibake_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Decode C1 control characters that are really Windows-1252 bytes.
#[must_use]
pub fn fix_c1_controls(text: &str) -> String {
    text.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(byte @ 0x80..=0x9f) => {
                let bytes = [byte];
                let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
                decoded.chars().next().unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Expand Latin typographic ligatures.
#[must_use]
pub fn fix_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{fb00}' => out.push_str("ff"),
            '\u{fb01}' => out.push_str("fi"),
            '\u{fb02}' => out.push_str("fl"),
            '\u{fb03}' => out.push_str("ffi"),
            '\u{fb04}' => out.push_str("ffl"),
            '\u{fb05}' | '\u{fb06}' => out.push_str("st"),
            '\u{0132}' => out.push_str("IJ"),
            '\u{0133}' => out.push_str("ij"),
            _ => out.push(c),
        }
    }
    out
}

/// Map full-width ASCII variants to ASCII.
#[must_use]
pub fn fix_character_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3000}' => ' ',
            '\u{ff01}'..='\u{ff5e}' => char::from_u32(u32::from(c) - 0xfee0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Replace curly quotes with straight ones.
#[must_use]
pub fn uncurl_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}'..='\u{201b}' => '\'',
            '\u{201c}'..='\u{201f}' => '"',
            _ => c,
        })
        .collect()
}

/// Normalize every line-break convention to `\n`.
#[must_use]
pub fn fix_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace(['\r', '\u{85}', '\u{2028}', '\u{2029}'], "\n")
}

/// Remove control characters other than `\n` and `\t`, byte-order marks
/// and deprecated format characters.
#[must_use]
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| match c {
            '\n' | '\t' => true,
            '\u{feff}' | '\u{206a}'..='\u{206f}' | '\u{fff9}'..='\u{fffc}' => false,
            _ => !c.is_control(),
        })
        .collect()
}

/// Apply every text fix in order.
///
/// ```rust
/// use tex2corpus::sanitize::fix_text;
///
/// assert_eq!(fix_text("\u{feff}The \u{fb01}eld isnâ€™t empty\r\n"), "The field isn't empty\n");
/// ```
#[must_use]
pub fn fix_text(text: &str) -> String {
    let text = fix_mojibake(text);
    let text = fix_c1_controls(&text);
    let text = fix_ligatures(&text);
    let text = fix_character_width(&text);
    let text = uncurl_quotes(&text);
    let text = fix_line_breaks(&text);
    remove_control_chars(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mojibake_accent_is_repaired() {
        assert_eq!(fix_mojibake("rÃ©sumÃ© and naÃ¯ve"), "résumé and naïve");
    }

    #[test]
    fn windows1252_mojibake_is_repaired() {
        assert_eq!(fix_mojibake("â€œquotedâ€\u{9d}"), "\u{201c}quoted\u{201d}");
    }

    #[test]
    fn genuine_latin1_text_is_kept() {
        assert_eq!(fix_mojibake("Über straße, déjà vu"), "Über straße, déjà vu");
    }

    #[test]
    fn partially_valid_run_keeps_invalid_tail() {
        // "Ã©" is mojibake, the trailing "é" is not
        assert_eq!(fix_mojibake("Ã©é"), "éé");
    }

    #[test]
    fn latin1_letter_before_curly_quote_is_kept() {
        // ß (0xDF) and “ (0x93) form valid UTF-8 bytes but are not mojibake
        assert_eq!(fix_mojibake("„groß“ und à“"), "„groß“ und à“");
        assert_eq!(fix_text("Er sagte „groß“ und mehr."), "Er sagte \"groß\" und mehr.");
    }

    #[test]
    fn double_encoding_is_unwound() {
        assert_eq!(fix_mojibake("ÃƒÂ©"), "é");
    }

    #[test]
    fn c1_controls_decode_as_windows1252() {
        assert_eq!(fix_c1_controls("\u{93}hi\u{94}"), "\u{201c}hi\u{201d}");
    }

    #[test]
    fn ligatures_expand() {
        assert_eq!(fix_ligatures("e\u{fb03}cient \u{fb02}ow"), "efficient flow");
    }

    #[test]
    fn fullwidth_becomes_ascii() {
        assert_eq!(fix_character_width("\u{ff21}\u{ff11}\u{3000}x"), "A1 x");
    }

    #[test]
    fn control_chars_removed_but_newlines_kept() {
        assert_eq!(remove_control_chars("a\u{0}b\n\tc\u{7f}"), "ab\n\tc");
    }

    #[test]
    fn fix_text_is_idempotent() {
        let once = fix_text("Ã©tÃ© \u{fb01}n \u{201c}x\u{201d}\r\n\u{85}");
        assert_eq!(fix_text(&once), once);
    }
}
