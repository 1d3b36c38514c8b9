//! Text normalization for extracted card fields
//!
//! The source site mixes full-width and half-width characters freely. Names
//! are normalized once, at the point the parsed fields are composed into a
//! record, so the stored data is consistent for display and filtering.

/// Converts full-width alphanumerics and a handful of punctuation characters
/// to their half-width equivalents
///
/// Letters, digits and `：＼／！` are shifted down by 0xFEE0; full-width
/// parentheses are replaced outright.
pub fn zenkaku_to_hankaku(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' | '：' | '＼' | '／' | '！' => {
                char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
            }
            '（' => '(',
            '）' => ')',
            _ => c,
        })
        .collect()
}

/// Normalizes a card name for storage
///
/// Half-width conversion first, then a line-break marker before the first
/// opening parenthesis so long names wrap at the subtitle.
pub fn normalize_name(raw: &str) -> String {
    let name = zenkaku_to_hankaku(raw.trim());
    match name.find('(') {
        Some(i) => format!("{}<br />{}", &name[..i], &name[i..]),
        None => name,
    }
}
