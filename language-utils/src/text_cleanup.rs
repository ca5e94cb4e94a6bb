/// Normalize a typed answer (or the expected answer) so that trivial
/// differences don't count against the learner.
///
/// Typographic quote and dash variants are folded to their ASCII forms,
/// non-breaking spaces become regular spaces, the text is lowercased and
/// whitespace is trimmed and collapsed. Accents and punctuation are kept:
/// "élève" and "eleve" are different answers.
pub fn normalize_for_grading(text: &str) -> String {
    let normalized_chars = text
        .chars()
        .map(|c| match c {
            // Single quote variants: ' (U+2018), ' (U+2019), ‚ (U+201A), ‛ (U+201B),
            // ′ (U+2032), ‵ (U+2035), ＇ (U+FF07), ʼ (U+02BC), `, ´ (U+00B4)
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{2035}'
            | '\u{FF07}' | '\u{02BC}' | '`' | '\u{00B4}' => '\'',

            // Double quote variants: " (U+201C), " (U+201D), „ (U+201E), ‟ (U+201F),
            // « (U+00AB), » (U+00BB), ＂ (U+FF02)
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}'
            | '\u{FF02}' => '"',

            // Hyphen/dash variants: ‐ (U+2010), ‑ (U+2011), ‒ (U+2012), – (U+2013),
            // — (U+2014), − (U+2212), － (U+FF0D)
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}'
            | '\u{FF0D}' => '-',

            // nbsp and narrow nbsp, common in French text
            '\u{00A0}' | '\u{202F}' => ' ',

            _ => c,
        })
        .collect::<String>();

    normalized_chars
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two strings are the same answer after normalization.
pub fn answers_match(submitted: &str, expected: &str) -> bool {
    let expected = normalize_for_grading(expected);
    !expected.is_empty() && normalize_for_grading(submitted) == expected
}
