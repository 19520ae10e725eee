// klujur-runtime - Function name munging
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Conversion between source-level function names and their internal,
//! identifier-safe form.
//!
//! Internal names replace `-` with `_` and reader characters with tokens
//! such as `_PLUS_` or `_QMARK_`; namespace separators are written as `$`.
//! Error messages show the demunged form.

/// Reader character to munged token.
const CHAR_MAP: &[(char, &str)] = &[
    ('-', "_"),
    (':', "_COLON_"),
    ('+', "_PLUS_"),
    ('>', "_GT_"),
    ('<', "_LT_"),
    ('=', "_EQ_"),
    ('~', "_TILDE_"),
    ('!', "_BANG_"),
    ('@', "_CIRCA_"),
    ('#', "_SHARP_"),
    ('\'', "_SINGLEQUOTE_"),
    ('"', "_DOUBLEQUOTE_"),
    ('%', "_PERCENT_"),
    ('^', "_CARET_"),
    ('&', "_AMPERSAND_"),
    ('*', "_STAR_"),
    ('|', "_BAR_"),
    ('{', "_LBRACE_"),
    ('}', "_RBRACE_"),
    ('[', "_LBRACK_"),
    (']', "_RBRACK_"),
    ('/', "_SLASH_"),
    ('\\', "_BSLASH_"),
    ('?', "_QMARK_"),
];

/// Munge a source-level name into its internal form.
pub fn munge(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match CHAR_MAP.iter().find(|(ch, _)| *ch == c) {
            Some((_, token)) => out.push_str(token),
            None => out.push(c),
        }
    }
    out
}

/// Recover the readable name from a munged internal name.
///
/// At each position the longest matching token wins, so `_PLUS_` is read as
/// `+` rather than as `-PLUS-`. `$` separators become `/`.
pub fn demunge(munged: &str) -> String {
    let mut out = String::with_capacity(munged.len());
    let mut rest = munged;

    while let Some(c) = rest.chars().next() {
        if c == '_' {
            let token = CHAR_MAP
                .iter()
                .filter(|(_, token)| rest.starts_with(token))
                .max_by_key(|(_, token)| token.len());
            if let Some((ch, token)) = token {
                out.push(*ch);
                rest = &rest[token.len()..];
                continue;
            }
        }
        out.push(if c == '$' { '/' } else { c });
        rest = &rest[c.len_utf8()..];
    }
    out
}
