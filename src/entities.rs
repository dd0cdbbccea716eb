//! HTML entity decoding for provider text.
//!
//! The trivia provider HTML-encodes question and answer text. Decoding uses a
//! fixed table of the named entities the provider is known to emit plus
//! numeric (`&#039;`) and hexadecimal (`&#x27;`) references. Unknown entities
//! are left untouched.

use std::borrow::Cow;

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("quot", "\""),
    ("apos", "'"),
    ("lt", "<"),
    ("gt", ">"),
    ("nbsp", "\u{a0}"),
    ("shy", "\u{ad}"),
    ("ldquo", "\u{201c}"),
    ("rdquo", "\u{201d}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("laquo", "\u{ab}"),
    ("raquo", "\u{bb}"),
    ("hellip", "\u{2026}"),
    ("ndash", "\u{2013}"),
    ("mdash", "\u{2014}"),
    ("deg", "\u{b0}"),
    ("pi", "\u{3c0}"),
    ("times", "\u{d7}"),
    ("divide", "\u{f7}"),
    ("micro", "\u{b5}"),
    ("copy", "\u{a9}"),
    ("reg", "\u{ae}"),
    ("trade", "\u{2122}"),
    ("euro", "\u{20ac}"),
    ("pound", "\u{a3}"),
    ("yen", "\u{a5}"),
    ("sup2", "\u{b2}"),
    ("sup3", "\u{b3}"),
    ("frac12", "\u{bd}"),
    ("aacute", "\u{e1}"),
    ("Aacute", "\u{c1}"),
    ("agrave", "\u{e0}"),
    ("acirc", "\u{e2}"),
    ("atilde", "\u{e3}"),
    ("auml", "\u{e4}"),
    ("Auml", "\u{c4}"),
    ("aring", "\u{e5}"),
    ("Aring", "\u{c5}"),
    ("aelig", "\u{e6}"),
    ("ccedil", "\u{e7}"),
    ("Ccedil", "\u{c7}"),
    ("eacute", "\u{e9}"),
    ("Eacute", "\u{c9}"),
    ("egrave", "\u{e8}"),
    ("ecirc", "\u{ea}"),
    ("euml", "\u{eb}"),
    ("iacute", "\u{ed}"),
    ("Iacute", "\u{cd}"),
    ("igrave", "\u{ec}"),
    ("icirc", "\u{ee}"),
    ("iuml", "\u{ef}"),
    ("ntilde", "\u{f1}"),
    ("Ntilde", "\u{d1}"),
    ("oacute", "\u{f3}"),
    ("Oacute", "\u{d3}"),
    ("ograve", "\u{f2}"),
    ("ocirc", "\u{f4}"),
    ("otilde", "\u{f5}"),
    ("ouml", "\u{f6}"),
    ("Ouml", "\u{d6}"),
    ("oslash", "\u{f8}"),
    ("Oslash", "\u{d8}"),
    ("szlig", "\u{df}"),
    ("uacute", "\u{fa}"),
    ("Uacute", "\u{da}"),
    ("ugrave", "\u{f9}"),
    ("ucirc", "\u{fb}"),
    ("uuml", "\u{fc}"),
    ("Uuml", "\u{dc}"),
    ("yacute", "\u{fd}"),
];

/// Longest entity name we try to match, `;` excluded.
const MAX_ENTITY_LEN: usize = 10;

/// Decode HTML entities in `input`.
///
/// Returns the input unchanged (borrowed) when it contains no `&`.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        match decode_reference(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Compare two provider strings as the user sees them.
pub fn decoded_eq(a: &str, b: &str) -> bool {
    decode_entities(a) == decode_entities(b)
}

/// Decode the reference at the start of `tail` (just after `&`).
///
/// Returns the replacement text and the number of bytes consumed, `;` included.
fn decode_reference(tail: &str) -> Option<(String, usize)> {
    let end = tail
        .char_indices()
        .take(MAX_ENTITY_LEN + 2)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let name = &tail[..end];

    let decoded = if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        char::from_u32(code)?.to_string()
    } else {
        NAMED_ENTITIES
            .iter()
            .find(|(entity, _)| *entity == name)
            .map(|(_, text)| (*text).to_string())?
    };

    Some((decoded, end + 1))
}
