use std::borrow::Cow;

/// CDATA terminator. It can never appear inside a single CDATA section.
const CDATA_END: &str = "]]>";

/// Returns true for characters the XML 1.0 `Char` production excludes.
///
/// Surrogates cannot occur in a Rust `char`, which leaves the C0 controls
/// other than tab, newline and carriage return, plus U+FFFE and U+FFFF.
#[inline]
fn is_invalid_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

/// Strip characters that are not allowed anywhere in an XML 1.0 document.
///
/// Neither entity escaping nor CDATA can carry these characters (`&#0;` is
/// itself ill-formed), so they are dropped from every text, CDATA and
/// attribute value before it reaches the writer.
///
/// Preserves: tab (0x09), newline (0x0A), carriage return (0x0D), DEL and
/// all non-control Unicode.
///
/// Returns `Cow::Borrowed` when the input contains nothing to strip, which is
/// the overwhelmingly common case for feed metadata.
///
/// # Examples
///
/// ```
/// use podcast_feed::util::strip_invalid_xml_chars;
///
/// assert_eq!(strip_invalid_xml_chars("clean\ttext"), "clean\ttext");
/// assert_eq!(strip_invalid_xml_chars("nu\x00ll"), "null");
/// ```
pub fn strip_invalid_xml_chars(s: &str) -> Cow<'_, str> {
    // Fast path: every invalid character is either a C0 byte or starts with 0xEF
    let needs_strip = s
        .as_bytes()
        .iter()
        .any(|&b| (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d) || b == 0xef)
        && s.chars().any(is_invalid_xml_char);

    if !needs_strip {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| !is_invalid_xml_char(c)).collect())
}

/// Split rich text into pieces that can each be wrapped in one CDATA section.
///
/// A value containing `]]>` would close its CDATA section early. Each
/// occurrence is split between `]]` and `>`, so writing the pieces as
/// adjacent sections (`<![CDATA[a]]]]><![CDATA[>b]]>`) yields the original
/// text when parsed.
///
/// Always yields at least one piece; the pieces are borrowed from `s`.
///
/// # Examples
///
/// ```
/// use podcast_feed::util::cdata_sections;
///
/// let pieces: Vec<&str> = cdata_sections("a]]>b").collect();
/// assert_eq!(pieces, ["a]]", ">b"]);
/// ```
pub fn cdata_sections(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(s);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(CDATA_END) {
            Some(idx) => {
                // Keep "]]" in this piece, start the next one at ">"
                let (head, tail) = current.split_at(idx + 2);
                rest = Some(tail);
                Some(head)
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
