//! Character classification.
//!
//! Every full-width form in U+FF01..=U+FF5E is treated as its ASCII
//! counterpart; callers classify `half_width(c)` and keep the original
//! character wherever source text is preserved verbatim.

/// Map a full-width character to its ASCII equivalent; other characters
/// are returned unchanged.
#[inline]
pub fn half_width(c: char) -> char {
    match c {
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        '\u{3000}' => ' ',
        _ => c,
    }
}

#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{2028}' | '\u{2029}')
}

/// Blank characters other than line terminators.
#[inline]
pub fn is_blank(c: char) -> bool {
    match c {
        ' ' | '\t' => true,
        c if c.is_ascii() => false,
        c => c.is_whitespace() && !is_line_terminator(c),
    }
}

/// Quote characters that open, close or double inside a string literal.
#[inline]
pub fn is_double_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}' | '\u{FF02}')
}

/// Quote characters that start a comment.
#[inline]
pub fn is_single_quote(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{FF07}')
}

#[inline]
pub fn is_decimal_digit(c: char) -> bool {
    half_width(c).is_ascii_digit()
}

/// Numeric value of a (possibly full-width) digit in the given radix.
#[inline]
pub fn digit_value(c: char, radix: u32) -> Option<u32> {
    half_width(c).to_digit(radix)
}

/// Whether `c` can start an identifier. A leading `_` must be followed by
/// at least one identifier part, which the scanner checks separately.
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    let c = half_width(c);
    c.is_alphabetic() || c == '_'
}

#[inline]
pub fn is_identifier_part(c: char) -> bool {
    let c = half_width(c);
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_maps_to_ascii() {
        assert_eq!(half_width('１'), '1');
        assert_eq!(half_width('＜'), '<');
        assert_eq!(half_width('Ａ'), 'A');
        assert_eq!(half_width('ｚ'), 'z');
        assert_eq!(half_width('\u{3000}'), ' ');
        assert_eq!(half_width('x'), 'x');
        assert_eq!(half_width('é'), 'é');
    }

    #[test]
    fn classifies_terminators_and_blanks() {
        for c in ['\r', '\n', '\u{2028}', '\u{2029}'] {
            assert!(is_line_terminator(c));
            assert!(!is_blank(c));
        }
        assert!(is_blank(' '));
        assert!(is_blank('\t'));
        assert!(is_blank('\u{3000}'));
        assert!(!is_blank('a'));
    }

    #[test]
    fn digits_in_both_widths() {
        assert!(is_decimal_digit('7'));
        assert!(is_decimal_digit('７'));
        assert_eq!(digit_value('７', 8), Some(7));
        assert_eq!(digit_value('8', 8), None);
        assert_eq!(digit_value('Ｆ', 16), Some(15));
        assert_eq!(digit_value('9', 8), None);
    }

    #[test]
    fn identifier_classes() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('ä'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(is_identifier_part('＿'));
        assert!(!is_identifier_part('$'));
    }

    #[test]
    fn quote_families() {
        assert!(is_double_quote('"'));
        assert!(is_double_quote('\u{201C}'));
        assert!(is_double_quote('＂'));
        assert!(is_single_quote('\''));
        assert!(is_single_quote('\u{2019}'));
        assert!(!is_single_quote('"'));
    }
}
