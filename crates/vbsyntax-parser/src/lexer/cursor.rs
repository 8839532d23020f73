use vbsyntax_core::Location;

use super::chars::is_line_terminator;

/// Character-level reader over the source.
///
/// Keeps the byte offset for slicing alongside the [`Location`] fields:
/// character index, line and column. Tabs advance the column by the
/// configured tab width.
#[derive(Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    /// Unread suffix of `source`.
    rest: &'src str,
    offset: usize,
    index: u32,
    line: u32,
    column: u32,
    tab_spaces: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str, tab_spaces: u32) -> Self {
        Self {
            source,
            rest: source,
            offset: 0,
            index: 0,
            line: 1,
            column: 1,
            tab_spaces,
        }
    }

    #[inline]
    pub fn set_tab_spaces(&mut self, tab_spaces: u32) {
        self.tab_spaces = tab_spaces;
    }

    /// Byte offset of the next character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The location of the next character.
    #[inline]
    pub fn location(&self) -> Location {
        Location::new(self.index, self.line, self.column)
    }

    /// The next character.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        let first = *self.rest.as_bytes().first()?;
        if first < 128 {
            Some(first as char)
        } else {
            self.rest.chars().next()
        }
    }

    /// The character `n` places after the next one.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    #[inline]
    pub fn check(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    /// Consume one character, updating line and column.
    ///
    /// A carriage return immediately followed by a line feed does not end
    /// the line by itself; the line feed does.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let len = ch.len_utf8();
        self.rest = &self.rest[len..];
        self.offset += len;
        self.index += 1;

        if ch == '\t' {
            self.column += self.tab_spaces;
        } else if is_line_terminator(ch) && !(ch == '\r' && self.peek() == Some('\n')) {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn eat_if(&mut self, f: impl Fn(char) -> bool) -> Option<char> {
        if self.check(f) { self.advance() } else { None }
    }

    /// Consume a run of characters matching `f` and return it.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset;
        while self.check(&f) {
            self.advance();
        }
        &self.source[start..self.offset]
    }

    /// Source text from byte offset `start` up to the cursor.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cursor = Cursor::new("hello", 4);
        assert_eq!(cursor.peek(), Some('h'));
        assert_eq!(cursor.offset(), 0);

        assert_eq!(cursor.advance(), Some('h'));
        assert_eq!(cursor.peek(), Some('e'));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.location().index, 1);
    }

    #[test]
    fn cursor_eat_while() {
        let mut cursor = Cursor::new("aaabbb", 4);
        assert_eq!(cursor.eat_while(|c| c == 'a'), "aaa");
        assert_eq!(cursor.eat_while(|c| c == 'b'), "bbb");
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn index_counts_characters_not_bytes() {
        let mut cursor = Cursor::new("ｘé1", 4);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.offset(), 5);
        let loc = cursor.location();
        assert_eq!(loc.index, 2);
        assert_eq!(loc.column, 3);
        assert_eq!(cursor.slice_from(0), "ｘé");
    }

    #[test]
    fn tabs_use_tab_width() {
        let mut cursor = Cursor::new("\tx", 4);
        cursor.advance();
        assert_eq!(cursor.location().column, 5);

        let mut cursor = Cursor::new("\tx", 1);
        cursor.advance();
        assert_eq!(cursor.location().column, 2);
    }

    #[test]
    fn line_terminators() {
        let mut cursor = Cursor::new("a\r\nb\rc\u{2028}d", 4);
        cursor.advance(); // a
        cursor.advance(); // \r
        assert_eq!(cursor.location().line, 1);
        cursor.advance(); // \n
        assert_eq!(cursor.location().line, 2);
        assert_eq!(cursor.location().column, 1);
        cursor.advance(); // b
        cursor.advance(); // \r
        assert_eq!(cursor.location().line, 3);
        cursor.advance(); // c
        cursor.advance(); // U+2028
        assert_eq!(cursor.location().line, 4);
        assert_eq!(cursor.peek(), Some('d'));
    }

    #[test]
    fn cursor_peek_nth_and_eat() {
        let mut cursor = Cursor::new("abc", 4);
        assert_eq!(cursor.peek_nth(2), Some('c'));
        assert_eq!(cursor.peek_nth(3), None);
        assert!(cursor.eat('a'));
        assert!(!cursor.eat('a'));
        assert_eq!(cursor.eat_if(|c| c == 'b'), Some('b'));
        assert_eq!(cursor.eat_if(|c| c == 'b'), None);
    }
}
