/// Position over the current chunk.
///
/// The cursor only moves when a sub-parser consumes a character, and
/// `partial` records whether more text may follow the end of `input`.
/// `base` is the stream offset of the chunk's first byte.
pub struct InputCursor<'a> {
    input: &'a str,
    base: usize,
    offset: usize,
    partial: bool,
}

impl<'a> InputCursor<'a> {
    pub fn new(input: &'a str, partial: bool) -> Self {
        Self::with_base(input, 0, partial)
    }

    pub fn with_base(input: &'a str, base: usize, partial: bool) -> Self {
        Self {
            input,
            base,
            offset: 0,
            partial,
        }
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    #[inline]
    pub fn advance(&mut self, c: char) {
        self.offset += c.len_utf8();
    }

    /// Consume the next character, if any.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.advance(c);
        Some(c)
    }

    pub fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance(c);
        }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset in the whole stream, counting earlier chunks.
    #[inline]
    pub fn position(&self) -> usize {
        self.base + self.offset
    }

    #[inline]
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Text consumed since `start`.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.offset]
    }
}
