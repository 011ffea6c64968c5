/// Forward cursor over JSON text with one-character pushback.
#[derive(Debug, Clone)]
pub struct JsonScanner<'a> {
    input: &'a str,
    index: usize,
}

impl<'a> JsonScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, index: 0 }
    }

    /// Byte offset of the next character to be read.
    pub fn position(&self) -> usize {
        self.index
    }

    /// The unread remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    pub fn move_next(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.index += c.len_utf8();
        Some(c)
    }

    /// Steps back over the last character read and returns it.
    pub fn move_prev(&mut self) -> Option<char> {
        let c = self.input[..self.index].chars().next_back()?;
        self.index -= c.len_utf8();
        Some(c)
    }

    /// Reads exactly `count` characters, or nothing if fewer remain.
    pub fn move_next_n(&mut self, count: usize) -> Option<&'a str> {
        let rest = self.rest();
        let end = match rest.char_indices().nth(count) {
            Some((offset, _)) => offset,
            None if rest.chars().count() == count => rest.len(),
            None => return None,
        };
        self.index += end;
        Some(&rest[..end])
    }

    /// Skips `byte_len` bytes; used after matching a pattern against `rest()`.
    pub fn advance(&mut self, byte_len: usize) {
        self.index = (self.index + byte_len).min(self.input.len());
    }

    pub fn next_non_empty_char(&mut self) -> Option<char> {
        loop {
            let c = self.move_next()?;
            if !c.is_whitespace() {
                return Some(c);
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.input.len()
    }
}
