use crate::error::{FrameError, Result};

/// Append-only sequence of decoded characters, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBuffer {
    chars: Vec<char>,
}

impl MessageBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one character. Any character is accepted.
    ///
    /// Fails only if the buffer cannot grow.
    pub fn append(&mut self, c: char) -> Result<()> {
        self.chars
            .try_reserve(1)
            .map_err(|_| FrameError::OutOfMemory)?;
        self.chars.push(c);
        Ok(())
    }

    /// The full message as a string.
    pub fn render(&self) -> String {
        self.chars.iter().collect()
    }

    /// The message with every character wrapped in brackets, e.g. `[H][I]`.
    pub fn render_bracketed(&self) -> String {
        let mut out = String::with_capacity(self.chars.len() * 3);
        for c in &self.chars {
            out.push('[');
            out.push(*c);
            out.push(']');
        }
        out
    }

    /// Number of characters appended so far.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns true if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Borrow the characters in arrival order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_renders_empty() {
        let buf = MessageBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.render(), "");
        assert_eq!(buf.render_bracketed(), "");
    }

    #[test]
    fn render_keeps_append_order() {
        let mut buf = MessageBuffer::new();
        let input = "HOLA MUNDO, 42!";
        for c in input.chars() {
            buf.append(c).unwrap();
        }
        assert_eq!(buf.len(), input.chars().count());
        assert_eq!(buf.render(), input);
        assert_eq!(buf.chars().iter().collect::<String>(), input);
    }

    #[test]
    fn render_is_idempotent() {
        let mut buf = MessageBuffer::new();
        buf.append('A').unwrap();
        buf.append(' ').unwrap();
        assert_eq!(buf.render(), buf.render());
        assert_eq!(buf.render_bracketed(), buf.render_bracketed());
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn bracketed_wraps_each_character() {
        let mut buf = MessageBuffer::new();
        for c in ['H', ' ', 'I'] {
            buf.append(c).unwrap();
        }
        assert_eq!(buf.render_bracketed(), "[H][ ][I]");
    }

    #[test]
    fn accepts_non_ascii() {
        let mut buf = MessageBuffer::new();
        buf.append('\u{fffd}').unwrap();
        buf.append('\u{e9}').unwrap();
        assert_eq!(buf.render(), "\u{fffd}\u{e9}");
    }
}
