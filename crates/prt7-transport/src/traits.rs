use crate::error::Result;

/// A provider of complete text lines.
///
/// `Ok(Some(line))` carries one line with its terminator already stripped.
/// `Ok(None)` means the stream is exhausted and no further data will arrive.
pub trait LineSource {
    /// Return the next complete line, blocking as the source sees fit.
    fn next_line(&mut self) -> Result<Option<String>>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

/// Scripted lines, mostly useful in tests and for callers that already hold
/// the whole transcript in memory.
impl LineSource for std::vec::IntoIter<String> {
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.next())
    }
}
