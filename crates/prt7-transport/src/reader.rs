use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use bytes::{Buf, BytesMut};

use crate::error::{Result, TransportError};
use crate::traits::LineSource;

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// Default maximum line length in bytes (terminator excluded).
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Default pause after a `WouldBlock` read.
pub const DEFAULT_IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// Configuration for a [`LineReader`].
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Maximum line length in bytes. Default: 4096.
    pub max_line_len: usize,
    /// Consecutive idle polls (`WouldBlock`/`TimedOut` reads) after which the
    /// source is considered exhausted. `None` waits forever.
    pub max_idle_polls: Option<u32>,
    /// Sleep after a `WouldBlock` read so non-blocking descriptors are not
    /// spun on. `TimedOut` reads already waited and retry immediately.
    pub idle_backoff: Duration,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_idle_polls: None,
            idle_backoff: DEFAULT_IDLE_BACKOFF,
        }
    }
}

/// Reads complete text lines from any `Read` stream.
///
/// Owns its buffer, so partial reads and split terminators are handled
/// internally. Callers always get whole lines with `\n` / `\r\n` removed.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    config: LineConfig,
    idle_polls: u32,
    eof: bool,
    // Dropping the rest of an over-long line until its `\n` arrives.
    discarding: bool,
}

impl<T: Read> LineReader<T> {
    /// Create a new line reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineConfig::default())
    }

    /// Create a new line reader with explicit configuration.
    pub fn with_config(inner: T, config: LineConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            idle_polls: 0,
            eof: false,
            discarding: false,
        }
    }

    /// Read the next complete line (blocking).
    ///
    /// Returns `Ok(None)` once EOF is reached and any trailing partial line
    /// has been handed out, or when the idle-poll limit is hit.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(line) = self.take_line()? {
                return Ok(Some(line));
            }
            if self.eof {
                return Ok(self.take_remainder());
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    self.idle_polls = self.idle_polls.saturating_add(1);
                    if let Some(limit) = self.config.max_idle_polls {
                        if self.idle_polls >= limit {
                            tracing::warn!(
                                idle_polls = self.idle_polls,
                                "line source idle, giving up"
                            );
                            self.eof = true;
                            continue;
                        }
                    }
                    let backoff = self.config.idle_backoff;
                    if err.kind() == ErrorKind::WouldBlock && !backoff.is_zero() {
                        std::thread::sleep(backoff);
                    }
                    continue;
                }
                Err(err) => return Err(TransportError::Io(err)),
            };

            if read == 0 {
                self.eof = true;
                continue;
            }

            self.idle_polls = 0;
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current line reader configuration.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Returns true once the underlying stream reported EOF or went idle.
    pub fn is_exhausted(&self) -> bool {
        self.eof && self.buf.is_empty()
    }

    fn take_line(&mut self) -> Result<Option<String>> {
        if self.discarding {
            match self.buf.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.buf.advance(pos + 1);
                    self.discarding = false;
                }
                None => {
                    self.buf.clear();
                    return Ok(None);
                }
            }
        }

        let Some(pos) = self.buf.iter().position(|&b| b == b'\n') else {
            if self.buf.len() > self.config.max_line_len {
                let len = self.buf.len();
                self.buf.clear();
                self.discarding = true;
                return Err(TransportError::LineTooLong {
                    len,
                    max: self.config.max_line_len,
                });
            }
            return Ok(None);
        };

        if pos > self.config.max_line_len {
            let len = pos;
            self.buf.advance(pos + 1);
            return Err(TransportError::LineTooLong {
                len,
                max: self.config.max_line_len,
            });
        }

        let raw = self.buf.split_to(pos);
        self.buf.advance(1);
        Ok(Some(decode_line(&raw)))
    }

    fn take_remainder(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let raw = self.buf.split();
        Some(decode_line(&raw))
    }
}

impl<T: Read> LineSource for LineReader<T> {
    fn next_line(&mut self) -> Result<Option<String>> {
        self.read_line()
    }
}

/// Open a serial device node or capture file for reading.
pub fn open_device(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    File::open(path).map_err(|source| TransportError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn reader(bytes: &[u8]) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn read_single_line() {
        let mut r = reader(b"L,A\n");
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,A"));
        assert!(r.read_line().unwrap().is_none());
        assert!(r.is_exhausted());
    }

    #[test]
    fn read_multiple_lines_with_crlf() {
        let mut r = reader(b"L,H\r\nM,-3\r\nEND\r\n");
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,H"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("M,-3"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
        assert!(r.read_line().unwrap().is_none());
    }

    #[test]
    fn trailing_line_without_terminator_is_yielded() {
        let mut r = reader(b"L,A\nEND");
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,A"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
        assert!(r.read_line().unwrap().is_none());
    }

    #[test]
    fn empty_lines_are_preserved() {
        let mut r = reader(b"\n\nEND\n");
        assert_eq!(r.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(r.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
    }

    #[test]
    fn empty_stream_is_exhausted() {
        let mut r = reader(b"");
        assert!(r.read_line().unwrap().is_none());
        assert!(r.read_line().unwrap().is_none());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut r = reader(b"L,\xff\n");
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,\u{fffd}"));
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: b"M,12\nL,Space\n".to_vec(),
            pos: 0,
        };
        let mut r = LineReader::new(byte_reader);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("M,12"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,Space"));
        assert!(r.read_line().unwrap().is_none());
    }

    #[test]
    fn oversized_line_without_terminator() {
        let cfg = LineConfig {
            max_line_len: 8,
            ..LineConfig::default()
        };
        let mut r = LineReader::with_config(Cursor::new(vec![b'x'; 64]), cfg);
        let err = r.read_line().unwrap_err();
        assert!(matches!(err, TransportError::LineTooLong { max: 8, .. }));
    }

    #[test]
    fn oversized_line_is_skipped_and_reading_resumes() {
        let cfg = LineConfig {
            max_line_len: 4,
            ..LineConfig::default()
        };
        let mut r = LineReader::with_config(Cursor::new(b"L,ABCDEFG\nEND\n".to_vec()), cfg);
        let err = r.read_line().unwrap_err();
        assert!(matches!(err, TransportError::LineTooLong { len: 9, max: 4 }));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
    }

    #[test]
    fn oversized_line_across_small_reads_recovers() {
        let cfg = LineConfig {
            max_line_len: 4,
            ..LineConfig::default()
        };
        let chunked = ChunkedReader {
            bytes: b"L,ABCDEFG\nEND\n".to_vec(),
            pos: 0,
            chunk: 4,
        };
        let mut r = LineReader::with_config(chunked, cfg);

        let err = r.read_line().unwrap_err();
        assert!(matches!(err, TransportError::LineTooLong { len: 8, max: 4 }));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
        assert!(r.read_line().unwrap().is_none());
    }

    #[test]
    fn oversized_trailing_line_at_eof_is_dropped() {
        let cfg = LineConfig {
            max_line_len: 4,
            ..LineConfig::default()
        };
        let chunked = ChunkedReader {
            bytes: b"L,A\nxxxxxxxxxxxx".to_vec(),
            pos: 0,
            chunk: 5,
        };
        let mut r = LineReader::with_config(chunked, cfg);

        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,A"));
        assert!(r.read_line().is_err());
        assert!(r.read_line().unwrap().is_none());
        assert!(r.is_exhausted());
    }

    #[test]
    fn interrupted_read_retries() {
        let inner = ScriptedReader::new(vec![
            Err(ErrorKind::Interrupted),
            Ok(b"L,B\n".to_vec()),
        ]);
        let mut r = LineReader::new(inner);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,B"));
    }

    #[test]
    fn idle_polls_without_limit_keep_waiting() {
        let inner = ScriptedReader::new(vec![
            Err(ErrorKind::TimedOut),
            Err(ErrorKind::WouldBlock),
            Err(ErrorKind::TimedOut),
            Ok(b"END\n".to_vec()),
        ]);
        let mut r = LineReader::new(inner);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
    }

    #[test]
    fn would_block_backs_off() {
        let inner = ScriptedReader::new(vec![
            Err(ErrorKind::WouldBlock),
            Err(ErrorKind::WouldBlock),
            Err(ErrorKind::WouldBlock),
            Ok(b"END\n".to_vec()),
        ]);
        let cfg = LineConfig {
            idle_backoff: Duration::from_millis(5),
            ..LineConfig::default()
        };
        let mut r = LineReader::with_config(inner, cfg);

        let start = std::time::Instant::now();
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn idle_poll_limit_reports_exhaustion() {
        let inner = ScriptedReader::new(vec![
            Ok(b"L,A\nL,".to_vec()),
            Err(ErrorKind::TimedOut),
            Err(ErrorKind::TimedOut),
            Ok(b"never\n".to_vec()),
        ]);
        let cfg = LineConfig {
            max_idle_polls: Some(2),
            ..LineConfig::default()
        };
        let mut r = LineReader::with_config(inner, cfg);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,A"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,"));
        assert!(r.read_line().unwrap().is_none());
    }

    #[test]
    fn data_resets_idle_counter() {
        let inner = ScriptedReader::new(vec![
            Err(ErrorKind::TimedOut),
            Ok(b"L,A\n".to_vec()),
            Err(ErrorKind::TimedOut),
            Ok(b"END\n".to_vec()),
        ]);
        let cfg = LineConfig {
            max_idle_polls: Some(2),
            ..LineConfig::default()
        };
        let mut r = LineReader::with_config(inner, cfg);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,A"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
    }

    #[test]
    fn hard_io_error_propagates() {
        let inner = ScriptedReader::new(vec![Err(ErrorKind::BrokenPipe)]);
        let mut r = LineReader::new(inner);
        let err = r.read_line().unwrap_err();
        assert!(matches!(err, TransportError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn line_source_impl_matches_read_line() {
        let mut r = reader(b"M,1\n");
        assert_eq!(r.next_line().unwrap().as_deref(), Some("M,1"));
        assert!(r.next_line().unwrap().is_none());
    }

    #[test]
    fn open_missing_device_reports_path() {
        let path = std::env::temp_dir().join(format!("prt7-missing-{}", std::process::id()));
        let err = open_device(&path).unwrap_err();
        match err {
            TransportError::Open { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn open_capture_file_and_read() {
        let dir = std::env::temp_dir().join(format!("prt7-transport-open-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("capture.txt");
        std::fs::write(&path, "L,A\nEND\n").unwrap();

        let mut r = LineReader::new(open_device(&path).unwrap());
        assert_eq!(r.read_line().unwrap().as_deref(), Some("L,A"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("END"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut r = reader(b"");
        assert_eq!(r.config().max_line_len, DEFAULT_MAX_LINE_LEN);
        let _ = r.get_ref();
        let _ = r.get_mut();
        let _inner = r.into_inner();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    /// Hands out at most `chunk` bytes per read, like a slow serial line.
    struct ChunkedReader {
        bytes: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.bytes.len() - self.pos);
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Replays a fixed script of reads; each `Ok` chunk fits in one read.
    struct ScriptedReader {
        steps: std::collections::VecDeque<std::result::Result<Vec<u8>, ErrorKind>>,
    }

    impl ScriptedReader {
        fn new(steps: Vec<std::result::Result<Vec<u8>, ErrorKind>>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Err(kind)) => Err(std::io::Error::from(kind)),
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
            }
        }
    }
}
