//! Newline framing for a chunked byte stream.

/// Longest line kept, in bytes. Figure payloads are the largest events.
pub const MAX_LINE_BYTES: usize = 32 * 1024 * 1024;

/// Accumulates raw chunks and yields complete lines.
///
/// A trailing partial line is held until a later chunk terminates it. Bytes
/// are buffered undecoded, so a UTF-8 sequence split across chunks is
/// reassembled before decoding. Bytes already searched for a newline are not
/// searched again. A line longer than the limit is discarded up to its
/// terminator.
#[derive(Debug)]
pub struct LineBuffer {
    pending: Vec<u8>,
    scanned: usize,
    max_line: usize,
    overflowed: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }
}

fn decode(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(line).into_owned()
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            pending: Vec::new(),
            scanned: 0,
            max_line,
            overflowed: false,
        }
    }

    /// Appends `chunk` and drains every newline-terminated line.
    ///
    /// Lines are returned without the terminator (`\n` or `\r\n`).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[self.scanned..]
            .iter()
            .position(|byte| *byte == b'\n')
        {
            let end = self.scanned + offset;
            if self.overflowed {
                self.overflowed = false;
            } else {
                lines.push(decode(&self.pending[start..end]));
            }
            start = end + 1;
            self.scanned = start;
        }
        self.pending.drain(..start);
        self.scanned = self.pending.len();

        if self.pending.len() > self.max_line {
            tracing::warn!(
                buffered = self.pending.len(),
                limit = self.max_line,
                "Discarding oversized stream line"
            );
            self.pending.clear();
            self.scanned = 0;
            self.overflowed = true;
        }
        lines
    }

    /// Takes whatever is left once the stream has closed.
    pub fn finish(&mut self) -> Option<String> {
        self.scanned = 0;
        if std::mem::take(&mut self.overflowed) || self.pending.is_empty() {
            self.pending.clear();
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        let text = decode(&rest);
        (!text.trim().is_empty()).then_some(text)
    }

    pub fn has_partial(&self) -> bool {
        !self.pending.is_empty()
    }
}
