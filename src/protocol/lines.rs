/// Incremental splitter turning arbitrary read chunks into newline-terminated
/// lines. Bytes already checked for a terminator are never rescanned, so slow
/// trickled input stays linear.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
    scanned: usize,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk and drain every line it completed, in arrival order.
    /// Lines come back with surrounding whitespace trimmed; invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        loop {
            match self.buf[self.scanned..].iter().position(|&b| b == b'\n') {
                Some(offset) => {
                    let end = self.scanned + offset;
                    let line = String::from_utf8_lossy(&self.buf[..end])
                        .trim()
                        .to_string();
                    lines.push(line);
                    self.buf.drain(..=end);
                    self.scanned = 0;
                }
                None => {
                    self.scanned = self.buf.len();
                    break;
                }
            }
        }
        lines
    }
}
