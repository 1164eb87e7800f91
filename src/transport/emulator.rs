//! # Printer Emulator Sink
//!
//! Captures everything the session would have sent to the printer, which
//! saves on paper. Used by the test suite and by `--emulate` dry runs.
//!
//! Each write is also logged in a readable form where control bytes appear
//! as bracketed decimal codes, e.g. a 3-line skip renders as `[27][11]03`.

use tracing::info;

use super::{Sink, TransportError};

/// In-memory sink that records all writes and never fails.
#[derive(Debug, Default)]
pub struct EmulatorSink {
    printed: Vec<u8>,
}

impl EmulatorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, byte for byte.
    pub fn printed(&self) -> &[u8] {
        &self.printed
    }

    /// The captured output as text, for dumping to a console.
    pub fn printed_text(&self) -> String {
        String::from_utf8_lossy(&self.printed).into_owned()
    }

    /// The captured output with control bytes rendered as `[n]`.
    pub fn rendered(&self) -> String {
        render_bytes(&self.printed)
    }
}

impl Sink for EmulatorSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.printed.extend_from_slice(bytes);

        let mut rendered = render_bytes(bytes);
        if rendered.ends_with('\n') {
            rendered.pop();
        }
        info!(">> {}", rendered);

        Ok(())
    }
}

/// Render bytes for log inspection.
///
/// The bytes are decoded as text first so multi-byte characters render as
/// themselves. Alphanumerics (Unicode included), spaces and newlines pass
/// through; everything else (escape codes, but also punctuation) becomes
/// its decimal scalar value in brackets, matching how the byte would be
/// quoted in the protocol docs.
pub fn render_bytes(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() || c == ' ' || c == '\n' {
            out.push(c);
        } else {
            out.push_str(&format!("[{}]", c as u32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_captures_raw_bytes() {
        let mut sink = EmulatorSink::new();
        sink.write(&[0x1B, 0x0B, b'0', b'3']).unwrap();
        sink.write(b"hello\n").unwrap();
        assert_eq!(sink.printed(), &[0x1B, 0x0B, b'0', b'3', b'h', b'e', b'l', b'l', b'o', b'\n']);
    }

    #[test]
    fn test_renders_control_bytes_as_codes() {
        assert_eq!(render_bytes(&[0x1B, 0x0B, b'0', b'3']), "[27][11]03");
        assert_eq!(render_bytes(b"two words\n"), "two words\n");
        // Punctuation is quoted too, same as the protocol docs
        assert_eq!(render_bytes(b"a.b"), "a[46]b");
    }

    #[test]
    fn test_renders_unicode_text_readably() {
        // Accented characters are alphanumeric and must not be exploded
        // into per-byte codes
        assert_eq!(render_bytes("café crème\n".as_bytes()), "café crème\n");
        // Non-alphanumeric multi-byte chars quote their scalar value
        assert_eq!(render_bytes("a→b".as_bytes()), "a[8594]b");
    }

    #[test]
    fn test_rendered_accumulates_across_writes() {
        let mut sink = EmulatorSink::new();
        sink.write(&[0x0D]).unwrap();
        sink.write(b"line\n").unwrap();
        assert_eq!(sink.rendered(), "[13]line\n");
    }
}
