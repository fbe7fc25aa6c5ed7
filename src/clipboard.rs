use std::io::Write;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("nothing to copy")]
    Empty,
    #[error("failed to write clipboard sequence: {0}")]
    Io(#[from] std::io::Error),
}

/// OSC 52 "set clipboard" sequence, understood by most terminal emulators
/// and forwarded by tmux when `set-clipboard` is on.
pub fn osc52_sequence(text: &str) -> Result<String, ClipboardError> {
    if text.trim().is_empty() {
        return Err(ClipboardError::Empty);
    }

    Ok(format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes())))
}

pub fn copy_to_terminal<W: Write>(writer: &mut W, text: &str) -> Result<(), ClipboardError> {
    let sequence = osc52_sequence(text)?;
    writer.write_all(sequence.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn encodes_text_as_osc52() {
        let mut buffer = Vec::new();
        copy_to_terminal(&mut buffer, "https://ted.com/talks/x").expect("copy should succeed");

        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(written, "\x1b]52;c;aHR0cHM6Ly90ZWQuY29tL3RhbGtzL3g=\x07");
    }

    #[test]
    fn refuses_blank_text() {
        let mut buffer = Vec::new();
        assert!(matches!(
            copy_to_terminal(&mut buffer, "   "),
            Err(ClipboardError::Empty)
        ));
        assert!(buffer.is_empty());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn surfaces_write_failures() {
        assert!(matches!(
            copy_to_terminal(&mut BrokenPipe, "text"),
            Err(ClipboardError::Io(_))
        ));
    }
}
