//! Console output trait.

/// Byte sink for console text.
///
/// Writes are fire-and-forget: the transport owns buffering, and a full
/// buffer drops output rather than blocking the console.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ConsoleOutput {
    /// Queue raw bytes for transmission.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Queue a single byte.
    #[inline]
    fn write_byte(&mut self, byte: u8) {
        self.write_bytes(&[byte]);
    }

    /// Queue ASCII text.
    #[inline]
    fn print(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }
}

impl<T: ConsoleOutput + ?Sized> ConsoleOutput for &mut T {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    struct Capture(Vec<u8>);

    impl ConsoleOutput for Capture {
        fn write_bytes(&mut self, bytes: &[u8]) {
            self.0.extend_from_slice(bytes);
        }
    }

    #[test]
    fn test_default_methods_forward_to_write_bytes() {
        let mut out = Capture(Vec::new());
        out.print("# ");
        out.write_byte(b'x');
        (&mut out).print("\r\n");
        assert_eq!(out.0, b"# x\r\n");
    }
}
