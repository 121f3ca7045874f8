//! Frame scanner.
//!
//! Inspects a buffer and reports whether a complete frame sits at its front.
//! The scanner never consumes or copies bytes: on [`Scan::Frame`] the caller
//! drops `consumed` bytes, on [`Scan::NeedMore`] the buffer is left untouched
//! so it can be re-examined after the next read.

use super::frame::{FrameHeader, HEADER_LEN};

/// Outcome of scanning the front of a buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum Scan<'a> {
    /// No complete frame yet; at least `needed` more bytes are required.
    NeedMore { needed: usize },
    /// A complete frame; `consumed` is header plus body length.
    Frame {
        header: FrameHeader,
        body: &'a [u8],
        consumed: usize,
    },
}

/// Scan one frame from the start of `buf`.
#[inline]
pub fn scan_frame(buf: &[u8]) -> Scan<'_> {
    let Some(header) = FrameHeader::parse(buf) else {
        return Scan::NeedMore {
            needed: HEADER_LEN - buf.len(),
        };
    };

    let consumed = HEADER_LEN + header.body_len;
    match buf.get(HEADER_LEN..consumed) {
        Some(body) => Scan::Frame {
            header,
            body,
            consumed,
        },
        None => Scan::NeedMore {
            needed: consumed - buf.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn fewer_than_four_bytes_needs_more() {
        assert_eq!(scan_frame(&[]), Scan::NeedMore { needed: 4 });
        assert_eq!(scan_frame(&[5, 0]), Scan::NeedMore { needed: 2 });
    }

    #[test]
    fn partial_body_needs_more() {
        let buf = [5, 0, 0, 0, 1, 2];
        assert_eq!(scan_frame(&buf), Scan::NeedMore { needed: 3 });
    }

    #[test]
    fn complete_frame_reports_consumed() {
        let buf = [3, 0, 0, 4, 10, 20, 30, 99];
        match scan_frame(&buf) {
            Scan::Frame {
                header,
                body,
                consumed,
            } => {
                assert_eq!(header.sequence, 4);
                assert_eq!(body, &[10, 20, 30]);
                assert_eq!(consumed, 7);
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn zero_length_frame_is_complete() {
        match scan_frame(&[0, 0, 0, 1]) {
            Scan::Frame { body, consumed, .. } => {
                assert!(body.is_empty());
                assert_eq!(consumed, 4);
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }
}
