//! Byte-wise UTF-8 decoding for text measurement and drawing.
//!
//! Malformed input never produces garbage codepoints: a stray continuation
//! byte, a truncated sequence, an overlong encoding, a surrogate or a value
//! above U+10FFFF decodes as U+FFFD and decoding resumes at the next byte
//! that could start a sequence.

/// Substituted for every malformed sequence.
pub const REPLACEMENT: u32 = 0xFFFD;

/// One decoded codepoint and the bytes it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub codepoint: u32,
    /// Byte offset of the first byte of the sequence.
    pub offset: usize,
    /// Number of bytes consumed.
    pub len: usize,
}

/// Iterator over the codepoints of a byte string.
#[derive(Debug, Clone)]
pub struct Utf8Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Utf8Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Byte offset of the next sequence.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Decode `bytes` into codepoints.
pub fn decode(bytes: &[u8]) -> Utf8Decoder<'_> {
    Utf8Decoder::new(bytes)
}

impl Iterator for Utf8Decoder<'_> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        let offset = self.pos;
        let lead = *self.bytes.get(offset)?;

        let (mut codepoint, extra, min) = if lead & 0x80 == 0 {
            (lead as u32, 0, 0)
        } else if lead & 0xF8 == 0xF0 {
            ((lead & 0x07) as u32, 3, 0x10000)
        } else if lead & 0xF0 == 0xE0 {
            ((lead & 0x0F) as u32, 2, 0x800)
        } else if lead & 0xE0 == 0xC0 {
            ((lead & 0x1F) as u32, 1, 0x80)
        } else {
            // continuation byte or 0xF8..=0xFF outside any sequence
            self.pos += 1;
            return Some(Decoded { codepoint: REPLACEMENT, offset, len: 1 });
        };

        for i in 1..=extra {
            match self.bytes.get(offset + i) {
                Some(&b) if b & 0xC0 == 0x80 => {
                    codepoint = (codepoint << 6) | (b & 0x3F) as u32;
                }
                _ => {
                    self.pos = offset + i;
                    return Some(Decoded { codepoint: REPLACEMENT, offset, len: i });
                }
            }
        }

        let len = extra + 1;
        self.pos = offset + len;

        let valid = codepoint >= min
            && codepoint <= 0x10FFFF
            && !(0xD800..=0xDFFF).contains(&codepoint);

        Some(Decoded {
            codepoint: if valid { codepoint } else { REPLACEMENT },
            offset,
            len,
        })
    }
}
