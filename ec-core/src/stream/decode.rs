use crate::conf::DecodeMode;
use std::char::REPLACEMENT_CHARACTER;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input is not valid UTF-8 (byte {offset} of the stream)")]
    Invalid { offset: u64 },

    #[error("input ended inside a UTF-8 sequence ({dangling} dangling bytes)")]
    Truncated { dangling: usize },
}

/// Turns raw reads into text.
///
/// A multi-byte sequence cut off by the end of a read is held back and
/// completed by the next read, so only bytes that can never form valid UTF-8
/// are treated as malformed.
#[derive(Debug)]
pub struct ChunkDecoder {
    mode: DecodeMode,
    pending: Vec<u8>,
    consumed: u64,
}

impl ChunkDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self {
            mode,
            pending: Vec::new(),
            consumed: 0,
        }
    }

    /// Decode `bytes`, returning all text that is complete so far.
    ///
    /// The result is empty when `bytes` only extends an unfinished sequence.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<String, DecodeError> {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(bytes);
        // Offset of `buf[0]` within the whole stream.
        let base = self.consumed;

        let mut out = String::with_capacity(buf.len());
        let mut rest: &[u8] = &buf;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match e.error_len() {
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                        Some(len) => match self.mode {
                            DecodeMode::Strict => {
                                let offset = (buf.len() - after.len()) as u64;
                                return Err(DecodeError::Invalid {
                                    offset: base + offset,
                                });
                            }
                            DecodeMode::Lossy => {
                                out.push(REPLACEMENT_CHARACTER);
                                rest = &after[len..];
                            }
                        },
                    }
                }
            }
        }

        self.consumed = base + (buf.len() - self.pending.len()) as u64;
        Ok(out)
    }

    /// Flush at end of input. Returns replacement text for a dangling
    /// sequence in lossy mode.
    pub fn finish(&mut self) -> Result<Option<String>, DecodeError> {
        if self.pending.is_empty() {
            return Ok(None);
        }

        let dangling = std::mem::take(&mut self.pending).len();
        match self.mode {
            DecodeMode::Strict => Err(DecodeError::Truncated { dangling }),
            DecodeMode::Lossy => Ok(Some(REPLACEMENT_CHARACTER.to_string())),
        }
    }
}
