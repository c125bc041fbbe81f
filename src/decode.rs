use crate::errors::{Error, Result};

/// Accumulates raw bytes across reads and yields decoded UTF-8 text.
///
/// A multi-byte character can be split across two reads. The trailing
/// incomplete sequence is carried over and prepended to the next batch, so
/// the split never surfaces to the consumer.
#[derive(Debug, Default)]
pub struct Reassembler {
    carry: Vec<u8>,
}

impl Reassembler {
    pub fn new() -> Self {
        Reassembler::default()
    }

    /// Feeds one batch of received bytes and returns the decoded text.
    ///
    /// Returns `Error::Decode` if the bytes contain a sequence that is
    /// invalid (not merely incomplete); the bad batch is discarded so the
    /// caller can skip it and keep reading.
    pub fn push(&mut self, bytes: &[u8]) -> Result<String> {
        let mut pending = std::mem::take(&mut self.carry);
        pending.extend_from_slice(bytes);

        match std::str::from_utf8(&pending) {
            Ok(text) => Ok(text.to_string()),
            Err(e) => {
                let valid = e.valid_up_to();

                if e.error_len().is_some() {
                    return Err(Error::Decode(valid));
                }

                // Incomplete code point at the tail, keep it for the next read
                self.carry = pending[valid..].to_vec();
                Ok(String::from_utf8_lossy(&pending[..valid]).into_owned())
            }
        }
    }

    /// Called once the stream is closed. A non-empty carry means the peer
    /// hung up mid-character.
    pub fn finish(&mut self) -> Result<()> {
        if self.carry.is_empty() {
            Ok(())
        } else {
            self.carry.clear();
            Err(Error::Decode(0))
        }
    }
}
