//! Size calculation and encoding, the two passes over the field plan.

use tracing::debug;
use tracing::trace;
use wirepack::SizeCounter;
use wirepack::SliceWriter;

use crate::error::Error;
use crate::error::Result;
use crate::message::Message;
use crate::plan;

/// Runs `plan` against a counter and returns the byte total.
pub(crate) fn measure<F>(plan: F) -> Result<u32>
where
    F: FnOnce(&mut SizeCounter) -> Result<()>,
{
    let mut counter = SizeCounter::new();
    plan(&mut counter)?;
    Ok(counter.finish()?)
}

/// Exact number of bytes `encode` writes for `message`.
///
/// # Errors
/// The same validation errors `encode` reports: malformed flags, the string
/// table, an entry count that contradicts `MultipleEntries`, a nested type name
/// that disagrees with its element, or a message past the 32-bit size limit.
pub fn compute_size(message: &Message) -> Result<u32> {
    measure(|s| plan::write_message(s, message).map(|_| ()))
}

/// Writes `message` into `buf`, which must be exactly `compute_size(message)` long.
///
/// Returns the number of bytes written.
///
/// # Errors
/// `SizeMismatch` if `buf` is too short or too long, plus every error
/// `compute_size` reports.
pub fn encode(message: &Message, buf: &mut [u8]) -> Result<u32> {
    let result = write(message, buf);
    match &result {
        Ok(size) => trace!(size, entries = message.entries.len(), "encoded message"),
        Err(e) => debug!(error = %e, "refused to encode message"),
    }
    result
}

fn write(message: &Message, buf: &mut [u8]) -> Result<u32> {
    let len = buf.len();
    let mut writer = SliceWriter::new(buf);
    let size = match plan::write_message(&mut writer, message) {
        Ok(size) => size,
        Err(Error::SizeMismatch { entity: "buffer", .. }) => {
            return Err(Error::SizeMismatch {
                entity: "buffer",
                expected: compute_size(message)? as u64,
                actual: len as u64,
            });
        }
        Err(e) => return Err(e),
    };
    let written = writer.finish()?;
    if written != len {
        return Err(Error::SizeMismatch { entity: "buffer", expected: size as u64, actual: len as u64 });
    }
    Ok(size)
}

/// Encodes `message` into a freshly allocated buffer of exactly its size.
pub fn encode_to_vec(message: &Message) -> Result<Vec<u8>> {
    let size = compute_size(message)?;
    let mut buf = vec![0u8; size as usize];
    encode(message, &mut buf)?;
    Ok(buf)
}

impl Message {
    /// Exact encoded size of this message.
    pub fn compute_size(&self) -> Result<u32> {
        compute_size(self)
    }

    pub fn encode(&self, buf: &mut [u8]) -> Result<u32> {
        encode(self, buf)
    }

    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        encode_to_vec(self)
    }
}
