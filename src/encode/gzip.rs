use flate2::{Compress, Compression, Crc, FlushCompress, Status};

use super::pool::Reset;

/// RFC 1952 member header: magic, deflate, no flags, no mtime, no extra flags, unknown OS.
const GZIP_HEADER: [u8; 10] = [0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff];
/// Minimum spare output capacity handed to the deflate stream per call.
const MIN_SPARE: usize = 256;

/// Reusable gzip compressor.
///
/// Holds the deflate state and checksum; both are reset in place between uses
/// instead of being reallocated.
pub struct GzipCompressor {
    deflate: Compress,
    crc: Crc,
}

impl GzipCompressor {
    pub fn new(level: Compression) -> Self {
        Self {
            deflate: Compress::new(level, false),
            crc: Crc::new(),
        }
    }

    /// Appends a complete gzip member containing `input` to `out`.
    ///
    /// The compressor must be [reset](Reset::reset) before it is used again.
    ///
    /// # Errors
    ///
    /// Returns an error if the deflate stream reports one.
    pub fn compress(&mut self, input: &[u8], out: &mut Vec<u8>) -> std::io::Result<()> {
        out.reserve(GZIP_HEADER.len() + input.len() / 2 + MIN_SPARE);
        out.extend_from_slice(&GZIP_HEADER);
        self.crc.update(input);

        loop {
            if out.capacity() - out.len() < MIN_SPARE {
                out.reserve(out.capacity().max(MIN_SPARE));
            }
            let consumed = usize::try_from(self.deflate.total_in())
                .map_err(std::io::Error::other)?;
            let status = self
                .deflate
                .compress_vec(&input[consumed..], out, FlushCompress::Finish)
                .map_err(std::io::Error::other)?;
            if status == Status::StreamEnd {
                break;
            }
        }

        out.extend_from_slice(&self.crc.sum().to_le_bytes());
        out.extend_from_slice(&self.crc.amount().to_le_bytes());
        Ok(())
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new(Compression::default())
    }
}

impl Reset for GzipCompressor {
    fn reset(&mut self) {
        self.deflate.reset();
        self.crc.reset();
    }
}
