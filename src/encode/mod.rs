//! Serialization of snapshots into response bodies.
//!
//! JSON is written without HTML escaping (`<`, `>` and `&` stay as they are) and
//! terminated by a newline. Compressed bodies are produced by compressors taken
//! from a shared [`Pool`], so concurrent requests do not allocate fresh deflate
//! state each time.
mod gzip;
mod pool;

pub use gzip::GzipCompressor;
pub use pool::{Pool, Pooled, Reset};

/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// No insignificant whitespace.
    Compact,
    /// Two-space indentation.
    Pretty,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to compress response: {0}")]
    Compress(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Encoder {
    gzip: Pool<GzipCompressor>,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            gzip: Pool::new(GzipCompressor::default),
        }
    }

    /// Serializes `value` as JSON in the given `style`, gzip-compressed if `compress` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if `value` cannot be represented as JSON and
    /// [`Error::Compress`] if compression fails.
    pub fn encode<T>(&self, value: &T, style: Style, compress: bool) -> Result<Vec<u8>>
    where
        T: serde::Serialize + ?Sized,
    {
        let json = to_json(value, style)?;
        if !compress {
            return Ok(json);
        }

        let mut out = Vec::with_capacity(json.len() / 4);
        self.gzip
            .take()
            .compress(&json, &mut out)
            .map_err(Error::Compress)?;
        Ok(out)
    }

    /// Number of compressors ready for reuse.
    pub fn idle_compressors(&self) -> usize {
        self.gzip.idle()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T>(value: &T, style: Style) -> Result<Vec<u8>>
where
    T: serde::Serialize + ?Sized,
{
    let mut out = match style {
        Style::Compact => serde_json::to_vec(value),
        Style::Pretty => serde_json::to_vec_pretty(value),
    }
    .map_err(Error::Serialize)?;
    out.push(b'\n');
    Ok(out)
}
