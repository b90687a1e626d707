use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Error that occurs when reading a file fails.
#[derive(Debug, thiserror::Error)]
pub enum FileReadError {
    #[error("failed to open file `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse JSON in file `{path}`: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Opens a file at the given path and wraps it in a [`BufReader`].
///
/// # Errors
///
/// Returns [`FileReadError::Open`] if the file cannot be opened.
///
/// # Example
/// ```no_run
/// # use introspector::fsutil;
/// let reader = fsutil::open_file_reader("/some/file.txt")?;
/// # Ok::<(), fsutil::FileReadError>(())
/// ```
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileReadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reads the whole file into a string.
///
/// # Errors
///
/// Returns [`FileReadError::Open`] or [`FileReadError::Read`] (also for non-UTF-8 content).
pub fn read_text(path: impl AsRef<Path>) -> Result<String, FileReadError> {
    let path = path.as_ref();
    let mut out = String::new();
    open_file_reader(path)?
        .read_to_string(&mut out)
        .map_err(|source| FileReadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(out)
}

/// Reads the file and deserializes its JSON content into `T`.
///
/// # Errors
///
/// Returns [`FileReadError::Open`] if the file cannot be opened and
/// [`FileReadError::Json`] if the content (or reading it) fails.
pub fn read_json<T>(path: impl AsRef<Path>) -> Result<T, FileReadError>
where
    T: serde::de::DeserializeOwned,
{
    let path = path.as_ref();
    serde_json::from_reader(open_file_reader(path)?).map_err(|source| FileReadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
