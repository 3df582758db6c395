//! Local storage for received fragments
//!
//! Fragments are written positionally into a named object; nothing about the object's
//! existing contents is assumed, so fetching the same range twice overwrites only that range.
// (c) 2025 Ross Younger

use std::future::Future;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt as _, AsyncWriteExt as _};
use tracing::{debug, trace};

use crate::error::{ClientError, IoContext as _, Result};
use crate::protocol::FileName;

/// Something that fragment data can be written into
pub trait FragmentSink: Send {
    /// Writes all of `data` at byte offset `offset`
    fn write_at(
        &mut self,
        offset: u64,
        data: &[u8],
    ) -> impl Future<Output = std::io::Result<()>> + Send;

    /// Completes any outstanding writes
    fn finish(&mut self) -> impl Future<Output = std::io::Result<()>> + Send;
}

/// Something that opens [`FragmentSink`]s by remote file name
pub trait FragmentStore: Sync {
    /// Sink type
    type Sink: FragmentSink;

    /// Returns a writable handle to the named object, creating it if absent
    fn open(&self, name: &FileName) -> impl Future<Output = Result<Self::Sink>> + Send;
}

/// Stores fragments as files in a local directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Constructor. The directory is created on first use.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store writes into
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Where a given remote file would be stored
    pub fn path_for(&self, name: &FileName) -> Result<PathBuf> {
        Ok(self.dir.join(local_name(name)?))
    }
}

/// Checks that a remote name is usable as a single path component in the storage directory
fn local_name(name: &FileName) -> Result<&str> {
    let invalid = || ClientError::InvalidFileName(name.to_string());
    let s = std::str::from_utf8(name.as_bytes()).map_err(|_| invalid())?;
    if s.is_empty() || s == "." || s == ".." || s.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }
    Ok(s)
}

impl FragmentStore for LocalStore {
    type Sink = FileSink;

    async fn open(&self, name: &FileName) -> Result<FileSink> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .io_context(format!("creating directory {}", self.dir.display()))?;
        debug!("opening {}", path.display());
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .await
            .io_context(format!("opening {}", path.display()))?;
        Ok(FileSink { file, path })
    }
}

/// A file opened by [`LocalStore`]
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FragmentSink for FileSink {
    async fn write_at(&mut self, offset: u64, data: &[u8]) -> std::io::Result<()> {
        trace!("write {} bytes at {offset} in {}", data.len(), self.path.display());
        let _ = self.file.seek(SeekFrom::Start(offset)).await?;
        self.file.write_all(data).await
    }

    async fn finish(&mut self) -> std::io::Result<()> {
        self.file.flush().await
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store that records every write

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::{FragmentSink, FragmentStore};
    use crate::error::Result;
    use crate::protocol::FileName;

    /// One positional write
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Write {
        pub(crate) offset: u64,
        pub(crate) data: Vec<u8>,
    }

    #[derive(Debug, Default)]
    struct Inner {
        opened: Vec<String>,
        writes: HashMap<String, Vec<Write>>,
    }

    #[derive(Debug, Default, Clone)]
    pub(crate) struct MemoryStore {
        inner: Arc<Mutex<Inner>>,
    }

    impl MemoryStore {
        /// Names opened, in order
        pub(crate) fn opened(&self) -> Vec<String> {
            self.inner.lock().unwrap().opened.clone()
        }

        /// Writes made to `name`, in order
        pub(crate) fn writes(&self, name: &str) -> Vec<Write> {
            self.inner
                .lock()
                .unwrap()
                .writes
                .get(name)
                .cloned()
                .unwrap_or_default()
        }

        /// Replays the writes to `name` into a flat buffer
        pub(crate) fn contents(&self, name: &str) -> Vec<u8> {
            let mut out = Vec::new();
            for w in self.writes(name) {
                let start = usize::try_from(w.offset).unwrap();
                let end = start + w.data.len();
                if out.len() < end {
                    out.resize(end, 0);
                }
                out[start..end].copy_from_slice(&w.data);
            }
            out
        }
    }

    #[derive(Debug)]
    pub(crate) struct MemorySink {
        name: String,
        inner: Arc<Mutex<Inner>>,
    }

    impl FragmentSink for MemorySink {
        async fn write_at(&mut self, offset: u64, data: &[u8]) -> std::io::Result<()> {
            self.inner
                .lock()
                .unwrap()
                .writes
                .entry(self.name.clone())
                .or_default()
                .push(Write {
                    offset,
                    data: data.to_vec(),
                });
            Ok(())
        }

        async fn finish(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl FragmentStore for MemoryStore {
        type Sink = MemorySink;

        async fn open(&self, name: &FileName) -> Result<MemorySink> {
            let name = name.to_string();
            self.inner.lock().unwrap().opened.push(name.clone());
            Ok(MemorySink {
                name,
                inner: self.inner.clone(),
            })
        }
    }
}
