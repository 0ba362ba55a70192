//! # tictactoe-storage
//!
//! why: keep small pieces of application state alive across process restarts
//! relations: used by tictactoe-core for move history and the current step
//! what: Storage trait, FileStorage, InMemoryStorage, Codec, PersistentValue

pub mod codec;
pub mod error;
pub mod value;

pub use codec::{Codec, CodecError, FnCodec, JsonCodec};
pub use error::{Result, StorageError};
pub use value::{InitialValue, PersistentValue};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// trait for a durable key-value slot store
///
/// this abstraction allows the same code to work with:
/// - real filesystem (native)
/// - in-memory (testing)
/// - any host store that can read and write bytes by key
pub trait Storage {
    /// read the raw bytes stored under `key`, `None` if never written
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// replace whatever is stored under `key`
    fn write(&mut self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// delete the entry for `key`, missing keys are not an error
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// storage handle shared by every value bound to the same store
///
/// single-threaded: all operations run to completion on the caller's thread
pub type SharedStorage = Rc<RefCell<dyn Storage>>;

/// wrap a concrete store into a [`SharedStorage`] handle
pub fn shared<S: Storage + 'static>(storage: S) -> SharedStorage {
    Rc::new(RefCell::new(storage))
}

// -- file storage implementation --

/// file-based storage implementation using std::fs
///
/// stores one `<escaped key>.json` file per key inside a directory
pub struct FileStorage {
    /// directory path for storing entry files
    dir: PathBuf,
}

impl FileStorage {
    /// create a new filestorage at the given directory
    /// creates the directory if it doesn't exist
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// directory holding the entry files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// get the path to the file backing `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }
}

/// map an arbitrary key onto a portable file name
///
/// ascii alphanumerics, `.`, `_` and `-` are kept, every other byte becomes `%XX`
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&path)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;

        Ok(Some(contents))
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        // atomic write: write to temp file then rename
        let temp_path = self.dir.join(format!("{}.tmp", escape_key(key)));
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, self.entry_path(key))?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

// -- in-memory storage implementation --

/// in-memory storage for testing
///
/// stores all entries in memory, no persistence across restarts
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl InMemoryStorage {
    /// create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// raw bytes under `key`, for inspection
    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }
}

impl Storage for InMemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
