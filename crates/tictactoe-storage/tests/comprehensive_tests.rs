//! # comprehensive storage tests
//!
//! why: verify persisted values behave correctly across restarts and failures
//! relations: tests tictactoe-storage crate
//! what: backends, round-trips, lazy defaults, corrupt data, write failures

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;
use std::rc::Rc;

use tictactoe_storage::{
    shared, FileStorage, InMemoryStorage, InitialValue, PersistentValue, SharedStorage, Storage,
    StorageError,
};
use tempfile::tempdir;

/// store whose writes can be switched off, for failure paths
#[derive(Default)]
struct FlakyStorage {
    inner: InMemoryStorage,
    fail_writes: bool,
}

impl Storage for FlakyStorage {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        self.inner.read(key)
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "quota exceeded"));
        }
        self.inner.write(key, bytes)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.inner.remove(key)
    }
}

// =============================================================================
// SECTION 1: IN-MEMORY STORAGE TESTS
// =============================================================================

mod in_memory_basic {
    use super::*;

    #[test]
    fn new_storage_is_empty() {
        let storage = InMemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.read("anything").unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let mut storage = InMemoryStorage::new();
        storage.write("k", b"v").unwrap();
        assert_eq!(storage.read("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn remove_deletes_entry() {
        let mut storage = InMemoryStorage::new();
        storage.write("k", b"v").unwrap();

        storage.remove("k").unwrap();

        assert_eq!(storage.read("k").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let mut storage = InMemoryStorage::new();
        storage.write("a", b"1").unwrap();
        storage.write("b", b"2").unwrap();

        assert_eq!(storage.len(), 2);
        assert_eq!(storage.raw("a"), Some(&b"1"[..]));
        assert_eq!(storage.raw("b"), Some(&b"2"[..]));
    }
}

// =============================================================================
// SECTION 2: FILE STORAGE TESTS
// =============================================================================

mod file_storage {
    use super::*;

    #[test]
    fn new_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state").join("games");

        let storage = FileStorage::new(&nested).unwrap();

        assert!(nested.is_dir());
        assert_eq!(storage.dir(), nested.as_path());
    }

    #[test]
    fn missing_key_reads_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.read("tic-tac-toe:history").unwrap(), None);
    }

    #[test]
    fn write_creates_entry_file() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path()).unwrap();

        storage.write("tic-tac-toe:steps", b"0").unwrap();

        assert!(dir.path().join("tic-tac-toe%3Asteps.json").exists());
        assert!(!dir.path().join("tic-tac-toe%3Asteps.tmp").exists());
    }

    #[test]
    fn overwrite_replaces_contents() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path()).unwrap();

        storage.write("k", b"a long first value").unwrap();
        storage.write("k", b"short").unwrap();

        assert_eq!(storage.read("k").unwrap(), Some(b"short".to_vec()));
    }

    #[test]
    fn remove_deletes_file() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path()).unwrap();
        storage.write("k", b"v").unwrap();

        storage.remove("k").unwrap();

        assert!(!storage.entry_path("k").exists());
        assert_eq!(storage.read("k").unwrap(), None);
    }

    #[test]
    fn keys_with_distinct_separators_do_not_collide() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path()).unwrap();

        storage.write("a:b", b"colon").unwrap();
        storage.write("a/b", b"slash").unwrap();
        storage.write("a_b", b"underscore").unwrap();

        assert_eq!(storage.read("a:b").unwrap(), Some(b"colon".to_vec()));
        assert_eq!(storage.read("a/b").unwrap(), Some(b"slash".to_vec()));
        assert_eq!(storage.read("a_b").unwrap(), Some(b"underscore".to_vec()));
    }
}

// =============================================================================
// SECTION 3: PERSISTENT VALUE ROUND-TRIP / RESTART TESTS
// =============================================================================

mod round_trip {
    use super::*;

    #[test]
    fn set_then_fresh_value_reads_it_back() {
        let storage = shared(InMemoryStorage::new());

        let mut first =
            PersistentValue::new(storage.clone(), "steps", InitialValue::value(0usize)).unwrap();
        first.set(7).unwrap();

        let second = PersistentValue::new(storage, "steps", InitialValue::value(0usize)).unwrap();
        assert_eq!(*second.get(), 7);
    }

    #[test]
    fn nested_containers_round_trip() {
        let storage = shared(InMemoryStorage::new());
        let mut nested: BTreeMap<String, Vec<Vec<Option<char>>>> = BTreeMap::new();
        nested.insert("boards".into(), vec![vec![None, Some('X')], vec![Some('O')]]);

        let mut value: PersistentValue<BTreeMap<String, Vec<Vec<Option<char>>>>> =
            PersistentValue::new(storage.clone(), "nested", InitialValue::default()).unwrap();
        value.set(nested.clone()).unwrap();

        let reloaded: PersistentValue<BTreeMap<String, Vec<Vec<Option<char>>>>> =
            PersistentValue::new(storage, "nested", InitialValue::default()).unwrap();
        assert_eq!(reloaded.get(), &nested);
    }

    #[test]
    fn greeting_name_survives_restart() {
        let dir = tempdir().unwrap();

        // first "session"
        {
            let storage = shared(FileStorage::new(dir.path()).unwrap());
            let mut name: PersistentValue<String> =
                PersistentValue::new(storage, "name", InitialValue::default()).unwrap();
            assert_eq!(name.get(), "");
            name.set("Ada".to_string()).unwrap();
        }

        // "restart"
        {
            let storage = shared(FileStorage::new(dir.path()).unwrap());
            let name: PersistentValue<String> =
                PersistentValue::new(storage, "name", InitialValue::default()).unwrap();
            assert_eq!(name.get(), "Ada");
        }
    }

    #[test]
    fn writes_even_when_value_is_unchanged() {
        let mem = Rc::new(RefCell::new(InMemoryStorage::new()));
        let mut value =
            PersistentValue::new(mem.clone(), "steps", InitialValue::value(0usize)).unwrap();
        assert!(mem.borrow().is_empty());

        value.set(0).unwrap();

        assert_eq!(mem.borrow().raw("steps"), Some(&b"0"[..]));
    }

    #[test]
    fn two_values_on_one_key_last_write_wins() {
        let storage = shared(InMemoryStorage::new());
        let mut a =
            PersistentValue::new(storage.clone(), "shared", InitialValue::value(0u32)).unwrap();
        let mut b =
            PersistentValue::new(storage.clone(), "shared", InitialValue::value(0u32)).unwrap();

        a.set(1).unwrap();
        b.set(2).unwrap();

        let fresh = PersistentValue::new(storage, "shared", InitialValue::value(0u32)).unwrap();
        assert_eq!(*fresh.get(), 2);
        assert_eq!(*a.get(), 1);
    }
}

// =============================================================================
// SECTION 4: LAZY DEFAULT TESTS
// =============================================================================

mod lazy_default {
    use super::*;

    #[test]
    fn producer_runs_once_on_empty_slot() {
        let calls = Rc::new(Cell::new(0u32));
        let counter = calls.clone();

        let value = PersistentValue::new(
            shared(InMemoryStorage::new()),
            "expensive",
            InitialValue::lazy(move || {
                counter.set(counter.get() + 1);
                String::from("computed")
            }),
        )
        .unwrap();

        for _ in 0..5 {
            assert_eq!(value.get(), "computed");
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn producer_never_runs_when_value_is_stored() {
        let storage = shared(InMemoryStorage::new());
        PersistentValue::new(storage.clone(), "expensive", InitialValue::value(String::new()))
            .unwrap()
            .set("stored".to_string())
            .unwrap();

        let calls = Rc::new(Cell::new(0u32));
        let counter = calls.clone();
        let value = PersistentValue::new(
            storage,
            "expensive",
            InitialValue::lazy(move || {
                counter.set(counter.get() + 1);
                String::from("computed")
            }),
        )
        .unwrap();

        assert_eq!(value.get(), "stored");
        assert_eq!(calls.get(), 0);
    }
}

// =============================================================================
// SECTION 5: FAILURE TESTS
// =============================================================================

mod failures {
    use super::*;

    #[test]
    fn corrupt_entry_fails_initialization() {
        let mut mem = InMemoryStorage::new();
        mem.write("tic-tac-toe:history", b"[[null, \"X\"").unwrap();

        let result: Result<PersistentValue<Vec<Vec<Option<String>>>>, _> =
            PersistentValue::new(shared(mem), "tic-tac-toe:history", InitialValue::default());

        let err = result.unwrap_err();
        assert!(matches!(err, StorageError::Deserialize { .. }));
        assert_eq!(err.key(), "tic-tac-toe:history");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn wrong_shape_fails_initialization() {
        let mut mem = InMemoryStorage::new();
        mem.write("steps", b"\"three\"").unwrap();

        let result = PersistentValue::new(shared(mem), "steps", InitialValue::value(0usize));

        assert!(matches!(result, Err(StorageError::Deserialize { .. })));
    }

    #[test]
    fn failed_write_keeps_new_value_in_memory() {
        let flaky = Rc::new(RefCell::new(FlakyStorage::default()));
        let storage: SharedStorage = flaky.clone();
        let mut value =
            PersistentValue::new(storage, "steps", InitialValue::value(0usize)).unwrap();

        flaky.borrow_mut().fail_writes = true;
        let err = value.set(3).unwrap_err();

        assert!(matches!(err, StorageError::Write { .. }));
        assert!(err.is_recoverable());
        assert_eq!(*value.get(), 3);
        assert_eq!(flaky.borrow().inner.read("steps").unwrap(), None);
    }

    #[test]
    fn write_succeeds_again_after_recovery() {
        let flaky = Rc::new(RefCell::new(FlakyStorage::default()));
        let mut value =
            PersistentValue::new(flaky.clone(), "steps", InitialValue::value(0usize)).unwrap();

        flaky.borrow_mut().fail_writes = true;
        assert!(value.set(1).is_err());

        flaky.borrow_mut().fail_writes = false;
        value.set(2).unwrap();

        assert_eq!(flaky.borrow().inner.raw("steps"), Some(&b"2"[..]));
    }
}
