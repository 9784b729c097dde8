//! Integration tests for the key-value stores
//!
//! Tests on-disk persistence and the in-memory store

use chaosboard::storage::{EMAIL_KEY, FileStore, KeyValueStore, MemoryStore, USERNAME_KEY};

mod file_store_tests {
    use super::*;

    #[test]
    fn test_storage_set_and_get() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());

        store
            .set(USERNAME_KEY, "yuki")
            .expect("Failed to set storage");

        assert_eq!(store.get(USERNAME_KEY), Some("yuki".to_string()));
    }

    #[test]
    fn test_storage_get_nonexistent() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().join("never-created"));

        assert_eq!(store.get(EMAIL_KEY), None);
    }

    #[test]
    fn test_storage_creates_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path().join("nested").join("storage");
        let store = FileStore::new(&root);

        store.set(EMAIL_KEY, "yuki@example.com").expect("Failed to set");

        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_storage_keeps_whitespace() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());

        store.set(USERNAME_KEY, "  yuki \n").expect("Failed to set");

        assert_eq!(store.get(USERNAME_KEY), Some("  yuki \n".to_string()));
    }

    #[test]
    fn test_storage_survives_reopen() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        FileStore::new(dir.path())
            .set(EMAIL_KEY, "a@b.co")
            .expect("Failed to set");

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get(EMAIL_KEY), Some("a@b.co".to_string()));
    }

    #[test]
    fn test_storage_special_characters_in_key() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());
        let key = "user:preferences:theme"; // Contains colons

        store.set(key, "dark").expect("Failed to set");

        assert_eq!(store.get(key), Some("dark".to_string()));
    }

    #[test]
    fn test_storage_set_fails_on_unwritable_root() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "occupied").expect("Failed to write");
        let store = FileStore::new(&file);

        assert!(store.set(USERNAME_KEY, "yuki").is_err());
    }
}

mod memory_store_tests {
    use super::*;

    #[test]
    fn test_storage_isolation() {
        let first = MemoryStore::new();
        let second = MemoryStore::new();

        first.set(USERNAME_KEY, "first").expect("Failed to set");
        second.set(USERNAME_KEY, "second").expect("Failed to set");

        assert_eq!(first.get(USERNAME_KEY), Some("first".to_string()));
        assert_eq!(second.get(USERNAME_KEY), Some("second".to_string()));
    }

    #[test]
    fn test_storage_seeded_entries() {
        let store = MemoryStore::with_entries([(EMAIL_KEY, "yuki@example.com")]);

        assert_eq!(store.get(EMAIL_KEY), Some("yuki@example.com".to_string()));
        assert_eq!(store.get(USERNAME_KEY), None);
    }
}
