#[macro_use]
extern crate hamcrest;
use compute_abi::{HostError, HostStatus};
use compute_abi_mocked::{MockHost, WANT_ERROR};
use compute_stores::kvstore::{KvStoreError, Store};
use hamcrest::prelude::*;
use std::io::Read;

fn open_store(host: &MockHost) -> Store<MockHost> {
    host.add_kv_entry("example-test-kv-store", "hello", "world");
    Store::open_with(host.clone(), "example-test-kv-store").expect("Should open store")
}

#[test]
fn lookup_and_insert() {
    let host = MockHost::new();
    let store = open_store(&host);

    let mut hello = store.lookup("hello").expect("Should find hello");
    assert_eq!(hello.text().unwrap(), "world");

    store
        .insert("animal", "cat".as_bytes())
        .expect("Should insert");
    let mut animal = store.lookup("animal").expect("Should find animal");
    assert_eq!(animal.text().unwrap(), "cat");
}

#[test]
fn insert_overwrites() {
    let host = MockHost::new();
    let store = open_store(&host);

    store.insert("hello", &b"there"[..]).unwrap();
    assert_eq!(host.get_kv_entry("example-test-kv-store", "hello"), Some(b"there".to_vec()));
}

#[test]
fn insert_streams_large_values() {
    let host = MockHost::new();
    let store = open_store(&host);
    let value: Vec<u8> = (0..20_000u32).map(|i| b'a' + (i % 26) as u8).collect();

    store.insert("big", value.as_slice()).unwrap();

    let bytes = store.lookup("big").unwrap().into_bytes().unwrap();
    assert_eq!(bytes, value);
    assert_that!(host.open_bodies(), is(equal_to(0)));
}

#[test]
fn open_missing_store() {
    let host = MockHost::new();
    let err = Store::open_with(host, "no-such-store").unwrap_err();
    assert!(matches!(err, KvStoreError::StoreNotFound), "{err:?}");
}

#[test]
fn open_unexpected_status() {
    let host = MockHost::new();
    host.add_kv_store("store");
    host.fail_next(HostStatus::LimitExceeded);

    let err = Store::open_with(host, "store").unwrap_err();
    assert!(matches!(err, KvStoreError::Unexpected(HostStatus::LimitExceeded)));
}

#[test]
fn lookup_missing_key() {
    let host = MockHost::new();
    let store = open_store(&host);

    let err = store.lookup("never-inserted").unwrap_err();
    assert!(matches!(err, KvStoreError::KeyNotFound), "{err:?}");
}

#[test]
fn lookup_invalid_key() {
    let host = MockHost::new();
    let store = open_store(&host);

    for key in ["", "..", "line\nbreak"] {
        let err = store.lookup(key).unwrap_err();
        assert!(matches!(err, KvStoreError::InvalidKey), "{key:?}: {err:?}");
    }
}

#[test]
fn delete_then_lookup() {
    let host = MockHost::new();
    let store = open_store(&host);

    store.delete("hello").expect("Should delete");
    let err = store.lookup("hello").unwrap_err();
    assert!(matches!(err, KvStoreError::KeyNotFound));

    let err = store.delete("hello").unwrap_err();
    assert!(matches!(err, KvStoreError::KeyNotFound));
}

#[test]
fn insert_and_delete_invalid_key() {
    let host = MockHost::new();
    let store = open_store(&host);

    let err = store.insert(".", &b"x"[..]).unwrap_err();
    assert!(matches!(err, KvStoreError::InvalidKey));
    assert_that!(host.open_bodies(), is(equal_to(0)));
    let err = store.delete(".well-known/acme-challenge/token").unwrap_err();
    assert!(matches!(err, KvStoreError::InvalidKey));
}

#[test]
fn insert_into_removed_store() {
    let host = MockHost::new();
    let store = open_store(&host);
    host.remove_kv_store("example-test-kv-store");

    let err = store.insert("animal", &b"cat"[..]).unwrap_err();
    assert!(matches!(err, KvStoreError::Unexpected(HostStatus::Badf)), "{err:?}");
    assert_that!(err.to_string().as_str(), matches_regex("unexpected error.*BADF \\(3\\)"));
    assert_that!(host.open_bodies(), is(equal_to(0)));
}

#[test]
fn insert_call_transport_error() {
    let host = MockHost::new();
    let store = open_store(&host);
    // body_new and one body_write succeed, kv_insert fails
    host.fail_after(2, std::io::Error::new(std::io::ErrorKind::TimedOut, "host timed out"));

    let err = store.insert("animal", &b"cat"[..]).unwrap_err();
    match err {
        KvStoreError::Transport(HostError::Io(io_err)) => {
            assert_eq!(io_err.kind(), std::io::ErrorKind::TimedOut);
        }
        other => panic!("Expected transport error, got {other:?}"),
    }
    assert_eq!(host.get_kv_entry("example-test-kv-store", "animal"), None);
    assert_that!(host.open_bodies(), is(equal_to(0)));
}

#[test]
fn insert_call_unexpected_status() {
    let host = MockHost::new();
    let store = open_store(&host);
    host.fail_after(2, HostStatus::LimitExceeded);

    let err = store.insert("animal", &b"cat"[..]).unwrap_err();
    assert!(matches!(err, KvStoreError::Unexpected(HostStatus::LimitExceeded)));
    assert!(err.to_string().contains("13"));
}

#[test]
fn other_with_known_code_is_classified_by_name() {
    let host = MockHost::new();
    let store = open_store(&host);
    host.fail_next(HostStatus::Other(10));

    let err = store.lookup("hello").unwrap_err();
    assert!(matches!(err, KvStoreError::KeyNotFound), "{err:?}");
}

#[test]
fn unknown_status_keeps_the_code() {
    let host = MockHost::new();
    let store = open_store(&host);
    host.fail_next(HostStatus::Other(4242));

    let err = store.lookup("hello").unwrap_err();
    assert!(matches!(err, KvStoreError::Unexpected(HostStatus::Other(4242))));
    assert_that!(err.to_string().as_str(), matches_regex("unexpected error.*4242"));
}

#[test]
fn transport_error_passes_through() {
    let host = MockHost::new();
    let store = open_store(&host);
    host.fail_next(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "link lost"));

    let err = store.delete("hello").unwrap_err();
    assert_eq!(err.to_string(), "link lost");
    match err {
        KvStoreError::Transport(HostError::Io(io_err)) => {
            assert_eq!(io_err.kind(), std::io::ErrorKind::BrokenPipe);
        }
        other => panic!("Expected transport error, got {other:?}"),
    }
}

#[test]
fn failing_source_is_a_transport_error() {
    struct FailingReader;
    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("source failed"))
        }
    }

    let host = MockHost::new();
    let store = open_store(&host);

    let err = store.insert("animal", FailingReader).unwrap_err();
    assert_eq!(err.to_string(), "source failed");
    assert!(matches!(err, KvStoreError::Transport(HostError::Io(_))));
    assert_eq!(host.get_kv_entry("example-test-kv-store", "animal"), None);
    assert_that!(host.open_bodies(), is(equal_to(0)));
}

#[test]
fn text_is_cached() {
    let host = MockHost::new();
    let store = open_store(&host);

    let mut entry = store.lookup("hello").unwrap();
    let first = entry.text().unwrap().to_string();
    let calls = host.host_calls();
    let second = entry.text().unwrap().to_string();

    assert_eq!(first, second);
    assert_that!(host.host_calls(), is(equal_to(calls)));
}

#[test]
fn stream_in_chunks() {
    let host = MockHost::new();
    host.add_kv_entry("lines", "poem", "first\nsecond\nthird");
    let store = Store::open_with(host.clone(), "lines").unwrap();

    let mut reader = store.lookup("poem").unwrap().into_reader().unwrap();
    let mut buf = [0u8; 32];
    let n = reader.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"first\n");

    let mut rest = String::new();
    reader.read_to_string(&mut rest).unwrap();
    assert_eq!(rest, "second\nthird");

    drop(reader);
    assert_that!(host.open_bodies(), is(equal_to(0)));
}

#[test]
fn reader_after_text_yields_cached_value() {
    let host = MockHost::new();
    let store = open_store(&host);

    let mut entry = store.lookup("hello").unwrap();
    entry.text().unwrap();

    let mut out = String::new();
    entry.into_reader().unwrap().read_to_string(&mut out).unwrap();
    assert_eq!(out, "world");
}

#[test]
fn failed_drain_is_an_error() {
    let host = MockHost::new();
    host.add_kv_entry("store", "broken", format!("partial{WANT_ERROR}rest"));
    let store = Store::open_with(host.clone(), "store").unwrap();

    let mut entry = store.lookup("broken").unwrap();
    let err = entry.text().unwrap_err();
    assert!(matches!(err, KvStoreError::Unexpected(HostStatus::Error)), "{err:?}");

    let err = entry.text().unwrap_err();
    assert!(matches!(err, KvStoreError::EntryPoisoned));
    assert!(matches!(entry.into_reader(), Err(KvStoreError::EntryPoisoned)));
    assert_that!(host.open_bodies(), is(equal_to(0)));
}

#[test]
fn stream_read_error() {
    let host = MockHost::new();
    host.add_kv_entry("store", "broken", vec![WANT_ERROR as u8]);
    let store = Store::open_with(host, "store").unwrap();

    let mut reader = store.lookup("broken").unwrap().into_reader().unwrap();
    let mut buf = [0u8; 8];
    reader.read(&mut buf).expect_err("Should fail to read");
}

#[test]
fn binary_value_is_not_text() {
    let host = MockHost::new();
    host.add_kv_entry("store", "blob", vec![0xff, 0xfe]);
    let store = Store::open_with(host, "store").unwrap();

    let mut entry = store.lookup("blob").unwrap();
    let err = entry.text().unwrap_err();
    assert!(matches!(err, KvStoreError::InvalidUtf8(_)));
    let err = entry.text().unwrap_err();
    assert!(matches!(err, KvStoreError::InvalidUtf8(_)));
    assert_eq!(entry.into_bytes().unwrap(), vec![0xff, 0xfe]);

    let mut entry = store.lookup("blob").unwrap();
    entry.text().unwrap_err();
    let mut bytes = Vec::new();
    entry.into_reader().unwrap().read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, vec![0xff, 0xfe]);
}

#[test]
fn dropped_entry_closes_its_body() {
    let host = MockHost::new();
    let store = open_store(&host);

    let entry = store.lookup("hello").unwrap();
    assert_that!(host.open_bodies(), is(equal_to(1)));
    drop(entry);
    assert_that!(host.open_bodies(), is(equal_to(0)));
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn native_open_is_a_transport_error() {
    let err = Store::open("anything").unwrap_err();
    assert!(matches!(
        err,
        KvStoreError::Transport(HostError::Unavailable { .. })
    ));
}
