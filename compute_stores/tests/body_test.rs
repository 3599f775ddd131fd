use compute_abi::{HostRuntime, HostStatus};
use compute_abi_mocked::{MockHost, WANT_ERROR};
use compute_stores::Body;

#[test]
fn write_then_read_back() {
    use std::io::Write;

    let host = MockHost::new();
    host.add_kv_store("store");
    let store = host.kv_open("store").unwrap();

    let mut body = Body::new(host.clone()).expect("Should create body");
    body.write_all(b"one\ntwo\nthree\n").unwrap();
    let handle = body.handle().expect("Body should be open");
    host.kv_insert(store, "k", handle).unwrap();

    assert_eq!(host.get_kv_entry("store", "k"), Some(b"one\ntwo\nthree\n".to_vec()));
}

#[test]
fn embedded_io_read() {
    use embedded_io::Read;

    let host = MockHost::new();
    host.add_kv_entry("store", "k", "first\nsecond");
    let store = host.kv_open("store").unwrap();
    let mut body = Body::from_handle(host.clone(), host.kv_lookup(store, "k").unwrap());

    let mut buf = [0u8; 16];
    let n = body.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"first\n");
    let n = body.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"second");
    assert_eq!(body.read(&mut buf).unwrap(), 0);
}

#[test]
fn embedded_io_read_error_kind() {
    use embedded_io::Read;

    let host = MockHost::new();
    host.add_kv_entry("store", "k", vec![WANT_ERROR as u8]);
    let store = host.kv_open("store").unwrap();
    let mut body = Body::from_handle(host.clone(), host.kv_lookup(store, "k").unwrap());

    let mut buf = [0u8; 4];
    let kind = body.read(&mut buf).unwrap_err();
    assert_eq!(kind, embedded_io::ErrorKind::Other);
}

#[test]
fn write_error() {
    use std::io::Write;

    let host = MockHost::new();
    let mut body = Body::new(host).unwrap();

    let err = body.write(&[WANT_ERROR as u8]).expect_err("Should fail to write");
    let inner = err
        .get_ref()
        .and_then(|e| e.downcast_ref::<compute_abi::HostError>())
        .expect("Host error inside");
    assert_eq!(inner.status(), Some(HostStatus::Error));
}

#[test]
fn close_is_idempotent() {
    let host = MockHost::new();
    let mut body = Body::new(host.clone()).unwrap();
    assert_eq!(host.open_bodies(), 1);

    body.close().unwrap();
    body.close().unwrap();
    assert_eq!(body.handle(), None);
    assert_eq!(host.open_bodies(), 0);
    assert_eq!(body.read_chunk(&mut [0u8; 4]).unwrap(), 0);
}

#[test]
fn close_can_raise_error() {
    let host = MockHost::new();
    let mut body = Body::new(host.clone()).unwrap();

    host.fail_next(HostStatus::Badf);
    let err = body.close().expect_err("Should fail to close");
    assert_eq!(err.status(), Some(HostStatus::Badf));
    assert!(body.handle().is_some());
}

#[test]
fn fill_from_counts_bytes() {
    let host = MockHost::new();
    let mut body = Body::new(host).unwrap();

    let total = body.fill_from("a\nb\nc".as_bytes()).unwrap();
    assert_eq!(total, 5);
    assert_eq!(body.read_all().unwrap(), b"a\nb\nc");
}
