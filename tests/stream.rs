use zenimage::{MemoryStream, Stream, Whence};

#[test]
fn write_then_read_roundtrip() {
    let mut s = MemoryStream::new();
    assert_eq!(s.write(b"hello"), 5);
    assert_eq!(s.len(), 5);
    s.seek(0, Whence::Begin);
    let mut buf = [0u8; 5];
    assert_eq!(s.read(&mut buf), 5);
    assert_eq!(&buf, b"hello");
}

#[test]
fn read_past_end_sets_eof() {
    let mut s = MemoryStream::from_vec(alloc_vec(b"abc"));
    let mut buf = [0u8; 8];
    let n = s.read(&mut buf);
    assert_eq!(n, 3);
    assert!(s.eof());
    assert!(!s.bad());
    assert!(!s.good());
}

#[test]
fn seek_out_of_range_sets_bad() {
    let mut s = MemoryStream::from_vec(alloc_vec(b"abc"));
    let pos = s.seek(100, Whence::Begin);
    assert!(s.bad());
    assert_eq!(pos, 0);
    s.clear_err();
    assert!(s.good());
}

#[test]
fn seek_from_end() {
    let mut s = MemoryStream::from_vec(alloc_vec(b"abcdef"));
    let pos = s.seek(-2, Whence::End);
    assert_eq!(pos, 4);
    let mut buf = [0u8; 2];
    s.read(&mut buf);
    assert_eq!(&buf, b"ef");
}

#[test]
fn resize_keeps_capacity_when_shrinking() {
    let mut s = MemoryStream::new();
    s.write(&[1u8; 100]);
    s.resize(10);
    assert_eq!(s.len(), 10);
    assert_eq!(s.as_slice(), &[1u8; 10]);
}

#[test]
fn capacity_grows_as_power_of_two() {
    let mut s = MemoryStream::with_capacity(0);
    s.write(&[0u8; 5]);
    assert!(s.as_slice().len() == 5);
}

fn alloc_vec(bytes: &[u8]) -> Vec<u8> {
    bytes.to_vec()
}
