//! Byte fixtures with real magic-byte prefixes.

/// Minimal buffer with a PNG signature.
pub fn png_bytes() -> Vec<u8> {
    let mut buf = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    buf.extend_from_slice(&[0x00, 0x00]);
    buf
}

/// Minimal buffer with a JPEG signature.
pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46]
}

/// Minimal buffer with an ISO BMFF `ftyp` box (sniffs as video/mp4).
pub fn mp4_bytes() -> Vec<u8> {
    let mut buf = vec![0x00, 0x00, 0x00, 0x20];
    buf.extend_from_slice(b"ftypisom");
    buf.extend_from_slice(&[0x00; 16]);
    buf
}

/// A payload of the given size that still sniffs as MP4.
pub fn mp4_bytes_of_len(len: usize) -> Vec<u8> {
    let mut buf = mp4_bytes();
    buf.resize(len, 0x00);
    buf
}

/// A payload of the given size that still sniffs as PNG.
pub fn png_bytes_of_len(len: usize) -> Vec<u8> {
    let mut buf = png_bytes();
    buf.resize(len, 0x00);
    buf
}

/// Bytes that match no known signature.
pub fn text_bytes() -> Vec<u8> {
    b"just some plain text, not an image".to_vec()
}
