//! Media type sniffing from magic bytes.
//!
//! Declared Content-Type headers are spoofable; everything downstream of the
//! upload pipeline trusts only the detected type. Detection looks at no more
//! than the first 512 bytes of content.

/// Number of leading bytes that [`detect_content_type`] inspects.
pub const SNIFF_PREFIX_LEN: usize = 512;

/// Detect the media type of a byte buffer from its magic bytes.
///
/// Accepts any prefix of the content; shorter buffers are fine and simply
/// match fewer signatures. Returns `application/octet-stream` when nothing
/// matches.
pub fn detect_content_type(buf: &[u8]) -> &'static str {
    let buf = &buf[..buf.len().min(SNIFF_PREFIX_LEN)];

    if buf.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }
    if buf.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if buf.starts_with(b"GIF87a") || buf.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if buf.len() >= 12 && buf.starts_with(b"RIFF") && &buf[8..12] == b"WEBP" {
        return "image/webp";
    }
    if buf.starts_with(b"BM") {
        return "image/bmp";
    }
    // ISO BMFF: a 4-byte box size followed by "ftyp".
    if buf.len() >= 8 && &buf[4..8] == b"ftyp" {
        return "video/mp4";
    }
    // EBML header (Matroska / WebM).
    if buf.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return "video/webm";
    }

    "application/octet-stream"
}

/// File extension (with leading dot) for a detected media type, used to
/// derive storage keys. Unknown types get ".bin".
pub fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/bmp" => ".bmp",
        "video/mp4" => ".mp4",
        "video/webm" => ".webm",
        _ => ".bin",
    }
}

/// Media type for a stored key, derived from its extension. Inverse of
/// [`extension_for`] for the types the sniffer knows about.
pub fn media_type_for_key(key: &str) -> &'static str {
    let extension = key.rsplit('.').next().unwrap_or("");
    match extension.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let buf = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x01, 0x02];
        assert_eq!(detect_content_type(&buf), "image/png");
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(
            detect_content_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]),
            "image/jpeg"
        );
    }

    #[test]
    fn test_detect_gif() {
        assert_eq!(detect_content_type(b"GIF89a\x01\x00"), "image/gif");
    }

    #[test]
    fn test_detect_webp() {
        let mut buf = b"RIFF".to_vec();
        buf.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        buf.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(detect_content_type(&buf), "image/webp");
    }

    #[test]
    fn test_detect_mp4() {
        let mut buf = vec![0x00, 0x00, 0x00, 0x20];
        buf.extend_from_slice(b"ftypisom");
        assert_eq!(detect_content_type(&buf), "video/mp4");
    }

    #[test]
    fn test_detect_webm() {
        assert_eq!(
            detect_content_type(&[0x1A, 0x45, 0xDF, 0xA3, 0x01]),
            "video/webm"
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_content_type(b"hello world"), "application/octet-stream");
    }

    #[test]
    fn test_detect_short_buffer() {
        // Shorter than any signature: must not panic, must fall through.
        assert_eq!(detect_content_type(&[0x89]), "application/octet-stream");
        assert_eq!(detect_content_type(&[]), "application/octet-stream");
    }

    #[test]
    fn test_detect_is_deterministic() {
        let buf = [0xFF, 0xD8, 0xFF, 0xDB];
        assert_eq!(detect_content_type(&buf), detect_content_type(&buf));
    }

    #[test]
    fn test_sniffed_type_wins_over_declared() {
        // JPEG magic bytes in a buffer a client might declare as image/png.
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x00];
        assert_eq!(detect_content_type(&jpeg), "image/jpeg");
    }

    #[test]
    fn test_extension_round_trip() {
        for media_type in ["image/png", "image/jpeg", "image/gif", "video/mp4"] {
            let key = format!("asset{}", extension_for(media_type));
            assert_eq!(media_type_for_key(&key), media_type);
        }
    }
}
