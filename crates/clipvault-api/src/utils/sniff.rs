//! Video container detection from leading bytes.

/// Bytes needed to recognise every supported container.
pub const SNIFF_LEN: usize = 64;

const FALLBACK: &str = "application/octet-stream";

/// Best-effort MIME type for a blob starting with `head`.
pub fn sniff_video_content_type(head: &[u8]) -> &'static str {
    if head.len() >= 12 && &head[4..8] == b"ftyp" {
        return if &head[8..12] == b"qt  " {
            "video/quicktime"
        } else {
            "video/mp4"
        };
    }

    if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return if head.windows(4).any(|w| w == b"webm") {
            "video/webm"
        } else {
            "video/x-matroska"
        };
    }

    if head.starts_with(b"OggS") {
        return "video/ogg";
    }

    if head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"AVI " {
        return "video/x-msvideo";
    }

    FALLBACK
}
