//! Test fixtures: small byte buffers that look like video containers.

/// An MP4-like buffer: an `ftyp` box followed by patterned payload bytes.
pub fn create_test_mp4(len: usize) -> Vec<u8> {
    let mut data = vec![
        0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm', 0x00, 0x00, 0x02,
        0x00, b'i', b's', b'o', b'm', b'm', b'p', b'4', b'1',
    ];
    let mut i = 0u8;
    while data.len() < len {
        data.push(i);
        i = i.wrapping_add(1);
    }
    data.truncate(len.max(24));
    data
}

/// A WebM-like buffer starting with the EBML magic.
pub fn create_test_webm() -> Vec<u8> {
    let mut data = vec![0x1A, 0x45, 0xDF, 0xA3];
    data.extend_from_slice(b"\x42\x82\x84webm");
    data.extend(std::iter::repeat(0u8).take(256));
    data
}
