#![no_main]
use std::io::Cursor;

use bmpfx::{Limits, LoadRequest, Permissiveness};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must give the same image
    let request = LoadRequest::new()
        .with_limits(Limits {
            max_pixels: Some(1 << 20),
            ..Limits::default()
        })
        .with_permissiveness(Permissiveness::Permissive);
    let Ok(decoded) = request.read(&mut Cursor::new(data)) else {
        return;
    };

    let mut encoded = Cursor::new(Vec::new());
    decoded
        .write_to(&mut encoded)
        .expect("encoding into memory failed");
    encoded.set_position(0);

    let Ok(decoded2) = request.read(&mut encoded) else {
        panic!("re-encoded data failed to decode");
    };
    assert_eq!(decoded, decoded2, "roundtrip mismatch");
});
