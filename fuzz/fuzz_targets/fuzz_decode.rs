#![no_main]
use std::io::Cursor;

use bmpfx::{Filter, Limits, LoadRequest, Permissiveness};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 20),
        ..Limits::default()
    };

    // Every mode must reject bad input without panicking
    for mode in [
        Permissiveness::Strict,
        Permissiveness::Standard,
        Permissiveness::Permissive,
    ] {
        let request = LoadRequest::new()
            .with_limits(limits.clone())
            .with_permissiveness(mode);
        let _ = request.read_bmp8(&mut Cursor::new(data));
        let _ = request.read_bmp24(&mut Cursor::new(data));

        // Whatever decodes must survive every filter too
        let Ok(mut bitmap) = request.read(&mut Cursor::new(data)) else {
            continue;
        };
        for filter in Filter::menu(bitmap.depth()) {
            let _ = bitmap.apply(*filter);
        }
    }
});
