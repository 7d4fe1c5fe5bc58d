#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(file_size: u32, offset: u32, width: i32, height: i32, bits: u16, colors: u32) -> Vec<u8> {
    let mut h = vec![0u8; 54];
    h[0] = b'B'; h[1] = b'M';
    h[2..6].copy_from_slice(&file_size.to_le_bytes());
    h[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    h[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    h[18..22].copy_from_slice(&width.to_le_bytes());
    h[22..26].copy_from_slice(&height.to_le_bytes());
    h[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    h[28..30].copy_from_slice(&bits.to_le_bytes());
    h[46..50].copy_from_slice(&colors.to_le_bytes());
    h
}

fn main() {
    use std::fs;
    for target in ["fuzz_decode", "fuzz_roundtrip"] {
        let dir = format!("fuzz/corpus/{target}");
        fs::create_dir_all(&dir).unwrap();

        // 24-bit 4x2, bottom-up
        let mut bmp24 = header(54 + 24, 54, 4, 2, 24, 0);
        bmp24.extend((0..24u8).map(|i| i.wrapping_mul(37)));
        fs::write(format!("{dir}/bmp24_4x2.bmp"), &bmp24).unwrap();

        // 24-bit 4x2, top-down
        let mut top_down = bmp24.clone();
        top_down[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        fs::write(format!("{dir}/bmp24_4x2_topdown.bmp"), top_down).unwrap();

        // 8-bit 3x2 with gray palette and padded rows
        let mut bmp8 = header(1078 + 8, 1078, 3, 2, 8, 256);
        for level in 0..=255u8 {
            bmp8.extend_from_slice(&[level, level, level, 0]);
        }
        bmp8.extend_from_slice(&[0x00, 0x40, 0x80, 0x00, 0xc0, 0xff, 0x64, 0x00]);
        fs::write(format!("{dir}/bmp8_3x2.bmp"), bmp8).unwrap();

        // Truncated/malformed seeds for edge coverage
        fs::write(format!("{dir}/empty.bin"), b"").unwrap();
        fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
        fs::write(format!("{dir}/bmp24_cut.bmp"), &bmp24[..60]).unwrap();
        fs::write(format!("{dir}/bmp32.bmp"), header(54, 54, 1, 1, 32, 0)).unwrap();
    }

    println!("Generated seed corpus in fuzz/corpus/");
}
