//! Positioned reads and writes over seekable handles.
//!
//! Both primitives report how many bytes were actually transferred instead of
//! failing on a short transfer. The codec decides whether a short count is an
//! error (`ShortRead` / `ShortWrite`) or, in permissive mode, a recoverable gap.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::BmpError;

/// Seek to `position` and fill as much of `buf` as the handle provides.
///
/// Returns the number of bytes read. Hitting end of input is not an error.
pub fn read_at<R: Read + Seek + ?Sized>(
    handle: &mut R,
    position: u64,
    buf: &mut [u8],
) -> Result<usize, BmpError> {
    handle.seek(SeekFrom::Start(position))?;
    let mut filled = 0;
    while filled < buf.len() {
        match handle.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Seek to `position` and write as much of `bytes` as the handle accepts.
///
/// Returns the number of bytes written.
pub fn write_at<W: Write + Seek + ?Sized>(
    handle: &mut W,
    position: u64,
    bytes: &[u8],
) -> Result<usize, BmpError> {
    handle.seek(SeekFrom::Start(position))?;
    let mut written = 0;
    while written < bytes.len() {
        match handle.write(&bytes[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(written)
}

/// [`read_at`] that fails with `ShortRead` unless `buf` was filled.
pub(crate) fn read_exact_at<R: Read + Seek + ?Sized>(
    handle: &mut R,
    position: u64,
    buf: &mut [u8],
) -> Result<(), BmpError> {
    let got = read_at(handle, position, buf)?;
    if got != buf.len() {
        return Err(BmpError::ShortRead {
            offset: position,
            wanted: buf.len(),
            got,
        });
    }
    Ok(())
}

/// [`write_at`] that fails with `ShortWrite` unless every byte was written.
pub(crate) fn write_all_at<W: Write + Seek + ?Sized>(
    handle: &mut W,
    position: u64,
    bytes: &[u8],
) -> Result<(), BmpError> {
    let wrote = write_at(handle, position, bytes)?;
    if wrote != bytes.len() {
        return Err(BmpError::ShortWrite {
            offset: position,
            wanted: bytes.len(),
            wrote,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_at_position() {
        let mut cursor = Cursor::new(vec![0u8, 1, 2, 3, 4, 5]);
        let mut buf = [0u8; 3];
        assert_eq!(read_at(&mut cursor, 2, &mut buf).unwrap(), 3);
        assert_eq!(buf, [2, 3, 4]);
    }

    #[test]
    fn read_past_end_is_short_not_error() {
        let mut cursor = Cursor::new(vec![7u8; 4]);
        let mut buf = [0u8; 8];
        assert_eq!(read_at(&mut cursor, 2, &mut buf).unwrap(), 2);
        assert_eq!(read_at(&mut cursor, 10, &mut buf).unwrap(), 0);
    }

    #[test]
    fn read_exact_reports_short_read() {
        let mut cursor = Cursor::new(vec![7u8; 4]);
        let mut buf = [0u8; 8];
        match read_exact_at(&mut cursor, 1, &mut buf) {
            Err(BmpError::ShortRead { offset, wanted, got }) => {
                assert_eq!((offset, wanted, got), (1, 8, 3));
            }
            other => panic!("expected ShortRead, got {other:?}"),
        }
    }

    #[test]
    fn write_at_extends_with_gap() {
        let mut cursor = Cursor::new(Vec::new());
        assert_eq!(write_at(&mut cursor, 3, &[9, 9]).unwrap(), 2);
        assert_eq!(cursor.into_inner(), vec![0, 0, 0, 9, 9]);
    }

    #[test]
    fn write_into_fixed_buffer_is_short() {
        let mut backing = [0u8; 4];
        let mut cursor = Cursor::new(&mut backing[..]);
        let err = write_all_at(&mut cursor, 2, &[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            BmpError::ShortWrite {
                offset: 2,
                wanted: 3,
                wrote: 2
            }
        ));
    }
}
