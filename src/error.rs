use std::path::PathBuf;

/// Errors from BMP loading, saving and filtering.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("cannot open {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a BMP file (signature {0:#06x}, expected 0x4d42)")]
    InvalidFormat(u16),

    #[error("unsupported bit depth {found}, expected {expected}")]
    UnsupportedDepth { found: u16, expected: &'static str },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("short read at offset {offset}: wanted {wanted} bytes, got {got}")]
    ShortRead {
        offset: u64,
        wanted: usize,
        got: usize,
    },

    #[error("short write at offset {offset}: wanted {wanted} bytes, wrote {wrote}")]
    ShortWrite {
        offset: u64,
        wanted: usize,
        wrote: usize,
    },

    #[error("failed to allocate {bytes} bytes of pixel storage")]
    OutOfMemory { bytes: usize },

    #[error("histogram is degenerate (every pixel has the same level), equalization skipped")]
    DivisionGuard,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("kernel size must be odd, got {0}")]
    InvalidKernel(usize),

    #[error("{filter} is not available for {depth}-bit images")]
    UnsupportedFilter { filter: &'static str, depth: u16 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no image loaded")]
    NoImageLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
