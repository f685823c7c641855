// crates/atlas-core/src/input.rs
// ============================================================================
// Module: Input Files
// Description: Bounded, UTF-8 checked reading of definition files.
// Purpose: Keep file I/O at the parser boundary and out of the core.
// Dependencies: std::fs, crate::error
// ============================================================================

//! Definition files are treated as untrusted input: reads are capped at
//! [`MAX_INPUT_BYTES`] and must decode as UTF-8.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::AtlasError;

/// Maximum definition file size accepted by the parsers.
pub const MAX_INPUT_BYTES: u64 = 4 * 1024 * 1024;

/// Reads `path` with the size cap and UTF-8 check.
///
/// # Errors
/// Returns [`AtlasError::Io`] when the file cannot be opened or read, is
/// larger than [`MAX_INPUT_BYTES`], or is not valid UTF-8.
pub(crate) fn read_definition_file(path: &Path) -> Result<String, AtlasError> {
    let display = path.display();
    let file = fs::File::open(path)
        .map_err(|err| AtlasError::io(format!("cannot open {display}: {err}")))?;
    let metadata = file
        .metadata()
        .map_err(|err| AtlasError::io(format!("cannot stat {display}: {err}")))?;
    if metadata.len() > MAX_INPUT_BYTES {
        return Err(AtlasError::io(format!("{display} exceeds {MAX_INPUT_BYTES} bytes")));
    }
    let mut bytes = Vec::new();
    let mut limited = file.take(MAX_INPUT_BYTES + 1);
    limited
        .read_to_end(&mut bytes)
        .map_err(|err| AtlasError::io(format!("cannot read {display}: {err}")))?;
    let size = u64::try_from(bytes.len())
        .map_err(|_| AtlasError::io(format!("{display} size exceeds addressable memory")))?;
    if size > MAX_INPUT_BYTES {
        return Err(AtlasError::io(format!("{display} exceeds {MAX_INPUT_BYTES} bytes")));
    }
    String::from_utf8(bytes).map_err(|_| AtlasError::io(format!("{display} is not valid UTF-8")))
}
