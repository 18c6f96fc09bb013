use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::de::DeserializeOwned;

// Upper bound on an argument file read with `--from-file`.
pub const DEFAULT_MAX_ARGS_FILE_BYTES: usize = 1024 * 1024; // 1 MiB

pub fn max_args_file_bytes() -> usize {
    if let Ok(kb_str) = std::env::var("CIVIC_MAX_ARGS_FILE_KB") {
        if let Ok(kb) = kb_str.parse::<usize>() {
            return kb.saturating_mul(1024);
        }
    }
    DEFAULT_MAX_ARGS_FILE_BYTES
}

pub fn read_all_with_limit<R: Read>(mut reader: R, max_size: usize) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(std::cmp::min(max_size, 64 * 1024));
    let mut chunk = [0u8; 8192];
    let mut total = 0usize;
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        total += n;
        if total > max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "argument file size limit exceeded",
            ));
        }
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(out)
}

/// Read JSON instruction arguments (for example a `CreateVotingEvent`) from disk.
pub fn read_json_args<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path)?;
    let bytes = read_all_with_limit(file, max_args_file_bytes())?;
    Ok(serde_json::from_slice(&bytes)?)
}
