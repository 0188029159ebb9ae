//! Post-download integrity digests.
//!
//! Digests are computed from the staged file after every chunk is written,
//! never inline with the transfer. Sources advertise MD5 hex digests in
//! their `ETag` headers, so MD5 is the one algorithm here.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// MD5 of a file's contents as lowercase hex. Reads in chunks so large files
/// never need to fit in memory.
pub fn md5_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
