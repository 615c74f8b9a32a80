//! Turns a file's content into a 64-bit fingerprint via sampled or full mode.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use super::{Primitive, hash_once, zero_fingerprint};

/// Selects how [`fingerprint_file`] reads file content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingMode {
    /// Up to three `block_size` windows (start, middle, end); O(1) I/O regardless of size.
    Sampled,
    /// Every byte of the file, in `block_size` chunks.
    Full,
}

/// Sentinel returned when a file could not be opened at all. Never a legitimate fingerprint
/// (the empty-file fingerprint is [`super::zero_fingerprint`], a distinct, generally nonzero
/// constant). Callers must treat this as "skip, do not index".
pub const OPEN_FAILED: u64 = 0;

/// Fingerprint the file at `path` (`size` bytes, already `stat`-ed by the caller) per `mode`.
///
/// Returns [`OPEN_FAILED`] if the file cannot be opened; a fatal mid-stream read error is
/// propagated as `Err` (per the spec: an already-opened file that fails to read cannot be
/// meaningfully fingerprinted, and continuing risks silent misclassification).
pub fn fingerprint_file(path: &Path, size: u64, block_size: u64, mode: SamplingMode) -> std::io::Result<u64> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return Ok(OPEN_FAILED),
    };
    if size == 0 {
        return Ok(zero_fingerprint());
    }
    match mode {
        SamplingMode::Full => fingerprint_full(&mut file, block_size),
        SamplingMode::Sampled => fingerprint_sampled(&mut file, size, block_size),
    }
}

fn fingerprint_full(file: &mut File, block_size: u64) -> std::io::Result<u64> {
    let mut p = Primitive::new(super::DEFAULT_SEED);
    let mut buf = vec![0u8; block_size.max(1) as usize];
    let mut any = false;
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        any = true;
        p.write(&buf[..n]);
    }
    Ok(if any { p.sum() } else { zero_fingerprint() })
}

/// Read up to `len` bytes at `offset`. Returns `None` on a short read (fewer than `len`
/// bytes available) when `len` was expected to be fully satisfiable — the caller discards
/// such a window but keeps traversing the remaining windows.
fn read_window(file: &mut File, offset: u64, len: usize) -> std::io::Result<Option<Vec<u8>>> {
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    if filled < len {
        Ok(None)
    } else {
        Ok(Some(buf))
    }
}

fn fingerprint_sampled(file: &mut File, size: u64, block_size: u64) -> std::io::Result<u64> {
    let block_size = block_size.max(1);

    if size <= block_size {
        file.seek(SeekFrom::Start(0))?;
        let mut buf = vec![0u8; block_size as usize];
        let mut filled = 0usize;
        loop {
            let n = file.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        return Ok(hash_once(&buf[..filled], super::DEFAULT_SEED));
    }

    // Fraction list is fixed: start, middle, end. `eo` tracks the end offset of the last
    // window actually read so a later window that would re-cover already-sampled bytes is
    // skipped instead of read twice.
    let mut buffer = Vec::with_capacity(block_size as usize * 3);
    let mut eo: u64 = 0;

    // start (f = 0.0): always read.
    if let Some(w) = read_window(file, 0, block_size as usize)? {
        eo = block_size;
        buffer.extend_from_slice(&w);
    }

    // middle (f = 0.5).
    let middle_offset = (size as f64 * 0.5) as u64;
    if eo < middle_offset
        && let Some(w) = read_window(file, middle_offset, block_size as usize)?
    {
        eo = middle_offset + block_size;
        buffer.extend_from_slice(&w);
    }

    // end (f = 1.0): EOF-relative offset. Skipped whenever it would overlap (this is always
    // the case when size < 2 * block_size, since then size - block_size < block_size == eo
    // from the start window).
    let end_offset = size - block_size;
    if eo < end_offset
        && let Some(w) = read_window(file, end_offset, block_size as usize)?
    {
        buffer.extend_from_slice(&w);
    }

    Ok(hash_once(&buffer, super::DEFAULT_SEED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(bytes: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn empty_file_is_zero_fingerprint() {
        let f = write_file(b"");
        let h = fingerprint_file(f.path(), 0, 8192, SamplingMode::Sampled).unwrap();
        assert_eq!(h, zero_fingerprint());
        let h2 = fingerprint_file(f.path(), 0, 8192, SamplingMode::Full).unwrap();
        assert_eq!(h2, zero_fingerprint());
    }

    #[test]
    fn missing_file_is_open_failed() {
        let h = fingerprint_file(Path::new("/does/not/exist"), 10, 8192, SamplingMode::Sampled).unwrap();
        assert_eq!(h, OPEN_FAILED);
    }

    #[test]
    fn identical_content_same_fingerprint_full_mode() {
        let a = write_file(b"the quick brown fox");
        let b = write_file(b"the quick brown fox");
        let ha = fingerprint_file(a.path(), 20, 8, SamplingMode::Full).unwrap();
        let hb = fingerprint_file(b.path(), 20, 8, SamplingMode::Full).unwrap();
        assert_eq!(ha, hb);
    }

    #[test]
    fn differing_content_differs_full_mode() {
        let a = write_file(b"the quick brown fox");
        let b = write_file(b"the slow brown fox!!");
        let ha = fingerprint_file(a.path(), 20, 8, SamplingMode::Full).unwrap();
        let hb = fingerprint_file(b.path(), 21, 8, SamplingMode::Full).unwrap();
        assert_ne!(ha, hb);
    }

    #[test]
    fn sampled_mode_blind_to_middle_edits_on_large_files() {
        let block = 64usize;
        let size = block * 10;
        let mut base = vec![0xABu8; size];
        for (i, b) in base.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        let mut edited = base.clone();
        // Flip a byte strictly between the sampled windows (well past start+block,
        // well before size - block).
        edited[size / 2 + block * 2] ^= 0xFF;

        let fa = write_file(&base);
        let fb = write_file(&edited);
        let ha = fingerprint_file(fa.path(), size as u64, block as u64, SamplingMode::Sampled).unwrap();
        let hb = fingerprint_file(fb.path(), size as u64, block as u64, SamplingMode::Sampled).unwrap();
        assert_eq!(ha, hb, "edit strictly between sampled windows must not change the fingerprint");

        let ga = fingerprint_file(fa.path(), size as u64, block as u64, SamplingMode::Full).unwrap();
        let gb = fingerprint_file(fb.path(), size as u64, block as u64, SamplingMode::Full).unwrap();
        assert_ne!(ga, gb, "full mode must see the same edit");
    }

    #[test]
    fn sampled_mode_sensitive_to_start_window_edit() {
        let block = 64usize;
        let size = block * 10;
        let base = vec![0x11u8; size];
        let mut edited = base.clone();
        edited[0] ^= 0xFF;
        let fa = write_file(&base);
        let fb = write_file(&edited);
        let ha = fingerprint_file(fa.path(), size as u64, block as u64, SamplingMode::Sampled).unwrap();
        let hb = fingerprint_file(fb.path(), size as u64, block as u64, SamplingMode::Sampled).unwrap();
        assert_ne!(ha, hb);
    }

    #[test]
    fn small_file_single_window_short_read_tolerant() {
        let f = write_file(b"short");
        let h = fingerprint_file(f.path(), 5, 8192, SamplingMode::Sampled).unwrap();
        let h2 = fingerprint_file(f.path(), 5, 8192, SamplingMode::Sampled).unwrap();
        assert_eq!(h, h2);
    }
}
