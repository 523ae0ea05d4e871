//! Byte-level load progress.

use std::io::{self, Read};

/// Bytes read between progress reports.
const CHUNK_SIZE: usize = 64 * 1024;

/// Share of the combined progress bar taken by country geometry.
const GEOMETRY_SHARE: f32 = 60.0;

/// Which download a progress figure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Geometry,
    Imagery,
}

/// Maps one phase's byte progress onto a single 0..100 figure.
///
/// Geometry covers 0..60 and imagery 60..100. An unknown or zero total
/// reports the start of the phase.
pub fn combined_progress(phase: LoadPhase, loaded: u64, total: Option<u64>) -> f32 {
    let fraction = match total {
        Some(t) if t > 0 => (loaded as f64 / t as f64).min(1.0) as f32,
        _ => 0.0,
    };
    match phase {
        LoadPhase::Geometry => GEOMETRY_SHARE * fraction,
        LoadPhase::Imagery => GEOMETRY_SHARE + (100.0 - GEOMETRY_SHARE) * fraction,
    }
}

/// Drains `reader`, calling `on_progress(loaded, total)` after every chunk.
pub fn read_with_progress<R, F>(mut reader: R, total: Option<u64>, mut on_progress: F) -> io::Result<Vec<u8>>
where
    R: Read,
    F: FnMut(u64, Option<u64>),
{
    let mut bytes = Vec::with_capacity(total.unwrap_or(0).min(1 << 28) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut loaded = 0u64;
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        bytes.extend_from_slice(&chunk[..n]);
        loaded += n as u64;
        on_progress(loaded, total);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reports_every_chunk() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 10];
        let mut reports = Vec::new();
        let out = read_with_progress(Cursor::new(&data), Some(data.len() as u64), |l, t| reports.push((l, t))).unwrap();
        assert_eq!(out, data);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.last(), Some(&(data.len() as u64, Some(data.len() as u64))));
        assert!(reports.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_empty_reader() {
        let mut calls = 0;
        let out = read_with_progress(Cursor::new(Vec::<u8>::new()), None, |_, _| calls += 1).unwrap();
        assert!(out.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_combined_progress_ranges() {
        assert_eq!(combined_progress(LoadPhase::Geometry, 50, Some(100)), 30.0);
        assert_eq!(combined_progress(LoadPhase::Geometry, 100, Some(100)), 60.0);
        assert_eq!(combined_progress(LoadPhase::Imagery, 0, Some(100)), 60.0);
        assert_eq!(combined_progress(LoadPhase::Imagery, 100, Some(100)), 100.0);
        assert_eq!(combined_progress(LoadPhase::Imagery, 5, None), 60.0);
        assert_eq!(combined_progress(LoadPhase::Geometry, 500, Some(100)), 60.0);
    }
}
