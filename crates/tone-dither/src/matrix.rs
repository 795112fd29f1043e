//! Threshold matrices for ordered dithering.
//!
//! A [`ThresholdMatrix`] is an N×N permutation of `0..N²` tiled over the
//! image. The engine reads it through [`ThresholdMatrix::threshold`], which
//! normalizes the rank at `(x mod N, y mod N)` into `(0, 1)`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::kernel::UnknownPreset;

/// A square ordered-dither threshold matrix.
///
/// Invariant: `size >= 1` and the entries are exactly `0..size²`, each once.
///
/// # Example
///
/// ```
/// use tone_dither::ThresholdMatrix;
///
/// let m = ThresholdMatrix::bayer4();
/// assert_eq!(m.size(), 4);
/// assert_eq!(m.value(2, 0), 2);
/// // (rank + 0.5) / 16
/// assert!((m.threshold(0, 0) - 0.5 / 16.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdMatrix {
    size: usize,
    /// Row-major ranks.
    values: Vec<u32>,
}

impl ThresholdMatrix {
    /// Build a matrix from rows.
    ///
    /// Fails with `InvalidConfiguration` when the rows are empty, not square,
    /// or not a permutation of `0..N²`.
    pub fn new(rows: Vec<Vec<u32>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::EmptyMatrix.into());
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(ConfigError::MatrixNotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                }
                .into());
            }
        }

        let values: Vec<u32> = rows.into_iter().flatten().collect();
        let cells = size * size;
        let mut seen = vec![false; cells];
        for &v in &values {
            let slot = seen.get_mut(v as usize);
            match slot {
                Some(flag) if !*flag => *flag = true,
                _ => return Err(ConfigError::MatrixNotPermutation { size, cells }.into()),
            }
        }

        Ok(Self { size, values })
    }

    /// Recursive Bayer matrix of side `2^order`.
    ///
    /// `bayer(1)` is `[[0,2],[3,1]]`; each step builds
    /// `[[4M, 4M+2], [4M+3, 4M+1]]` from the previous matrix `M`. An order
    /// of zero gives the trivial 1×1 matrix.
    pub fn bayer(order: u32) -> Self {
        let mut size = 1usize;
        let mut values = vec![0u32];
        for _ in 0..order {
            let next_size = size * 2;
            let mut next = vec![0u32; next_size * next_size];
            for y in 0..next_size {
                for x in 0..next_size {
                    let base = 4 * values[(y % size) * size + (x % size)];
                    let offset = match (x / size, y / size) {
                        (0, 0) => 0,
                        (1, 0) => 2,
                        (0, 1) => 3,
                        _ => 1,
                    };
                    next[y * next_size + x] = base + offset;
                }
            }
            size = next_size;
            values = next;
        }
        Self { size, values }
    }

    /// The canonical 4×4 Bayer matrix
    /// `[[0,8,2,10],[12,4,14,6],[3,11,1,9],[15,7,13,5]]`.
    pub fn bayer4() -> Self {
        Self::bayer(2)
    }

    /// The 3×3 matrix `[[7,1,5],[3,0,2],[4,8,6]]`.
    pub fn clustered3() -> Self {
        Self {
            size: 3,
            values: vec![7, 1, 5, 3, 0, 2, 4, 8, 6],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells, `N²`.
    #[inline]
    pub fn cells(&self) -> usize {
        self.size * self.size
    }

    /// Rank at `(x mod N, y mod N)`.
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> u32 {
        let col = x as usize % self.size;
        let row = y as usize % self.size;
        self.values[row * self.size + col]
    }

    /// Normalized threshold `(M[y mod N][x mod N] + 0.5) / N²`.
    #[inline]
    pub fn threshold(&self, x: u32, y: u32) -> f64 {
        (f64::from(self.value(x, y)) + 0.5) / self.cells() as f64
    }

    /// The matrix as rows, for display and serialization.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.values.chunks(self.size).map(<[u32]>::to_vec).collect()
    }
}

/// Named matrix presets, for configuration files and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixPreset {
    Bayer2,
    Bayer4,
    Bayer8,
    Clustered3,
}

impl MatrixPreset {
    pub const ALL: [MatrixPreset; 4] = [
        MatrixPreset::Bayer2,
        MatrixPreset::Bayer4,
        MatrixPreset::Bayer8,
        MatrixPreset::Clustered3,
    ];

    pub fn matrix(self) -> ThresholdMatrix {
        match self {
            MatrixPreset::Bayer2 => ThresholdMatrix::bayer(1),
            MatrixPreset::Bayer4 => ThresholdMatrix::bayer4(),
            MatrixPreset::Bayer8 => ThresholdMatrix::bayer(3),
            MatrixPreset::Clustered3 => ThresholdMatrix::clustered3(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MatrixPreset::Bayer2 => "bayer2",
            MatrixPreset::Bayer4 => "bayer4",
            MatrixPreset::Bayer8 => "bayer8",
            MatrixPreset::Clustered3 => "clustered3",
        }
    }
}

impl fmt::Display for MatrixPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatrixPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        MatrixPreset::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| UnknownPreset::new("matrix", s))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::DitherError;

    #[test]
    fn test_bayer4_matches_canonical_table() {
        let m = ThresholdMatrix::bayer4();
        assert_eq!(
            m.rows(),
            vec![
                vec![0, 8, 2, 10],
                vec![12, 4, 14, 6],
                vec![3, 11, 1, 9],
                vec![15, 7, 13, 5],
            ]
        );
    }

    #[test]
    fn test_bayer2() {
        assert_eq!(ThresholdMatrix::bayer(1).rows(), vec![vec![0, 2], vec![3, 1]]);
    }

    #[test]
    fn test_bayer8_first_row_and_validity() {
        let m = ThresholdMatrix::bayer(3);
        assert_eq!(m.size(), 8);
        assert_eq!(m.rows()[0], vec![0, 32, 8, 40, 2, 34, 10, 42]);
        assert_eq!(m.rows()[7], vec![63, 31, 55, 23, 61, 29, 53, 21]);
        // Round-trips through validation
        assert_eq!(ThresholdMatrix::new(m.rows()).unwrap(), m);
    }

    #[test]
    fn test_clustered3_is_valid_permutation() {
        let m = ThresholdMatrix::clustered3();
        assert_eq!(ThresholdMatrix::new(m.rows()).unwrap(), m);
        assert_eq!(m.rows(), vec![vec![7, 1, 5], vec![3, 0, 2], vec![4, 8, 6]]);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(
            ThresholdMatrix::new(vec![]).unwrap_err(),
            DitherError::InvalidConfiguration(ConfigError::EmptyMatrix)
        );
    }

    #[test]
    fn test_new_rejects_non_square() {
        let err = ThresholdMatrix::new(vec![vec![0, 1], vec![2]]).unwrap_err();
        assert_eq!(
            err,
            DitherError::InvalidConfiguration(ConfigError::MatrixNotSquare {
                row: 1,
                len: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_new_rejects_duplicate_rank() {
        let err = ThresholdMatrix::new(vec![vec![0, 1], vec![1, 3]]).unwrap_err();
        assert_eq!(
            err,
            DitherError::InvalidConfiguration(ConfigError::MatrixNotPermutation {
                size: 2,
                cells: 4
            })
        );
    }

    #[test]
    fn test_new_rejects_out_of_range_rank() {
        assert!(ThresholdMatrix::new(vec![vec![0, 1], vec![2, 4]]).is_err());
    }

    #[test]
    fn test_threshold_tiles_by_modulo() {
        let m = ThresholdMatrix::bayer4();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(m.value(x, y), m.value(x + 4, y + 8));
                assert_eq!(m.threshold(x, y), m.threshold(x + 12, y + 4));
            }
        }
        // (250 mod 4, 250 mod 4) = (2, 2) -> rank 1
        assert_eq!(m.value(250, 250), 1);
    }

    #[test]
    fn test_thresholds_lie_strictly_inside_unit_interval() {
        let m = ThresholdMatrix::clustered3();
        for y in 0..3 {
            for x in 0..3 {
                let t = m.threshold(x, y);
                assert!(t > 0.0 && t < 1.0, "threshold {t} out of (0, 1)");
            }
        }
        assert!((m.threshold(1, 1) - 0.5 / 9.0).abs() < 1e-12);
        assert!((m.threshold(1, 2) - 8.5 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_preset_names() {
        for preset in MatrixPreset::ALL {
            assert_eq!(preset.name().parse::<MatrixPreset>(), Ok(preset));
        }
        assert_eq!(MatrixPreset::Bayer8.matrix().size(), 8);
        assert_eq!(
            "bayer16".parse::<MatrixPreset>().unwrap_err().to_string(),
            "unknown matrix preset: bayer16"
        );
    }
}
