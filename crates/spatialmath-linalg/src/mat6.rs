use glam::{DMat3, DVec3};

/// A 6-vector, stored as a plain array.
///
/// Used for se(3) twists in `[v, ω]` order and for rows of 6x6 matrices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Vec6F64(pub [f64; 6]);

impl Vec6F64 {
    /// All zeros.
    pub const ZERO: Self = Self([0.0; 6]);

    /// Create a vector from its six components.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self([a, b, c, d, e, f])
    }

    /// Stack two 3-vectors, `top` first.
    #[inline]
    pub fn from_parts(top: DVec3, bottom: DVec3) -> Self {
        Self([top.x, top.y, top.z, bottom.x, bottom.y, bottom.z])
    }

    /// The first three components.
    #[inline]
    pub fn top(&self) -> DVec3 {
        DVec3::new(self.0[0], self.0[1], self.0[2])
    }

    /// The last three components.
    #[inline]
    pub fn bottom(&self) -> DVec3 {
        DVec3::new(self.0[3], self.0[4], self.0[5])
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Return the underlying array.
    #[inline]
    pub fn to_array(&self) -> [f64; 6] {
        self.0
    }

    /// Element-wise comparison with an absolute tolerance.
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= max_abs_diff)
    }
}

impl std::ops::Index<usize> for Vec6F64 {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::Add for Vec6F64 {
    type Output = Vec6F64;

    fn add(self, rhs: Self) -> Self::Output {
        let mut out = self.0;
        out.iter_mut().zip(rhs.0.iter()).for_each(|(a, b)| *a += b);
        Self(out)
    }
}

impl std::ops::Sub for Vec6F64 {
    type Output = Vec6F64;

    fn sub(self, rhs: Self) -> Self::Output {
        let mut out = self.0;
        out.iter_mut().zip(rhs.0.iter()).for_each(|(a, b)| *a -= b);
        Self(out)
    }
}

impl std::ops::Mul<f64> for Vec6F64 {
    type Output = Vec6F64;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0.map(|a| a * rhs))
    }
}

impl std::ops::Neg for Vec6F64 {
    type Output = Vec6F64;

    fn neg(self) -> Self::Output {
        Self(self.0.map(|a| -a))
    }
}

/// A 6x6 matrix stored row-major.
///
/// Entry `(r, c)` is `self.0[r][c]`. The four 3x3 blocks are addressed by
/// block indices in `0..2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Mat6F64(pub [[f64; 6]; 6]);

impl Default for Mat6F64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Mat6F64 {
    /// All zeros.
    pub const ZERO: Self = Self([[0.0; 6]; 6]);

    /// The identity matrix.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
    ]);

    /// Create a matrix from row-major data.
    #[inline]
    pub fn from_rows(rows: [[f64; 6]; 6]) -> Self {
        Self(rows)
    }

    /// Assemble `[[a, b], [c, d]]` from four 3x3 blocks.
    pub fn from_blocks(a: DMat3, b: DMat3, c: DMat3, d: DMat3) -> Self {
        let mut m = Self::ZERO;
        m.set_block(0, 0, &a);
        m.set_block(0, 1, &b);
        m.set_block(1, 0, &c);
        m.set_block(1, 1, &d);
        m
    }

    /// Extract the 3x3 block at block row `br` and block column `bc`.
    pub fn block(&self, br: usize, bc: usize) -> DMat3 {
        let (r0, c0) = (3 * br, 3 * bc);
        let col = |c: usize| {
            DVec3::new(
                self.0[r0][c0 + c],
                self.0[r0 + 1][c0 + c],
                self.0[r0 + 2][c0 + c],
            )
        };
        DMat3::from_cols(col(0), col(1), col(2))
    }

    fn set_block(&mut self, br: usize, bc: usize, block: &DMat3) {
        for c in 0..3 {
            let column = block.col(c);
            for r in 0..3 {
                self.0[3 * br + r][3 * bc + c] = column[r];
            }
        }
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for (r, row) in self.0.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                out.0[c][r] = *value;
            }
        }
        out
    }

    /// Check if all elements are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|v| v.is_finite())
    }

    /// Element-wise comparison with an absolute tolerance.
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= max_abs_diff)
    }
}

impl std::ops::Index<(usize, usize)> for Mat6F64 {
    type Output = f64;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &Self::Output {
        &self.0[r][c]
    }
}

impl std::ops::Mul<Mat6F64> for Mat6F64 {
    type Output = Mat6F64;

    fn mul(self, rhs: Mat6F64) -> Self::Output {
        let mut out = Mat6F64::ZERO;
        for r in 0..6 {
            for c in 0..6 {
                out.0[r][c] = (0..6).map(|k| self.0[r][k] * rhs.0[k][c]).sum();
            }
        }
        out
    }
}

impl std::ops::Mul<Vec6F64> for Mat6F64 {
    type Output = Vec6F64;

    fn mul(self, rhs: Vec6F64) -> Self::Output {
        let mut out = [0.0; 6];
        for (r, value) in out.iter_mut().enumerate() {
            *value = self.0[r].iter().zip(rhs.0.iter()).map(|(a, b)| a * b).sum();
        }
        Vec6F64(out)
    }
}

impl std::ops::Mul<f64> for Mat6F64 {
    type Output = Mat6F64;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0.map(|row| row.map(|v| v * rhs)))
    }
}

impl std::ops::Add<Mat6F64> for Mat6F64 {
    type Output = Mat6F64;

    fn add(self, rhs: Mat6F64) -> Self::Output {
        let mut out = self;
        for r in 0..6 {
            for c in 0..6 {
                out.0[r][c] += rhs.0[r][c];
            }
        }
        out
    }
}

impl std::ops::Sub<Mat6F64> for Mat6F64 {
    type Output = Mat6F64;

    fn sub(self, rhs: Mat6F64) -> Self::Output {
        let mut out = self;
        for r in 0..6 {
            for c in 0..6 {
                out.0[r][c] -= rhs.0[r][c];
            }
        }
        out
    }
}
