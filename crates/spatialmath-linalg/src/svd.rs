// Jacobi eigen-analysis of AᵀA followed by an orthonormalization of A·V.
// Reference: http://pages.cs.wisc.edu/~sifakis/papers/SVD_TR1690.pdf
use glam::{DMat3, DVec3};
use thiserror::Error;

const MAX_SWEEPS: usize = 32;
const OFF_DIAGONAL_EPSILON: f64 = 1e-30;
const RANK_EPSILON: f64 = 1e-12;

/// Error type for the 3x3 decompositions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    /// The matrix has rank lower than two, no rotation can be recovered from it.
    #[error("matrix is rank deficient (second singular value {singular_value})")]
    RankDeficient {
        /// The second largest singular value.
        singular_value: f64,
    },

    /// The matrix contains NaN or infinite entries.
    #[error("matrix contains non-finite entries")]
    NonFinite,
}

/// Symmetric 3x3 matrix stored row-major, only used during eigen-analysis.
#[derive(Debug, Clone)]
struct Symmetric3x3 {
    m: [[f64; 3]; 3],
}

impl Symmetric3x3 {
    fn from_mat3(mat: &DMat3) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = mat.col(c)[r];
            }
        }
        Self { m }
    }

    fn off_diagonal_norm_sq(&self) -> f64 {
        self.m[0][1] * self.m[0][1] + self.m[0][2] * self.m[0][2] + self.m[1][2] * self.m[1][2]
    }
}

/// Cosine and sine of a Jacobi rotation.
#[derive(Debug)]
struct Givens {
    cos_theta: f64,
    sin_theta: f64,
}

/// Rotation that annihilates `s[p][q]`.
#[inline]
fn givens_parameters(s_pp: f64, s_qq: f64, s_pq: f64) -> Givens {
    let tau = (s_qq - s_pp) / (2.0 * s_pq);
    let t = tau.signum() / (tau.abs() + (1.0 + tau * tau).sqrt());
    let cos_theta = 1.0 / (1.0 + t * t).sqrt();
    Givens {
        cos_theta,
        sin_theta: t * cos_theta,
    }
}

fn conjugate(s: &mut Symmetric3x3, v: &mut [[f64; 3]; 3], p: usize, q: usize) {
    if s.m[p][q].abs() < f64::MIN_POSITIVE {
        return;
    }
    let g = givens_parameters(s.m[p][p], s.m[q][q], s.m[p][q]);
    let (c, sn) = (g.cos_theta, g.sin_theta);

    // S ← Jᵀ S J
    for k in 0..3 {
        let (skp, skq) = (s.m[k][p], s.m[k][q]);
        s.m[k][p] = c * skp - sn * skq;
        s.m[k][q] = sn * skp + c * skq;
    }
    for k in 0..3 {
        let (spk, sqk) = (s.m[p][k], s.m[q][k]);
        s.m[p][k] = c * spk - sn * sqk;
        s.m[q][k] = sn * spk + c * sqk;
    }

    // V ← V J
    for row in v.iter_mut() {
        let (vkp, vkq) = (row[p], row[q]);
        row[p] = c * vkp - sn * vkq;
        row[q] = sn * vkp + c * vkq;
    }
}

fn jacobi_eigenanalysis(mut s: Symmetric3x3) -> DMat3 {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    for _ in 0..MAX_SWEEPS {
        if s.off_diagonal_norm_sq() < OFF_DIAGONAL_EPSILON {
            break;
        }
        conjugate(&mut s, &mut v, 0, 1);
        conjugate(&mut s, &mut v, 0, 2);
        conjugate(&mut s, &mut v, 1, 2);
    }
    DMat3::from_cols(
        DVec3::new(v[0][0], v[1][0], v[2][0]),
        DVec3::new(v[0][1], v[1][1], v[2][1]),
        DVec3::new(v[0][2], v[1][2], v[2][2]),
    )
}

/// Sorts the columns of `b` by decreasing norm and permutes `v` accordingly.
fn sort_singular_values(b: &mut DMat3, v: &mut DMat3) {
    let mut b_cols = [b.x_axis, b.y_axis, b.z_axis];
    let mut v_cols = [v.x_axis, v.y_axis, v.z_axis];
    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| b_cols[j].length_squared().total_cmp(&b_cols[i].length_squared()));
    let (b_src, v_src) = (b_cols, v_cols);
    for (dst, &src) in order.iter().enumerate() {
        b_cols[dst] = b_src[src];
        v_cols[dst] = v_src[src];
    }
    *b = DMat3::from_cols(b_cols[0], b_cols[1], b_cols[2]);
    *v = DMat3::from_cols(v_cols[0], v_cols[1], v_cols[2]);
}

/// Result of [`svd3`]: `A = U · diag(S) · Vᵀ`.
#[derive(Debug, Clone)]
pub struct Svd3 {
    u: DMat3,
    s: DVec3,
    v: DMat3,
}

impl Svd3 {
    /// Left singular vectors, orthonormal with determinant +1.
    #[inline]
    pub fn u(&self) -> &DMat3 {
        &self.u
    }

    /// Singular values in decreasing order. The last one carries the sign
    /// needed to keep `U` proper, so it is negative for reflections.
    #[inline]
    pub fn s(&self) -> &DVec3 {
        &self.s
    }

    /// Right singular vectors, orthonormal.
    #[inline]
    pub fn v(&self) -> &DMat3 {
        &self.v
    }
}

/// Singular value decomposition of a 3x3 matrix.
///
/// Fails when the matrix has rank lower than two.
pub fn svd3(a: &DMat3) -> Result<Svd3, LinalgError> {
    if !a.is_finite() {
        return Err(LinalgError::NonFinite);
    }

    // V holds the eigenvectors of AᵀA, i.e. the right singular vectors
    let mut v = jacobi_eigenanalysis(Symmetric3x3::from_mat3(&(a.transpose() * *a)));
    let mut b = *a * v;
    sort_singular_values(&mut b, &mut v);

    // B = U·S, recover U column by column
    let s0 = b.x_axis.length();
    if s0 < RANK_EPSILON {
        return Err(LinalgError::RankDeficient { singular_value: 0.0 });
    }
    let u0 = b.x_axis / s0;
    let b1 = b.y_axis - u0 * u0.dot(b.y_axis);
    let s1 = b1.length();
    if s1 < RANK_EPSILON * s0.max(1.0) {
        return Err(LinalgError::RankDeficient { singular_value: s1 });
    }
    let u1 = b1 / s1;
    let u2 = u0.cross(u1);
    let s2 = u2.dot(b.z_axis);

    Ok(Svd3 {
        u: DMat3::from_cols(u0, u1, u2),
        s: DVec3::new(s0, s1, s2),
        v,
    })
}

/// Frobenius norm of `AᵀA − I`.
pub fn orthogonality_error(a: &DMat3) -> f64 {
    let residual = a.transpose() * *a - DMat3::IDENTITY;
    residual
        .to_cols_array()
        .iter()
        .map(|v| v * v)
        .sum::<f64>()
        .sqrt()
}

/// Closest proper rotation to `a` in the Frobenius sense.
///
/// Computes `U · diag(1, 1, det(U Vᵀ)) · Vᵀ`, the rotation factor of the
/// polar decomposition with the reflection removed.
pub fn polar_rotation(a: &DMat3) -> Result<DMat3, LinalgError> {
    let svd = svd3(a)?;
    let v_t = svd.v.transpose();
    let d = (svd.u * v_t).determinant().signum();
    let correction = DMat3::from_diagonal(DVec3::new(1.0, 1.0, d));
    Ok(svd.u * correction * v_t)
}
