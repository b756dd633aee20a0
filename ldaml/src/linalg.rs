// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

use crate::errors::LinalgError;

/// A numeric backend for the generalized eigenproblem `S_w⁻¹ S_b w = λ w`.
///
/// `S_w` must be symmetric positive definite and `S_b` symmetric. Conforming
/// implementations return the eigenvalues ordered by descending magnitude
/// together with the matching unit-norm eigenvectors as matrix columns.
pub trait EigenSolver {
    fn solve_generalized_eigenproblem(
        &self,
        s_w: &Array2<f64>,
        s_b: &Array2<f64>,
    ) -> Result<(Array1<f64>, Array2<f64>), LinalgError>;
}

/// Default backend: reduces the generalized problem to an ordinary symmetric
/// one through the Cholesky factor of `S_w`.
///
/// With `S_w = L Lᵀ`, the matrix `M = L⁻¹ S_b L⁻ᵀ` is symmetric and shares
/// its eigenvalues with `S_w⁻¹ S_b`; eigenvectors map back as `w = L⁻ᵀ u`.
pub struct CholeskyEigenSolver;

impl EigenSolver for CholeskyEigenSolver {
    fn solve_generalized_eigenproblem(
        &self,
        s_w: &Array2<f64>,
        s_b: &Array2<f64>,
    ) -> Result<(Array1<f64>, Array2<f64>), LinalgError> {
        let d = s_w.nrows();
        if s_w.ncols() != d {
            return Err(LinalgError::ShapeMismatch { expected: d, actual: s_w.ncols() });
        }
        if s_b.nrows() != d || s_b.ncols() != d {
            return Err(LinalgError::ShapeMismatch { expected: d, actual: s_b.nrows() });
        }

        let s_w_na = to_nalgebra(s_w);
        let s_b_na = to_nalgebra(s_b);

        let cholesky = s_w_na.cholesky().ok_or(LinalgError::NotPositiveDefinite)?;
        let l = cholesky.l();

        let y = l.solve_lower_triangular(&s_b_na).ok_or(LinalgError::SingularFactor)?;
        let z = l.solve_lower_triangular(&y.transpose()).ok_or(LinalgError::SingularFactor)?;
        // z equals M up to floating-point asymmetry.
        let m = (&z + z.transpose()) * 0.5;

        let eigen = m.symmetric_eigen();
        let vectors = l
            .transpose()
            .solve_upper_triangular(&eigen.eigenvectors)
            .ok_or(LinalgError::SingularFactor)?;

        let mut order: Vec<usize> = (0..d).collect();
        order.sort_by(|&a, &b| {
            let (mag_a, mag_b) = (eigen.eigenvalues[a].abs(), eigen.eigenvalues[b].abs());
            mag_b.total_cmp(&mag_a)
        });

        let mut values = Array1::<f64>::zeros(d);
        let mut sorted = Array2::<f64>::zeros((d, d));
        for (rank, &index) in order.iter().enumerate() {
            values[rank] = eigen.eigenvalues[index];
            let column = vectors.column(index);
            let norm = column.norm();
            let scale = if norm == 0.0 { 1.0 } else { 1.0 / norm };
            for row in 0..d {
                sorted[[row, rank]] = column[row] * scale;
            }
        }

        Ok((values, sorted))
    }
}

fn to_nalgebra(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}
