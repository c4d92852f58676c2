use approx::abs_diff_ne;
use faer::{Mat, linalg::solvers::DenseSolveCore};

/// Online ridge regression over dense features
///
/// Keeps `A = X^T X + lambda * I` and its inverse, updating the inverse with
/// the Sherman-Morrison formula so no update pays for a full inversion.
#[derive(Debug, Clone)]
pub struct OnlineRidge {
    a_matrix: Mat<f64>,
    a_inv: Mat<f64>,
    xty: Mat<f64>,
    beta: Mat<f64>,
    num_features: usize,
}

impl OnlineRidge {
    /// Create an untrained model with L2 penalty `l2_lambda`
    pub fn new(num_features: usize, l2_lambda: f64) -> Self {
        let a_matrix = Mat::from_fn(num_features, num_features, |i, j| {
            if i == j { l2_lambda } else { 0.0 }
        });
        let a_inv = Mat::from_fn(num_features, num_features, |i, j| {
            if i == j { 1.0 / l2_lambda } else { 0.0 }
        });

        Self {
            a_matrix,
            a_inv,
            xty: Mat::zeros(num_features, 1),
            beta: Mat::zeros(num_features, 1),
            num_features,
        }
    }

    /// Incorporate one observation `(x, y)`
    pub fn update(&mut self, x: &[f64], y: f64) {
        let n = self.num_features;
        let x_vec = Mat::from_fn(n, 1, |i, _| x[i]);

        for i in 0..n {
            for j in 0..n {
                self.a_matrix[(i, j)] += x[i] * x[j];
            }
        }

        // A_inv -= (A_inv x)(A_inv x)^T / (1 + x^T A_inv x)
        let a_inv_x = &self.a_inv * &x_vec;
        let denominator = 1.0 + (0..n).map(|i| x[i] * a_inv_x[(i, 0)]).sum::<f64>();

        if abs_diff_ne!(denominator, 0.0, epsilon = 1e-10) {
            for i in 0..n {
                for j in 0..n {
                    self.a_inv[(i, j)] -= a_inv_x[(i, 0)] * a_inv_x[(j, 0)] / denominator;
                }
            }
        } else {
            self.a_inv = self.a_matrix.partial_piv_lu().inverse();
        }

        for (i, &xi) in x.iter().enumerate().take(n) {
            self.xty[(i, 0)] += xi * y;
        }
        self.beta = &self.a_inv * &self.xty;
    }

    /// Predicted target for `x`
    pub fn predict(&self, x: &[f64]) -> f64 {
        x.iter()
            .enumerate()
            .take(self.num_features)
            .map(|(i, &xi)| xi * self.beta[(i, 0)])
            .sum()
    }
}
