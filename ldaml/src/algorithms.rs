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

use log::{debug, info};
use ndarray::{s, Array1, Array2, ArrayView1, Axis};

use crate::dataset::Dataset;
use crate::errors::{FitError, ModelError};
use crate::linalg::{CholeskyEigenSolver, EigenSolver};

/// Per-class mean vectors and sample counts, computed from training data.
pub struct ClassStatistics {
    means: Array2<f64>,
    counts: Vec<usize>,
}

impl ClassStatistics {
    fn compute(train: &Dataset) -> Result<Self, FitError> {
        let k = train.n_classes();
        let d = train.n_features();

        let mut sums = Array2::<f64>::zeros((k, d));
        let mut counts = vec![0_usize; k];
        for (row, &label) in train.features().outer_iter().zip(train.labels().iter()) {
            let mut sum = sums.row_mut(label);
            sum += &row;
            counts[label] += 1;
        }

        for (index, &count) in counts.iter().enumerate() {
            if count == 0 {
                return Err(FitError::EmptyClass {
                    class: train
                        .class_name(index)
                        .expect("Class index within table")
                        .to_string(),
                });
            }
        }

        let mut means = sums;
        for (mut mean, &count) in means.outer_iter_mut().zip(counts.iter()) {
            mean /= count as f64;
        }

        Ok(ClassStatistics { means, counts })
    }

    /// Class means as a `(n_classes, n_features)` matrix, row k for class k.
    pub fn means(&self) -> &Array2<f64> {
        &self.means
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

struct Fitted {
    n_features: usize,
    classes: Vec<String>,
    statistics: ClassStatistics,
    global_mean: Array1<f64>,
    eigenvalues: Array1<f64>,
    basis: Array2<f64>,
    centroids: Array2<f64>,
}

pub struct LinearDiscriminantAnalysisBuilder {
    regularization: f64,
    solver: Box<dyn EigenSolver>,
}

impl LinearDiscriminantAnalysisBuilder {
    /// Sets the ridge term added to the diagonal of the within-class scatter
    /// before factorization.
    pub fn regularization(mut self, epsilon: f64) -> Self {
        self.regularization = epsilon;
        self
    }

    pub fn solver(mut self, solver: impl EigenSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn build(self) -> LinearDiscriminantAnalysis {
        LinearDiscriminantAnalysis {
            regularization: self.regularization,
            solver: self.solver,
            fitted: None,
        }
    }
}

/// Linear discriminant analysis: learns the directions that maximize
/// between-class separation relative to within-class scatter, projects
/// feature vectors onto them, and classifies by nearest projected centroid.
pub struct LinearDiscriminantAnalysis {
    regularization: f64,
    solver: Box<dyn EigenSolver>,
    fitted: Option<Fitted>,
}

impl LinearDiscriminantAnalysis {
    pub fn new() -> LinearDiscriminantAnalysisBuilder {
        LinearDiscriminantAnalysisBuilder {
            regularization: 1e-6,
            solver: Box::new(CholeskyEigenSolver),
        }
    }

    /// Fits the discriminant basis to the training data.
    ///
    /// Computes per-class means and counts, the within-class scatter `S_w`
    /// (regularized as `S_w + ε·I`) and the between-class scatter `S_b`,
    /// solves `S_w⁻¹ S_b w = λ w` through the configured solver and retains
    /// the top `min(n_classes − 1, n_features)` eigenvectors by descending
    /// eigenvalue magnitude. Refitting replaces all prior state; on error
    /// the model is left unfitted.
    pub fn fit(&mut self, train: &Dataset) -> Result<(), FitError> {
        self.fitted = None;

        let n = train.n_samples();
        if n == 0 {
            return Err(FitError::EmptyTrainingSet);
        }
        let d = train.n_features();
        if d == 0 {
            return Err(FitError::NoFeatures);
        }
        let k = train.n_classes();
        if k < 2 {
            return Err(FitError::TooFewClasses { found: k });
        }

        debug!("Fitting LDA on {} samples, {} features, {} classes", n, d, k);
        let statistics = ClassStatistics::compute(train)?;
        let global_mean =
            train.features().mean_axis(Axis(0)).expect("Training set is non-empty");

        let mut s_w = Array2::<f64>::zeros((d, d));
        for (row, &label) in train.features().outer_iter().zip(train.labels().iter()) {
            let centered = &row - &statistics.means().row(label);
            accumulate_outer(&mut s_w, &centered, 1.0);
        }
        for i in 0..d {
            s_w[[i, i]] += self.regularization;
        }

        let mut s_b = Array2::<f64>::zeros((d, d));
        for (index, mean) in statistics.means().outer_iter().enumerate() {
            let centered = &mean - &global_mean;
            accumulate_outer(&mut s_b, &centered, statistics.counts()[index] as f64);
        }

        let (eigenvalues, eigenvectors) =
            self.solver.solve_generalized_eigenproblem(&s_w, &s_b)?;

        let components = (k - 1).min(d);
        let basis = eigenvectors.slice(s![.., ..components]).to_owned();
        let eigenvalues = eigenvalues.slice(s![..components]).to_owned();
        debug!("Retained {} discriminant axes, eigenvalues {:?}", components, eigenvalues);

        let centroids = (statistics.means() - &global_mean).dot(&basis);

        self.fitted = Some(Fitted {
            n_features: d,
            classes: train.classes().to_vec(),
            statistics,
            global_mean,
            eigenvalues,
            basis,
            centroids,
        });
        info!("LDA fit complete: {} samples, {} discriminant axes", n, components);
        Ok(())
    }

    /// Projects a single feature vector into the discriminant space.
    pub fn project(&self, x: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
        let fitted = self.fitted()?;
        if x.len() != fitted.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: fitted.n_features,
                actual: x.len(),
            });
        }
        Ok((x - &fitted.global_mean).dot(&fitted.basis))
    }

    /// Projects every row of `x` into the discriminant space.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        let fitted = self.fitted()?;
        if x.ncols() != fitted.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: fitted.n_features,
                actual: x.ncols(),
            });
        }
        Ok((x - &fitted.global_mean).dot(&fitted.basis))
    }

    /// Fits the model and returns the projected training features.
    pub fn fit_transform(&mut self, train: &Dataset) -> Result<Array2<f64>, FitError> {
        self.fit(train)?;
        Ok(self.transform(train.features()).expect("Model was fitted above"))
    }

    /// Classifies a feature vector by the nearest projected class centroid.
    /// Ties resolve to the lowest class index, which is the
    /// lexicographically smallest class name.
    pub fn classify(&self, x: &Array1<f64>) -> Result<usize, ModelError> {
        let fitted = self.fitted()?;
        let projected = self.project(x)?;
        Ok(nearest_centroid(&fitted.centroids, &projected.view()))
    }

    /// Classifies every row of `x`, returning one class index per row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>, ModelError> {
        let fitted = self.fitted()?;
        let projected = self.transform(x)?;
        let labels: Vec<usize> = projected
            .outer_iter()
            .map(|point| nearest_centroid(&fitted.centroids, &point))
            .collect();
        Ok(Array1::from_vec(labels))
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Number of retained discriminant axes, `None` before fit.
    pub fn n_components(&self) -> Option<usize> {
        self.fitted.as_ref().map(|fitted| fitted.basis.ncols())
    }

    pub fn eigenvalues(&self) -> Option<&Array1<f64>> {
        self.fitted.as_ref().map(|fitted| &fitted.eigenvalues)
    }

    pub fn class_statistics(&self) -> Option<&ClassStatistics> {
        self.fitted.as_ref().map(|fitted| &fitted.statistics)
    }

    pub fn classes(&self) -> Option<&[String]> {
        self.fitted.as_ref().map(|fitted| fitted.classes.as_slice())
    }

    #[inline(always)]
    fn fitted(&self) -> Result<&Fitted, ModelError> {
        self.fitted.as_ref().ok_or(ModelError::NotFitted)
    }
}

#[inline(always)]
fn accumulate_outer(target: &mut Array2<f64>, v: &Array1<f64>, weight: f64) {
    for (i, &vi) in v.iter().enumerate() {
        for (j, &vj) in v.iter().enumerate() {
            target[[i, j]] += weight * vi * vj;
        }
    }
}

#[inline(always)]
fn nearest_centroid(centroids: &Array2<f64>, point: &ArrayView1<f64>) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (index, centroid) in centroids.outer_iter().enumerate() {
        let dist: f64 =
            centroid.iter().zip(point.iter()).map(|(c, p)| (c - p) * (c - p)).sum();
        // Strict comparison keeps the lowest class index on ties.
        if dist < best_dist {
            best_dist = dist;
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    use crate::metrics::accuracy;

    fn two_cluster_dataset() -> Dataset {
        let features = array![
            [0.0, 0.2],
            [0.2, -0.1],
            [-0.1, 0.1],
            [5.0, 5.1],
            [5.2, 4.8],
            [4.8, 5.0],
        ];
        let labels = array![0_usize, 0, 0, 1, 1, 1];
        Dataset::new(features, labels, vec!["a".to_string(), "b".to_string()]).unwrap()
    }

    fn gaussian_clusters(
        centers: &[(f64, f64)],
        per_class: usize,
        sigma: f64,
        seed: u64,
    ) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, sigma).unwrap();

        let mut data = Vec::with_capacity(centers.len() * per_class * 2);
        let mut labels = Vec::with_capacity(centers.len() * per_class);
        for (class, &(cx, cy)) in centers.iter().enumerate() {
            for _ in 0..per_class {
                data.push(cx + noise.sample(&mut rng));
                data.push(cy + noise.sample(&mut rng));
                labels.push(class);
            }
        }

        let features =
            Array2::from_shape_vec((centers.len() * per_class, 2), data).unwrap();
        let classes = (0..centers.len()).map(|class| class.to_string()).collect();
        Dataset::new(features, Array1::from_vec(labels), classes).unwrap()
    }

    #[test]
    fn test_fit_and_classify_class_means() {
        let train = two_cluster_dataset();
        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();

        let statistics = model.class_statistics().unwrap();
        let means = statistics.means().to_owned();
        for class in 0..train.n_classes() {
            let mean = means.row(class).to_owned();
            assert_eq!(model.classify(&mean).unwrap(), class);
        }
    }

    #[test]
    fn test_fit_retains_min_components() {
        let train = two_cluster_dataset();
        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();

        // Two classes in two dimensions keep a single discriminant axis.
        assert_eq!(model.n_components(), Some(1));
        assert_eq!(model.eigenvalues().unwrap().len(), 1);
    }

    #[test]
    fn test_fit_is_deterministic_up_to_sign() {
        let train = gaussian_clusters(&[(0.0, 0.0), (4.0, 1.0), (-3.0, 5.0)], 30, 0.5, 9);

        let mut first = LinearDiscriminantAnalysis::new().build();
        first.fit(&train).unwrap();
        let first_projection = first.transform(train.features()).unwrap();

        let mut second = LinearDiscriminantAnalysis::new().build();
        second.fit(&train).unwrap();
        let second_projection = second.transform(train.features()).unwrap();

        for (a, b) in first_projection.iter().zip(second_projection.iter()) {
            assert!((a.abs() - b.abs()).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_projection_is_linear() {
        // Classes mirrored through the origin, so the global mean vanishes
        // and projection reduces to a pure linear map.
        let features = array![
            [-5.0, -5.0],
            [-5.2, -4.8],
            [-4.8, -5.2],
            [5.0, 5.0],
            [5.2, 4.8],
            [4.8, 5.2],
        ];
        let labels = array![0_usize, 0, 0, 1, 1, 1];
        let train =
            Dataset::new(features, labels, vec!["a".to_string(), "b".to_string()]).unwrap();

        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();

        let x = array![1.0, -2.0];
        let y = array![0.5, 3.0];
        let (a, b) = (2.0, -0.7);

        let combined = model.project(&(&x * a + &y * b)).unwrap();
        let separate = model.project(&x).unwrap() * a + model.project(&y).unwrap() * b;
        for (lhs, rhs) in combined.iter().zip(separate.iter()) {
            assert!((lhs - rhs).abs() < 1e-9, "{} vs {}", lhs, rhs);
        }
    }

    #[test]
    fn test_project_before_fit() {
        let model = LinearDiscriminantAnalysis::new().build();
        let result = model.project(&array![1.0, 2.0]);
        assert!(matches!(result, Err(ModelError::NotFitted)));
    }

    #[test]
    fn test_project_dimension_mismatch() {
        let train = two_cluster_dataset();
        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();

        let result = model.project(&array![1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_fit_single_class() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let labels = array![0_usize, 0];
        let train = Dataset::new(features, labels, vec!["only".to_string()]).unwrap();

        let mut model = LinearDiscriminantAnalysis::new().build();
        let result = model.fit(&train);
        assert!(matches!(result, Err(FitError::TooFewClasses { found: 1 })));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_fit_empty_class() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let labels = array![0_usize, 1];
        let train = Dataset::new(
            features,
            labels,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
        .unwrap();

        let mut model = LinearDiscriminantAnalysis::new().build();
        let result = model.fit(&train);
        assert!(matches!(result, Err(FitError::EmptyClass { class }) if class == "c"));
    }

    #[test]
    fn test_fit_no_features() {
        let train = Dataset::new(
            Array2::zeros((4, 0)),
            array![0_usize, 0, 1, 1],
            vec!["a".to_string(), "b".to_string()],
        )
        .unwrap();

        let mut model = LinearDiscriminantAnalysis::new().build();
        assert!(matches!(model.fit(&train), Err(FitError::NoFeatures)));
    }

    #[test]
    fn test_fit_empty_training_set() {
        let train = Dataset::new(
            Array2::zeros((0, 2)),
            Array1::from_vec(vec![]),
            vec!["a".to_string(), "b".to_string()],
        )
        .unwrap();

        let mut model = LinearDiscriminantAnalysis::new().build();
        assert!(matches!(model.fit(&train), Err(FitError::EmptyTrainingSet)));
    }

    #[test]
    fn test_failed_refit_resets_state() {
        let train = two_cluster_dataset();
        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();
        assert!(model.is_fitted());

        let degenerate = Dataset::new(
            array![[1.0, 2.0]],
            array![0_usize],
            vec!["only".to_string()],
        )
        .unwrap();
        assert!(model.fit(&degenerate).is_err());
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_fit_transform_shape() {
        let train = gaussian_clusters(&[(0.0, 0.0), (4.0, 1.0), (-3.0, 5.0)], 20, 0.3, 3);
        let mut model = LinearDiscriminantAnalysis::new().build();
        let projected = model.fit_transform(&train).unwrap();

        // Three classes in two dimensions cap the basis at two axes.
        assert_eq!(projected.shape(), &[60, 2]);
    }

    #[test]
    fn test_three_class_prediction() {
        let train = gaussian_clusters(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)], 30, 0.2, 11);
        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();

        let predictions = model.predict(train.features()).unwrap();
        let correct = predictions
            .iter()
            .zip(train.labels().iter())
            .filter(|(pred, actual)| pred == actual)
            .count();
        assert!(correct as f64 / train.n_samples() as f64 > 0.95);
    }

    #[test]
    fn test_end_to_end_two_gaussians() {
        let dataset = gaussian_clusters(&[(0.0, 0.0), (10.0, 10.0)], 100, 0.1, 42);
        let (train, test) = dataset.train_test_split(0.3, 42).unwrap();

        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();

        let score = accuracy(&model, &test).unwrap();
        assert!(score >= 0.95, "Expected near-perfect separation, got {}", score);
    }

    #[test]
    fn test_iris_fit_and_score() {
        let iris = linfa_datasets::iris();
        let features = Array2::from_shape_vec(
            (iris.records().nrows(), iris.records().ncols()),
            iris.records().iter().copied().collect(),
        )
        .unwrap();
        let labels: Vec<usize> = iris.targets().iter().map(|&target| target as usize).collect();
        let classes = vec![
            "setosa".to_string(),
            "versicolor".to_string(),
            "virginica".to_string(),
        ];
        let dataset =
            Dataset::new(features, Array1::from_vec(labels), classes).unwrap();

        let (train, test) = dataset.train_test_split(0.25, 42).unwrap();
        let mut model = LinearDiscriminantAnalysis::new().build();
        model.fit(&train).unwrap();

        assert_eq!(model.n_components(), Some(2));
        let score = accuracy(&model, &test).unwrap();
        assert!(score > 0.9, "Iris accuracy should exceed 0.9, got {}", score);
    }
}
