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

use log::debug;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::errors::DataError;

/// A labeled tabular dataset: one feature row per record plus an encoded
/// class label per record. Labels index into a fixed, sorted class table,
/// so the lowest index is always the lexicographically smallest class name.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f64>,
    labels: Array1<usize>,
    classes: Vec<String>,
}

impl Dataset {
    pub fn new(
        features: Array2<f64>,
        labels: Array1<usize>,
        classes: Vec<String>,
    ) -> Result<Self, DataError> {
        if features.nrows() != labels.len() {
            return Err(DataError::SampleCountMismatch {
                features: features.nrows(),
                labels: labels.len(),
            });
        }
        if let Some(&index) = labels.iter().find(|&&index| index >= classes.len()) {
            return Err(DataError::LabelOutOfRange { index, classes: classes.len() });
        }
        Ok(Dataset { features, labels, classes })
    }

    /// Builds a dataset from raw string labels, deriving the class table
    /// from the labels themselves (sorted, deduplicated).
    pub fn from_labeled(features: Array2<f64>, labels: &[String]) -> Result<Self, DataError> {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        let encoded: Vec<usize> = labels
            .iter()
            .map(|label| {
                classes.binary_search(label).expect("Label missing from derived class table")
            })
            .collect();
        Self::new(features, Array1::from_vec(encoded), classes)
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_name(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Splits the records into a training and a test subset.
    ///
    /// The row indices are shuffled with an RNG seeded by `seed`; the first
    /// `round(test_fraction * n)` shuffled indices form the test set and the
    /// remainder the training set, so an identical (dataset, test_fraction,
    /// seed) triple always reproduces the same split. The split is plain
    /// random, not stratified: with few samples a class can end up entirely
    /// on one side. Both subsets keep the full class table of the parent.
    ///
    /// # Arguments
    /// - `test_fraction`: Fraction of records assigned to the test set,
    ///   strictly between 0 and 1.
    /// - `seed`: Seed for the shuffle.
    ///
    /// # Returns
    /// The `(train, test)` pair of datasets.
    pub fn train_test_split(
        &self,
        test_fraction: f64,
        seed: u64,
    ) -> Result<(Dataset, Dataset), DataError> {
        if self.n_samples() == 0 {
            return Err(DataError::EmptyDataset);
        }
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(DataError::InvalidTestFraction { value: test_fraction });
        }

        let mut indices: Vec<usize> = (0..self.n_samples()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test_size = (self.n_samples() as f64 * test_fraction).round() as usize;
        let (test_indices, train_indices) = indices.split_at(test_size);
        debug!("Split data: train_size={}, test_size={}", train_indices.len(), test_indices.len());

        Ok((self.subset(train_indices), self.subset(test_indices)))
    }

    fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
            classes: self.classes.clone(),
        }
    }
}
