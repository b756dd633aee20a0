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

use ndarray::Array2;
use std::fs::File;
use std::path::Path;

use crate::dataset::Dataset;
use crate::errors::CsvError;

pub struct CsvLoader;
pub struct CsvHeadersLoader;

/// A trait for loading labeled tabular data into a [`Dataset`].
///
/// The expected layout is one record per row with the class label in the
/// first column (a string or categorical value) and numeric features in the
/// remaining columns.
pub trait DataLoader {
    fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Dataset, Self::Error>;

    type Error: std::error::Error + 'static;
}

pub fn load_data<T: DataLoader, P: AsRef<std::path::Path>>(path: P) -> Result<Dataset, T::Error> {
    T::load(path)
}

fn load_csv_common<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<Dataset, CsvError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr =
        csv::ReaderBuilder::new().has_headers(has_headers).flexible(true).from_reader(file);

    let mut labels: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if i > 0 && record.len() != rows[0].len() + 1 {
            return Err(CsvError::InconsistentColumns {
                row: i + 1,
                actual: record.len(),
                expected: rows[0].len() + 1,
            });
        }
        let mut fields = record.iter();
        let label = fields.next().ok_or(CsvError::InsufficientColumns)?;
        let row: Vec<f64> = fields
            .map(|field| {
                field.parse::<f64>().map_err(|source| CsvError::InvalidNumeric {
                    value: field.to_string(),
                    row: i + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        labels.push(label.to_string());
        rows.push(row);
    }

    let n_rows = rows.len();
    if n_rows == 0 {
        return Err(CsvError::EmptyFile);
    }
    let n_features = rows[0].len();
    if n_features == 0 {
        return Err(CsvError::InsufficientColumns);
    }

    let feature_data: Vec<f64> = rows.into_iter().flatten().collect();
    let features = Array2::from_shape_vec((n_rows, n_features), feature_data)?;

    Ok(Dataset::from_labeled(features, &labels)?)
}

impl DataLoader for CsvLoader {
    fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, CsvError> {
        load_csv_common(path, false)
    }

    type Error = CsvError;
}

impl DataLoader for CsvHeadersLoader {
    fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, CsvError> {
        load_csv_common(path, true)
    }

    type Error = CsvError;
}
