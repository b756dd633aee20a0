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

use crate::algorithms::LinearDiscriminantAnalysis;
use crate::dataset::Dataset;
use crate::errors::ModelError;

/// A single projected record, ready for a scatter renderer: two discriminant
/// coordinates and the resolved class name. Marker and color assignment is
/// the renderer's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Projects every record of `data` and pairs the coordinates on the chosen
/// discriminant axes with the record's class name. Requesting an axis the
/// fitted model does not retain is an error.
pub fn scatter_points(
    model: &LinearDiscriminantAnalysis,
    data: &Dataset,
    axes: (usize, usize),
) -> Result<Vec<ScatterPoint>, ModelError> {
    let components = model.n_components().ok_or(ModelError::NotFitted)?;
    for axis in [axes.0, axes.1] {
        if axis >= components {
            return Err(ModelError::AxisOutOfRange { axis, components });
        }
    }

    let projected = model.transform(data.features())?;
    let points = projected
        .outer_iter()
        .zip(data.labels().iter())
        .map(|(point, &label)| ScatterPoint {
            x: point[axes.0],
            y: point[axes.1],
            label: data
                .class_name(label)
                .expect("Label index within class table")
                .to_string(),
        })
        .collect();
    Ok(points)
}
