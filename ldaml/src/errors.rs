use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Test fraction must lie strictly between 0 and 1, got {value}")]
    InvalidTestFraction { value: f64 },

    #[error("Feature rows and labels differ in length: {features} vs {labels}")]
    SampleCountMismatch { features: usize, labels: usize },

    #[error("Label index {index} is out of range for a table of {classes} classes")]
    LabelOutOfRange { index: usize, classes: usize },
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Failed to open file: {0}")]
    FileOpen(#[from] std::io::Error),

    #[error("CSV file is empty")]
    EmptyFile,

    #[error("CSV must have a label column and at least one feature column")]
    InsufficientColumns,

    #[error("Inconsistent column count: row {row} has {actual} columns, expected {expected}")]
    InconsistentColumns { row: usize, actual: usize, expected: usize },

    #[error("Invalid numeric value '{value}' at row {row}: {source}")]
    InvalidNumeric { value: String, row: usize, source: std::num::ParseFloatError },

    #[error("Failed to shape data into array: {0}")]
    ArrayShape(#[from] ndarray::ShapeError),

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    #[error(transparent)]
    Data(#[from] DataError),
}

#[derive(Error, Debug)]
pub enum LinalgError {
    #[error("Scatter matrices must be square and of matching dimension: {expected} vs {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Within-class scatter is not positive definite")]
    NotPositiveDefinite,

    #[error("Triangular factor is singular")]
    SingularFactor,
}

#[derive(Error, Debug)]
pub enum FitError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training records have no features")]
    NoFeatures,

    #[error("At least 2 classes are required to fit, found {found}")]
    TooFewClasses { found: usize },

    #[error("Class '{class}' has no training examples")]
    EmptyClass { class: String },

    #[error("Eigen solver failed: {0}")]
    Eigen(#[from] LinalgError),
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Feature vector has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Discriminant axis {axis} is out of range, model retains {components} axes")]
    AxisOutOfRange { axis: usize, components: usize },
}

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Test set is empty, accuracy is undefined")]
    EmptyTestSet,

    #[error(transparent)]
    Model(#[from] ModelError),
}
