use std::fs::File;
use std::io::{BufWriter, Write};

use ldaml::algorithms::LinearDiscriminantAnalysis;
use ldaml::data::{load_data, CsvLoader};
use ldaml::metrics::accuracy;
use ldaml::projection::scatter_points;

// Marker/color cycle for the scatter renderer, one pair per class.
const MARKERS: [char; 6] = ['H', '+', 'D', 'd', '|', '_'];
const COLORS: [char; 6] = ['b', 'g', 'r', 'c', 'm', 'y'];

#[tokio::main]
async fn main() {
    env_logger::init();

    // Breast tissue impedance dataset: class label first, then the I0,
    // PA500, HFS, DA, Area, A/DA, Max IP, DR and P measurements.
    let path = std::env::args().nth(1).unwrap_or_else(|| "../data.csv".to_string());
    let dataset = load_data::<CsvLoader, _>(&path).expect("Failed to load dataset");

    let (train, test) = dataset.train_test_split(0.3, 0).expect("Failed to split dataset");

    let mut model = LinearDiscriminantAnalysis::new().build();
    model.fit(&train).expect("Failed to fit LDA model");

    let components = model.n_components().expect("Model is fitted");
    let axes = if components > 1 { (0, 1) } else { (0, 0) };
    let points = scatter_points(&model, &train, axes).expect("Failed to project training set");

    let scatter_file = File::create("projection.csv").expect("Failed to create projection.csv");
    let mut writer = BufWriter::new(scatter_file);
    writeln!(writer, "class,marker,color,x,y").expect("Failed to write scatter header");
    for point in &points {
        let class_index = train
            .classes()
            .iter()
            .position(|class| *class == point.label)
            .expect("Scatter label comes from the class table");
        let marker = MARKERS[class_index % MARKERS.len()];
        let color = COLORS[class_index % COLORS.len()];
        let y = if components > 1 { point.y } else { 0.0 };
        writeln!(writer, "{},{},{},{},{}", point.label, marker, color, point.x, y)
            .expect("Failed to write scatter row");
    }
    println!("Wrote {} projected training points to projection.csv", points.len());

    let test_accuracy = accuracy(&model, &test).expect("Failed to evaluate model");
    println!("Accuracy of LDA classifier on test set: {:.2}%", test_accuracy * 100.0);
}
