// End-to-end runs of the file-backed pipeline over small planar fixtures.

use std::{fs, path::Path};

use geopop::{AgeWindow, ConsistencyError, Crs, Pipeline, PipelineConfig};
use serde_json::{Value, json};

fn square(x: f64, y: f64, size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]],
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

fn landuse_description(label: &str) -> String {
    format!("<center><table><tr><th>LU_DESC</th> <td>{label}</td></tr><tr><th>GPR</th><td>3.0</td></tr></table></center>")
}

fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, value.to_string()).unwrap();
}

fn read_features(path: &Path) -> Vec<Value> {
    let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    value["features"].as_array().unwrap().clone()
}

/// Two residential buildings in subzone ABC (floor areas 100 and 300), one
/// commercial building, one footprint without usable levels, and a census
/// subzone XYZ without any buildings.
fn fixture(root: &Path) -> PipelineConfig {
    let planar = Crs::svy21();
    let config = PipelineConfig {
        input_crs: planar.clone(),
        calculation_crs: planar.clone(),
        output_crs: planar,
        ..PipelineConfig::default()
    }.with_root(root);

    write_json(&config.buildings_path, &collection(vec![
        json!({ "type": "Feature", "geometry": square(0.0, 0.0, 10.0), "properties": { "building:levels": "1" } }),
        json!({ "type": "Feature", "geometry": square(20.0, 0.0, 10.0), "properties": { "building:levels": 3 } }),
        json!({ "type": "Feature", "geometry": square(70.0, 70.0, 5.0), "properties": { "building:levels": "2" } }),
        json!({ "type": "Feature", "geometry": square(30.0, 30.0, 5.0), "properties": { "building:levels": "n/a" } }),
        json!({ "type": "Feature", "geometry": null, "properties": { "building:levels": "4" } }),
    ]));
    write_json(&config.landuse_path, &collection(vec![
        json!({ "type": "Feature", "geometry": square(0.0, 0.0, 50.0), "properties": { "Description": landuse_description("RESIDENTIAL") } }),
        json!({ "type": "Feature", "geometry": square(60.0, 60.0, 40.0), "properties": { "Description": landuse_description("COMMERCIAL") } }),
    ]));
    write_json(&config.subzone_path, &collection(vec![
        json!({ "type": "Feature", "geometry": square(0.0, 0.0, 100.0), "properties": { "name": "Abc" } }),
    ]));
    fs::write(
        &config.census_path,
        "PA,SZ,AG,Pop\n\
         Tampines,ABC,0_to_4,60\n\
         Tampines,ABC,65_to_69,25\n\
         Tampines,ABC,65_to_69,15\n\
         Tampines,ABC,90_and_over,8\n\
         Tampines,XYZ,0_to_4,99\n",
    ).unwrap();

    config
}

#[test]
fn full_run_writes_every_stage() {
    let tmp = tempfile::tempdir().unwrap();
    let config = fixture(tmp.path());
    let pipeline = Pipeline::new(config.clone());

    let rates = pipeline.run(true).unwrap();

    let classified = read_features(&config.classified_path);
    assert_eq!(classified.len(), 3);
    assert!(classified.iter().all(|f| f["properties"]["subzone"] == "Abc"));
    assert_eq!(classified[2]["properties"]["building_type"], "COMMERCIAL");

    let aggregated = fs::read_to_string(config.aggregated_census_path.as_ref().unwrap()).unwrap();
    assert!(aggregated.contains("Tampines,ABC,65_to_69,40"));

    let allocation = read_features(&config.allocation_path);
    assert_eq!(allocation.len(), 6, "two buildings times three brackets");
    assert!(allocation.iter().all(|f| f["properties"]["subzone"] == "ABC"));
    let total = allocation.iter().map(|f| f["properties"]["allocated_population"].as_f64().unwrap()).sum::<f64>();
    assert!((total - 108.0).abs() < 1e-6, "XYZ's 99 people are never allocated; got {total}");

    let elderly = read_features(&config.elderly_path);
    let elderly_counts = elderly.iter().map(|f| f["properties"]["allocated_population"].as_f64().unwrap()).collect::<Vec<_>>();
    assert!((elderly_counts[0] - 12.0).abs() < 1e-9 && (elderly_counts[1] - 36.0).abs() < 1e-9);
    assert!(elderly.iter().all(|f| f["properties"].get("age_bracket").is_none()));

    assert_eq!(read_features(&config.combined_path).len(), 2);

    let written = read_features(&config.elderly_rate_path);
    assert_eq!(written.len(), 2);
    assert_eq!(rates.len(), 2);
    for feature in written {
        let rate = feature["properties"]["elderly_rate"].as_f64().unwrap();
        assert!((rate - 48.0 / 108.0).abs() < 1e-9);
    }
}

#[test]
fn reduce_writes_custom_window() {
    let tmp = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(fixture(tmp.path()));
    pipeline.classify().unwrap();
    pipeline.allocate().unwrap();

    let output = tmp.path().join("processed/young.geojson");
    let reduced = pipeline.reduce(AgeWindow::new(0, Some(4)), &output).unwrap();

    assert_eq!(reduced.len(), 2);
    assert!((reduced[0].allocated_population - 15.0).abs() < 1e-9);
    assert!((reduced[1].allocated_population - 45.0).abs() < 1e-9);
    assert_eq!(read_features(&output).len(), 2);
}

#[test]
fn mismatched_reductions_abort_without_output() {
    let tmp = tempfile::tempdir().unwrap();
    let config = fixture(tmp.path());

    // A residential building in XYZ, which has no elderly brackets: it is in
    // the combined reduction but not the elderly one.
    let mut buildings: Value = serde_json::from_str(&fs::read_to_string(&config.buildings_path).unwrap()).unwrap();
    buildings["features"].as_array_mut().unwrap().push(
        json!({ "type": "Feature", "geometry": square(210.0, 0.0, 10.0), "properties": { "building:levels": "2" } })
    );
    write_json(&config.buildings_path, &buildings);
    let mut landuse: Value = serde_json::from_str(&fs::read_to_string(&config.landuse_path).unwrap()).unwrap();
    landuse["features"].as_array_mut().unwrap().push(
        json!({ "type": "Feature", "geometry": square(200.0, 0.0, 50.0), "properties": { "Description": landuse_description("RESIDENTIAL") } })
    );
    write_json(&config.landuse_path, &landuse);
    let mut subzones: Value = serde_json::from_str(&fs::read_to_string(&config.subzone_path).unwrap()).unwrap();
    subzones["features"].as_array_mut().unwrap().push(
        json!({ "type": "Feature", "geometry": square(200.0, 0.0, 100.0), "properties": { "name": "Xyz" } })
    );
    write_json(&config.subzone_path, &subzones);

    let err = Pipeline::new(config.clone()).run(true).unwrap_err();

    assert_eq!(
        err.downcast_ref::<ConsistencyError>(),
        Some(&ConsistencyError::FeatureCountMismatch { elderly: 2, combined: 3 }),
    );
    assert!(config.elderly_path.exists() && config.combined_path.exists());
    assert!(!config.elderly_rate_path.exists());
}

#[test]
fn allocation_requires_classified_buildings() {
    let tmp = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(fixture(tmp.path()));
    assert!(pipeline.allocate().is_err());
}
