use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use adclut_config::{DatasetArrays, load_dataset, load_dataset_csv, load_dataset_json};
use rstest::rstest;
use tempfile::{TempDir, tempdir};

fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

#[rstest]
fn csv_two_columns() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "d.csv", "dac,adc_raw\n0,3\n128,1571\n255,3902\n");
    let arrays = load_dataset_csv(&path).unwrap();
    assert_eq!(
        arrays,
        DatasetArrays {
            dac: vec![0, 128, 255],
            adc_raw: vec![3, 1571, 3902],
            adc_corrected: None,
        }
    );
}

#[rstest]
fn csv_three_columns_with_whitespace() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "d.csv",
        "dac, adc_raw, adc_corrected\n0, 3, 0\n128 ,1571, 1650\n",
    );
    let arrays = load_dataset_csv(&path).unwrap();
    assert_eq!(arrays.len(), 2);
    assert_eq!(arrays.adc_corrected, Some(vec![0, 1650]));
}

#[rstest]
fn csv_keeps_out_of_range_codes_for_the_core() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "d.csv", "dac,adc_raw\n300,-1\n");
    let arrays = load_dataset_csv(&path).unwrap();
    assert_eq!(arrays.dac, vec![300]);
    assert_eq!(arrays.adc_raw, vec![-1]);
}

#[rstest]
fn csv_headers_only_is_empty() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "d.csv", "dac,adc_raw\n");
    let arrays = load_dataset_csv(&path).unwrap();
    assert!(arrays.is_empty());
}

#[rstest]
#[case("raw,grams\n1,2\n")]
#[case("adc_raw,dac\n1,2\n")]
#[case("dac\n1\n")]
#[case("dac,adc_raw,adc_corrected,extra\n1,2,3,4\n")]
fn csv_rejects_wrong_headers(#[case] body: &str) {
    let dir = tempdir().unwrap();
    let path = write(&dir, "d.csv", body);
    let err = load_dataset_csv(&path).expect_err("headers must be exact");
    assert!(
        format!("{err}")
            .to_lowercase()
            .contains("dataset csv must have headers")
    );
}

#[rstest]
#[case("dac,adc_raw\n0,3\nx,4\n", "invalid csv row 3")]
#[case("dac,adc_raw\n0,3.5\n", "invalid csv row 2")]
#[case("dac,adc_raw,adc_corrected\n0,3,1\n1,4,\n", "adc_corrected column has empty cells")]
fn csv_rejects_bad_rows(#[case] body: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = write(&dir, "d.csv", body);
    let err = load_dataset_csv(&path).expect_err("bad row");
    assert!(
        format!("{err}").to_lowercase().contains(needle),
        "unexpected message: {err}"
    );
}

#[rstest]
fn json_parallel_arrays() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "d.json",
        r#"{"dac":[0,1,2],"adc_raw":[5,20,36],"adc_corrected":[0,16,32]}"#,
    );
    let arrays = load_dataset_json(&path).unwrap();
    assert_eq!(arrays.dac, vec![0, 1, 2]);
    assert_eq!(arrays.adc_corrected, Some(vec![0, 16, 32]));
}

#[rstest]
fn json_corrected_is_optional() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "d.json", r#"{"dac":[0],"adc_raw":[5]}"#);
    let arrays = load_dataset_json(&path).unwrap();
    assert_eq!(arrays.adc_corrected, None);
}

#[rstest]
fn json_missing_field_is_an_error() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "d.json", r#"{"dac":[0]}"#);
    let err = load_dataset_json(&path).expect_err("missing adc_raw");
    assert!(format!("{err}").contains("invalid dataset JSON"));
}

#[rstest]
#[case("d.csv", "dac,adc_raw\n4,70\n")]
#[case("d.CSV", "dac,adc_raw\n4,70\n")]
#[case("d.json", r#"{"dac":[4],"adc_raw":[70]}"#)]
#[case("d.log", "boot banner\n4\t70\n")]
#[case("d.tsv", "4\t70\n")]
#[case("d.txt", "4\t70\n\n")]
fn dispatch_on_extension(#[case] name: &str, #[case] body: &str) {
    let dir = tempdir().unwrap();
    let path = write(&dir, name, body);
    let arrays = load_dataset(&path).unwrap();
    assert_eq!(arrays.dac, vec![4]);
    assert_eq!(arrays.adc_raw, vec![70]);
}

#[rstest]
#[case("d.npz")]
#[case("dataset")]
fn unknown_extension_is_rejected(#[case] name: &str) {
    let dir = tempdir().unwrap();
    let path = write(&dir, name, "");
    let err = load_dataset(&path).expect_err("unsupported");
    assert!(format!("{err}").contains("unsupported dataset extension"));
}
