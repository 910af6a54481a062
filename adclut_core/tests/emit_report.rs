use adclut_core::{
    CalibrationDataset, CalibrationError, CalibrationParams, CalibrationSample, CorrectionTable,
    HeaderOptions, correction_report, generate_table, render_c_header,
};
use rstest::rstest;

fn identity_table() -> Vec<u16> {
    (0..4096u16).collect()
}

#[rstest]
fn header_layout_matches_firmware_expectations() {
    let text = render_c_header(&identity_table(), &HeaderOptions::default()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "#ifndef ADC_CORRECTION_LUT_H");
    assert_eq!(lines[1], "#define ADC_CORRECTION_LUT_H");
    assert_eq!(lines[3], "#include <stdint.h>");
    assert_eq!(lines[5], "const uint16_t adc_correction_lut[4096] = {");
    assert_eq!(lines[6], "     0,    1,    2,    3,    4,    5,    6,    7,");
    assert_eq!(
        lines[6 + 511],
        "  4088, 4089, 4090, 4091, 4092, 4093, 4094, 4095,"
    );
    assert_eq!(lines[6 + 512], "};");
    assert_eq!(*lines.last().unwrap(), "#endif // ADC_CORRECTION_LUT_H");
    assert_eq!(lines.len(), 6 + 512 + 3);
}

#[rstest]
fn values_per_line_is_configurable() {
    let opts = HeaderOptions {
        values_per_line: 16,
        ..HeaderOptions::default()
    };
    let text = render_c_header(&identity_table(), &opts).unwrap();
    let body = text.lines().filter(|l| l.starts_with("  ")).count();
    assert_eq!(body, 256);
}

#[rstest]
#[case(vec![0u16; 4095], "expected 4096 entries")]
#[case({ let mut v = vec![0u16; 4096]; v[10] = 5000; v }, "exceeds full scale")]
fn emitter_rejects_contract_violations(#[case] entries: Vec<u16>, #[case] needle: &str) {
    let err = render_c_header(&entries, &HeaderOptions::default()).unwrap_err();
    assert!(matches!(err, CalibrationError::InvalidTable(_)));
    assert!(err.to_string().contains(needle), "{err}");
}

#[rstest]
fn emitter_rejects_bad_identifier() {
    let opts = HeaderOptions {
        name: "adc-lut".into(),
        ..HeaderOptions::default()
    };
    assert!(render_c_header(&identity_table(), &opts).is_err());
}

fn distorted_capture(with_firmware: bool) -> CalibrationDataset {
    let p = CalibrationParams::default();
    let mut samples = Vec::new();
    for dac in 0..256u32 {
        let v = p.dac_code_to_volts(f64::from(dac));
        let raw = p.volts_to_adc_code(0.1 + 0.92 * v - 0.02 * v * v).round() as u32;
        for _ in 0..4 {
            samples.push(CalibrationSample {
                dac_code: dac,
                raw_adc_code: raw,
                // Pretend an earlier LUT got within a couple of codes
                corrected_adc_code: with_firmware
                    .then(|| (p.volts_to_adc_code(v).round() as u32 + 2).min(4095)),
            });
        }
    }
    CalibrationDataset::new(samples, p).unwrap()
}

#[rstest]
fn report_shows_lut_beating_raw() {
    let ds = distorted_capture(false);
    let table = generate_table(&ds).unwrap();
    let report = correction_report(&ds, &table).unwrap();
    assert_eq!(report.samples, 1024);
    assert_eq!(report.levels.len(), 256);
    assert!(report.raw.rms_codes > 100.0, "raw rms {}", report.raw.rms_codes);
    assert!(report.lut.rms_codes < 2.0, "lut rms {}", report.lut.rms_codes);
    assert!(report.lut.max_abs_codes < report.raw.max_abs_codes);
    assert!((report.raw.rms_volts - report.raw.rms_codes * 3.3 / 4095.0).abs() < 1e-12);
    assert!(report.firmware.is_none());
}

#[rstest]
fn report_includes_firmware_column_when_present() {
    let ds = distorted_capture(true);
    let table = generate_table(&ds).unwrap();
    let report = correction_report(&ds, &table).unwrap();
    let fw = report.firmware.expect("firmware stats");
    assert!(fw.max_abs_codes <= 2.5 && fw.max_abs_codes >= 1.5, "{fw:?}");
    assert!(report.levels.iter().all(|l| l.firmware_error.is_some()));
}

#[rstest]
#[case(10)]
#[case(11)]
fn report_rejects_table_of_another_resolution(#[case] bits: u32) {
    let ds = distorted_capture(false);
    let other = CalibrationParams {
        adc_resolution_bits: bits,
        ..CalibrationParams::default()
    };
    let entries: Vec<u16> = (0..(1u16 << bits)).collect();
    let table = CorrectionTable::from_entries(entries, &other).unwrap();
    let err = correction_report(&ds, &table).unwrap_err();
    assert!(matches!(err, CalibrationError::InvalidTable(_)), "{err}");
    assert!(err.to_string().contains("needs 4096"), "{err}");
}

#[rstest]
fn table_from_entries_round_trips_through_emitter() {
    let p = CalibrationParams::default();
    let table = CorrectionTable::from_entries(identity_table(), &p).unwrap();
    assert_eq!(table.apply(4095), Some(4095));
    assert_eq!(table.apply(4096), None);
    assert!(render_c_header(table.entries(), &HeaderOptions::default()).is_ok());
}
