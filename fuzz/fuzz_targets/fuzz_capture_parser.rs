#![no_main]
use adclut_core::{CalibrationDataset, CalibrationParams, MapperChoice};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let log = adclut_config::parse_capture(data);
    assert_eq!(log.arrays.dac.len(), log.arrays.adc_raw.len());

    // Whatever survives parsing must either calibrate or fail with a typed error
    let params = CalibrationParams::default();
    let Ok(ds) = CalibrationDataset::from_arrays(&log.arrays, params) else {
        return;
    };
    if let Ok(cal) = adclut_core::run(&ds, MapperChoice::Linear) {
        assert_eq!(cal.table.len(), params.table_len());
    }
});
