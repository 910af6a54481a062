#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are fine; panics are not.
    let Ok(cfg) = toml::from_str::<adclut_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_ok() {
        // A config that validates must also yield valid core parameters
        let params = adclut_core::CalibrationParams::from(&cfg);
        assert!(params.validate().is_ok());
    }
});
