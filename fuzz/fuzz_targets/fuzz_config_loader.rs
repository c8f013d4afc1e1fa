#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = scope_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A validated config must map to a session the core accepts.
            let poll = scope_core::PollCfg::from(&cfg);
            let built = scope_core::Session::builder()
                .kind(poll.kind)
                .capacity(poll.capacity)
                .build();
            assert!(built.is_ok());
        }
    }
});
