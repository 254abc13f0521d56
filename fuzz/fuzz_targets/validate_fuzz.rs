//! Type model fuzz target: validate arbitrary JSON as a type model.
//! Validation must not panic, including on cyclic or dangling references.
//! Build with: cargo fuzz run validate_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let _ = schema_markdown::validate_type_model_types(&schema_markdown::Value::from(json));
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run validate_fuzz");
}
