//! Fuzz target: run the full pipeline (lex, parse, desugar, typecheck)
//! over arbitrary source.
//!
//! A crash here indicates a bug anywhere in the front end — every phase
//! must return a `Diagnostic` rather than panic, regardless of input.

#![no_main]

use libfuzzer_sys::fuzz_target;

use vesper_front::PipelineConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(code) = std::str::from_utf8(data) else {
        return;
    };

    if code.len() > 8192 {
        return;
    }

    let _ = vesper_front::compile(code, "fuzz.vsp", PipelineConfig::default());
});
