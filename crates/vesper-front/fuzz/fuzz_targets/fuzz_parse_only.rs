//! Fuzz target: lex and parse arbitrary source (no desugaring or
//! typechecking).
//!
//! Exercises only the lexer and parser. Runs much faster than
//! `fuzz_compile` and is effective for finding panics in tokenization,
//! Pratt-precedence expression parsing, and recursive-descent
//! declaration parsing.
//!
//! A crash here indicates a bug in lex/parse — these should never panic
//! regardless of input, only return a `Diagnostic`.

#![no_main]

use libfuzzer_sys::fuzz_target;

use vesper_front::Interner;

fuzz_target!(|data: &[u8]| {
    let Ok(code) = std::str::from_utf8(data) else {
        return;
    };

    if code.len() > 8192 {
        return;
    }

    let mut interner = Interner::new();
    let Ok(tokens) = vesper_front::lex(code, "fuzz.vsp", &mut interner) else {
        return;
    };
    let mut errors = Vec::new();
    let _ = vesper_front::parse_tokens(&tokens, &interner, &mut errors, vesper_front::PipelineConfig::default());
});
