#![no_main]
use libfuzzer_sys::fuzz_target;
extern crate plterm_lexer;
use plterm_lexer::Tokenizer;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut end = 0;
    for tok in Tokenizer::new(&text) {
        let Ok(tok) = tok else { break };
        assert!(tok.span.start >= end);
        end = tok.span.end;
    }
});
