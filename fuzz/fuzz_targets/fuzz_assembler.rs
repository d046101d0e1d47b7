//! Fuzz target: `MessageAssembler::feed`
//!
//! Drives arbitrary frame sequences (kinds, fin flags, payload bytes)
//! into the reassembler and asserts it never panics, never emits a
//! message over the size cap, and recovers cleanly after a reset.
//!
//! cargo fuzz run fuzz_assembler

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tanklevel::net::frame::{FrameInfo, FrameKind, MessageAssembler, MAX_MESSAGE_SIZE};

#[derive(Arbitrary, Debug)]
struct FuzzFrame {
    kind: u8,
    fin: bool,
    payload: Vec<u8>,
}

fuzz_target!(|frames: Vec<FuzzFrame>| {
    let mut assembler = MessageAssembler::new();

    for f in &frames {
        let kind = match f.kind % 3 {
            0 => FrameKind::Text,
            1 => FrameKind::Binary,
            _ => FrameKind::Continuation,
        };
        let info = FrameInfo { kind, fin: f.fin };

        if let Some(text) = assembler.feed(info, &f.payload) {
            assert!(text.len() <= MAX_MESSAGE_SIZE, "message exceeds size cap");
        }
    }

    // After a reset the assembler must accept a fresh message cleanly.
    assembler.reset();
    assert_eq!(
        assembler.feed(
            FrameInfo {
                kind: FrameKind::Text,
                fin: true
            },
            b"ok"
        ),
        Some("ok".to_string())
    );
});
