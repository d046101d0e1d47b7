//! Fuzz target: `parse_request`
//!
//! Throws arbitrary UTF-8 at the command parser and asserts it either
//! yields a well-typed request or a clean rejection — never a panic.
//!
//! cargo fuzz run fuzz_request_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use tanklevel::app::commands::{parse_request, ClientRequest};

fuzz_target!(|raw: &str| {
    match parse_request(raw) {
        Ok(ClientRequest::Set { .. } | ClientRequest::Get { .. }) => {}
        Err(_) => {}
    }
});
