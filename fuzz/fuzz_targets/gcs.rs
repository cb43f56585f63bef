#![no_main]

use gcs_filter::fuzz::gcs::{harness, Data};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Data| harness(data));
