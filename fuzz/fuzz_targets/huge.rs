#![no_main]

mod common;

use arbitrary::{Arbitrary, Unstructured};
use bytepattern::Pattern;
use common::FuzzData;
use libfuzzer_sys::{fuzz_target, Corpus};

/// Same differential check as `diff`, but against a buffer padded out past
/// several lane widths, to shake out off-by-`BYTES` bugs at block
/// boundaries that small inputs rarely reach.
fuzz_target!(|bytes: &[u8]| -> Corpus {
    let mut u = Unstructured::new(bytes);
    let Ok(input) = FuzzData::arbitrary(&mut u) else {
        return Corpus::Reject;
    };

    let text = &input.pattern.0;
    let Ok(pattern) = Pattern::<1>::from_str(text) else {
        return Corpus::Reject;
    };

    let mut data = input.data;
    data.resize(data.len() + 4 * bytepattern::BYTES, 0);

    common::run_test(FuzzData {
        pattern: input.pattern,
        data,
    });

    Corpus::Keep
});
