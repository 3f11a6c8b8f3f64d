use arbitrary::Arbitrary;
use bytepattern::Pattern as SimdPattern;
use reference::{arbitrary::PatternStr, Pattern as RefPattern};

#[derive(Debug, Arbitrary)]
pub struct FuzzData {
    pub pattern: PatternStr,
    pub data: Vec<u8>,
}

/// Runs the SIMD scanner and the scalar reference scanner over the same
/// pattern/data pair and panics if they disagree. `PatternStr` never
/// generates a leading/trailing wildcard, so both constructors always
/// succeed.
pub fn run_test(input: FuzzData) {
    let text = &input.pattern.0;

    let simd = SimdPattern::<1>::from_str(text).expect("PatternStr must parse");
    let reference = RefPattern::from_ida_str(text, 1).expect("PatternStr must parse");

    let got: Vec<usize> = simd.matches(&input.data).collect();
    let want: Vec<usize> = reference.matches(&input.data).collect();

    assert_eq!(
        got, want,
        "pattern {text:?} disagreed on data of length {}",
        input.data.len()
    );
}
