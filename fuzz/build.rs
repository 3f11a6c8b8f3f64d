fn main() {
    println!("cargo::rerun-if-changed=corpus/diff");

    use std::{io::Write, path::PathBuf};

    // corpus/diff is seeded manually from interesting fuzzer finds; it's
    // fine for it not to exist yet.
    let files = std::fs::read_dir("corpus/diff")
        .into_iter()
        .flatten()
        .flatten();

    let out_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let mut out_file =
        std::fs::File::create(PathBuf::from(out_dir).join("fuzz_targets/data.rs")).unwrap();

    writeln!(&mut out_file, "pub static DATA: &[&[u8]] = &[").unwrap();
    for entry in files {
        let content = std::fs::read(entry.path()).unwrap();
        writeln!(
            &mut out_file,
            "&[{}],",
            content
                .iter()
                .map(|ch| ch.to_string())
                .collect::<Vec<_>>()
                .join(",")
        )
        .unwrap();
    }
    writeln!(&mut out_file, "];").unwrap();
}
