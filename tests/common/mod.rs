//! Archive fixtures built in-process.

#![allow(dead_code)]
#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Write a gzip-compressed tarball holding `entries` (path, content).
pub fn write_tar_gz<D: AsRef<[u8]>>(path: &Path, entries: &[(&str, D)]) {
    let file = File::create(path).expect("create archive");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for (name, data) in entries {
        let data = data.as_ref();
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, data)
            .expect("append entry");
    }

    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip");
}

/// Write `data` as a plain gzip stream without tar framing.
pub fn write_bare_gz(path: &Path, data: &[u8]) {
    let file = File::create(path).expect("create archive");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(data).expect("write payload");
    encoder.finish().expect("finish gzip");
}

/// A minimal main document with `body` inside the document environment.
pub fn main_tex(body: &str) -> String {
    format!("\\documentclass{{article}}\n\\begin{{document}}\n{body}\n\\end{{document}}\n")
}
