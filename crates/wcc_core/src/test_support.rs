//! Stand-in executables for process tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// A fake `ffmpeg` that prints one `time=` progress line per entry in
/// `times` to stderr (carriage-return separated, like the real tool),
/// touches its last argument, and exits with `code`.
pub(crate) fn fake_ffmpeg(dir: &Path, times: &[&str], code: i32) -> PathBuf {
    let mut body = String::from("echo \"ffmpeg version n7.0 Copyright (c) the FFmpeg developers\" >&2\n");
    for time in times {
        body.push_str(&format!(
            "printf 'size=     512kB time={} bitrate=4608.0kbits/s speed= 120x\\r' >&2\n",
            time
        ));
    }
    if code == 0 {
        body.push_str("for last; do :; done\n: > \"$last\"\n");
    } else {
        body.push_str("echo \"Conversion failed!\" >&2\n");
    }
    body.push_str(&format!("exit {}", code));
    write_script(dir, "ffmpeg", &body)
}
