#![forbid(unsafe_code)]

//! Text snapshots of rendered buffers.
//!
//! A buffer is flattened to one line per row (continuation cells skipped, so
//! wide glyphs keep their display width) and compared with a file under
//! `tests/snapshots/<name>.snap` in the calling crate. Mismatches panic with
//! a numbered line diff.
//!
//! ```ignore
//! use selectui_harness::assert_snapshot;
//!
//! let mut buf = Buffer::new(20, 6);
//! dropdown.render(buf.bounds(), &mut buf);
//! assert_snapshot!("dropdown_open", &buf);
//! ```
//!
//! Set `BLESS=1` to write the current output instead of comparing.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use selectui_render::buffer::Buffer;

pub use selectui_core::geometry::Rect;
pub use selectui_render::{buffer, cell};

/// Text of row `y`, trailing cells included. Out-of-range rows are empty.
pub fn row_text(buf: &Buffer, y: u16) -> String {
    if y >= buf.height() {
        return String::new();
    }
    buf.row_cells(y)
        .iter()
        .filter(|cell| !cell.is_continuation())
        .map(|cell| cell.content.as_char().unwrap_or(' '))
        .collect()
}

/// Every row with trailing spaces removed.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    (0..buf.height())
        .map(|y| row_text(buf, y).trim_end().to_owned())
        .collect()
}

/// Whole buffer as text, rows joined by `\n`, padding kept.
pub fn buffer_to_text(buf: &Buffer) -> String {
    (0..buf.height())
        .map(|y| row_text(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered diff of the lines that differ. Empty when the texts agree.
///
/// Each differing line prints as `NNN - expected` / `NNN + actual`; a side
/// that has run out of lines is omitted.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let mut exp = expected.lines();
    let mut act = actual.lines();
    let mut out = String::new();
    for line_no in 1.. {
        match (exp.next(), act.next()) {
            (None, None) => break,
            (e, a) if e == a => {}
            (e, a) => {
                if let Some(e) = e {
                    let _ = writeln!(out, "{line_no:>3} - {e}");
                }
                if let Some(a) = a {
                    let _ = writeln!(out, "{line_no:>3} + {a}");
                }
            }
        }
    }
    out
}

/// How snapshot text is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Byte-for-byte.
    Exact,
    /// Ignore trailing spaces per line and trailing blank lines.
    #[default]
    TrimTrailing,
}

impl MatchMode {
    fn normalize(self, text: &str) -> String {
        match self {
            Self::Exact => text.to_owned(),
            Self::TrimTrailing => {
                let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
                while lines.last().is_some_and(|l| l.is_empty()) {
                    lines.pop();
                }
                lines.join("\n")
            }
        }
    }
}

fn bless_requested() -> bool {
    matches!(std::env::var("BLESS").as_deref(), Ok("1") | Ok("true") | Ok("TRUE"))
}

fn snapshot_path(crate_dir: &Path, name: &str) -> PathBuf {
    crate_dir.join("tests/snapshots").join(format!("{name}.snap"))
}

/// Compare `buf` with the stored snapshot `name` under `crate_dir`.
///
/// # Panics
///
/// When the snapshot is missing (and `BLESS` is unset), unreadable, or
/// differs from the buffer.
pub fn assert_buffer_snapshot(name: &str, buf: &Buffer, crate_dir: &str, mode: MatchMode) {
    let path = snapshot_path(Path::new(crate_dir), name);
    let actual = buffer_to_text(buf);

    if bless_requested() {
        let written = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(&path, &actual));
        if let Err(e) = written {
            panic!("cannot bless snapshot {}: {e}", path.display());
        }
        return;
    }

    let expected = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => panic!(
            "snapshot '{name}' missing at {}; rerun with BLESS=1 to record it.\n\
             current {}x{} output:\n{actual}",
            path.display(),
            buf.width(),
            buf.height(),
        ),
        Err(e) => panic!("cannot read snapshot {}: {e}", path.display()),
    };

    let expected = mode.normalize(&expected);
    let actual = mode.normalize(&actual);
    if expected != actual {
        panic!(
            "Snapshot mismatch: '{name}' ({mode:?}, {})\nrerun with BLESS=1 to accept.\n{}",
            path.display(),
            diff_text(&expected, &actual)
        );
    }
}

/// Snapshot assertion rooted at the calling crate's `CARGO_MANIFEST_DIR`.
///
/// `assert_snapshot!(name, &buf)` trims trailing whitespace;
/// `assert_snapshot!(name, &buf, MatchMode::Exact)` does not.
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $buf:expr) => {
        $crate::assert_snapshot!($name, $buf, $crate::MatchMode::TrimTrailing)
    };
    ($name:expr, $buf:expr, $mode:expr) => {
        $crate::assert_buffer_snapshot($name, $buf, env!("CARGO_MANIFEST_DIR"), $mode)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use selectui_render::cell::Cell;

    fn sample() -> Buffer {
        let mut buf = Buffer::new(5, 2);
        buf.set(0, 0, Cell::from_char('a'));
        buf.set(1, 0, Cell::from_char('b'));
        buf.set(0, 1, Cell::from_char('中'));
        buf
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("selectui-harness-{tag}-{}", std::process::id()))
    }

    #[test]
    fn text_conversion_skips_continuations() {
        let buf = sample();
        assert_eq!(buffer_to_text(&buf), "ab   \n中   ");
        assert_eq!(buffer_lines(&buf), ["ab", "中"]);
        assert_eq!(row_text(&buf, 9), "");
    }

    #[test]
    fn diff_reports_only_changed_lines() {
        assert_eq!(diff_text("a\nb", "a\nb"), "");
        assert_eq!(diff_text("a\nb", "a\nc\nd"), "  2 - b\n  2 + c\n  3 + d\n");
    }

    #[test]
    fn trim_trailing_normalization() {
        assert_eq!(MatchMode::TrimTrailing.normalize("ab  \n  \n\n"), "ab");
        assert_eq!(MatchMode::Exact.normalize("x \n"), "x \n");
        assert_eq!(MatchMode::default(), MatchMode::TrimTrailing);
    }

    #[test]
    fn snapshot_matches_stored_file() {
        let dir = scratch_dir("ok");
        let path = snapshot_path(&dir, "sample");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "ab\n中\n").unwrap();

        assert_buffer_snapshot("sample", &sample(), dir.to_str().unwrap(), MatchMode::TrimTrailing);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    #[should_panic(expected = "Snapshot mismatch")]
    fn snapshot_mismatch_panics() {
        if bless_requested() {
            panic!("Snapshot mismatch (forced under BLESS)");
        }
        let dir = scratch_dir("mismatch");
        let path = snapshot_path(&dir, "sample");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "zz\n").unwrap();
        assert_buffer_snapshot("sample", &sample(), dir.to_str().unwrap(), MatchMode::Exact);
    }
}
