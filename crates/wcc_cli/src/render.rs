//! Text rendering of view models.

use std::fmt::Write as _;

use wcc_core::view::{ProgressView, SessionView, COLUMNS};

const BAR_WIDTH: usize = 30;

/// Merger output lines echoed after a failure.
const DIAGNOSTIC_TAIL: usize = 5;

/// The file table, totals, destination, warnings and readiness.
pub fn session(view: &SessionView) -> String {
    let mut out = String::new();

    if view.is_empty() {
        out.push_str("No files. Use 'add <file>...' to select WAV files.\n");
        return out;
    }

    // Widest cell per column
    let mut widths = COLUMNS.map(|title| title.chars().count());
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let number_width = view.rows.len().to_string().len();

    let header: Vec<String> = COLUMNS
        .iter()
        .zip(widths)
        .map(|(title, w)| pad(title, w))
        .collect();
    let _ = writeln!(out, "{:>nw$}  {}", "#", header.join("  ").trim_end(), nw = number_width);

    for row in &view.rows {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .zip(widths)
            .map(|(cell, w)| pad(cell, w))
            .collect();
        let _ = writeln!(
            out,
            "{:>nw$}  {}",
            row.index + 1,
            cells.join("  ").trim_end(),
            nw = number_width
        );
        if let Some(error) = &row.error {
            let _ = writeln!(out, "{:>nw$}  ! {}", "", error, nw = number_width);
        }
    }

    let _ = writeln!(out, "\nTotal channels: {}", view.total_channels);
    let _ = writeln!(
        out,
        "Output: {}",
        view.output_path.as_deref().unwrap_or("(not selected)")
    );
    for warning in &view.warnings {
        let _ = writeln!(out, "Warning: {}", warning);
    }
    if view.combine_enabled {
        out.push_str("Ready to combine.\n");
    }
    out
}

/// Pad by character count (cells may hold non-ASCII such as the dash).
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// `[#########.....................]  30% Processing... 12s processed`
pub fn progress(view: &ProgressView) -> String {
    let filled = view.filled(BAR_WIDTH);
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        view.percent,
        view.message
    )
}

/// Last few non-empty lines of merger output (split on `\n` and `\r`).
pub fn diagnostic_tail(diagnostics: &str) -> Vec<&str> {
    let lines: Vec<&str> = diagnostics
        .split(['\n', '\r'])
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    lines[lines.len().saturating_sub(DIAGNOSTIC_TAIL)..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wcc_core::view::FileRow;

    fn row(index: usize, name: &str, channels: &str, error: Option<&str>) -> FileRow {
        FileRow {
            index,
            name: name.to_string(),
            duration: "2:05".to_string(),
            sample_rate: "48.0 kHz".to_string(),
            bit_depth: "—".to_string(),
            channels: channels.to_string(),
            loading: false,
            error: error.map(str::to_string),
            can_move_up: index > 0,
            can_move_down: false,
        }
    }

    #[test]
    fn empty_session_prompts_for_files() {
        let view = SessionView {
            rows: vec![],
            total_channels: 0,
            output_path: None,
            combine_enabled: false,
            warnings: vec![],
        };
        assert!(session(&view).starts_with("No files."));
    }

    #[test]
    fn table_lists_rows_and_totals() {
        let view = SessionView {
            rows: vec![
                row(0, "kick.wav", "1", None),
                row(1, "overheads.wav", "?", Some("No audio stream found")),
            ],
            total_channels: 1,
            output_path: Some("/tmp/mix.wav".to_string()),
            combine_enabled: false,
            warnings: vec!["Sample rates differ: 44.1 kHz, 48.0 kHz".to_string()],
        };
        let text = session(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("#  Filename"));
        assert!(lines[1].starts_with("1  kick.wav       2:05"));
        assert!(lines[2].starts_with("2  overheads.wav  2:05"));
        assert_eq!(lines[3], "   ! No audio stream found");
        assert!(text.contains("Total channels: 1"));
        assert!(text.contains("Output: /tmp/mix.wav"));
        assert!(text.contains("Warning: Sample rates differ"));
        assert!(!text.contains("Ready to combine."));
    }

    #[test]
    fn progress_bar() {
        let view = ProgressView {
            percent: 50,
            message: "Processing... 3s processed".to_string(),
        };
        assert_eq!(
            progress(&view),
            format!("[{}{}]  50% Processing... 3s processed", "#".repeat(15), ".".repeat(15))
        );
    }

    #[test]
    fn diagnostic_tail_splits_carriage_returns() {
        let diagnostics = "ffmpeg version n7.0\nsize=1kB time=00:00:01.00\rsize=2kB time=00:00:02.00\r\n\
            a\nb\nc\nout.wav: Permission denied\n";
        assert_eq!(
            diagnostic_tail(diagnostics),
            ["size=2kB time=00:00:02.00", "a", "b", "c", "out.wav: Permission denied"]
        );
        assert!(diagnostic_tail("").is_empty());
    }
}
