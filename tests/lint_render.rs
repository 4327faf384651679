//! Lint: a `[X]` key label drawn with `ClickableList::push` shows a button
//! nobody can tap. Labels like that must go through `push_clickable`.
//!
//! Scans every `render.rs` under `src/games/` plus `src/app.rs`.

use std::fs;
use std::path::{Path, PathBuf};

/// `[X]` where X is one printable key character.
fn contains_key_label(s: &str) -> bool {
    s.as_bytes().windows(3).any(|w| {
        w[0] == b'[' && w[2] == b']' && (w[1].is_ascii_alphanumeric() || w[1] == b' ' || w[1] == b'-')
    })
}

/// `(line number, trimmed line)` for every non-clickable push of a key label.
fn unclickable_labels(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let t = line.trim_start();
            !t.starts_with("//")
                && contains_key_label(line)
                && line.contains(".push(")
                && !line.contains("push_clickable(")
        })
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

fn render_sources(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.join("src/games")];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                pending.push(path);
            } else if path.file_name().is_some_and(|n| n == "render.rs") {
                found.push(path);
            }
        }
    }
    found.push(root.join("src/app.rs"));
    found
}

#[test]
fn key_labels_are_clickable() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let sources = render_sources(root);
    assert!(sources.len() >= 2, "no render sources found under {}", root.display());

    let mut report = String::new();
    for path in sources {
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, text) in unclickable_labels(&source) {
            report.push_str(&format!("  {}:{}: {}\n", path.display(), line, text));
        }
    }
    assert!(
        report.is_empty(),
        "key labels pushed without a click target (use push_clickable):\n{}",
        report
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_plain_push() {
        let source = r#"cl.push(Line::from(" [W] Save"));"#;
        assert_eq!(unclickable_labels(source).len(), 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [W] Save"), SAVE_PROGRESS);"#;
        assert!(unclickable_labels(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [Q] Menu"));"#;
        assert!(unclickable_labels(source).is_empty());
    }

    #[test]
    fn reports_line_numbers() {
        let source = "let a = 1;\ncl.push(Line::from(\"[1] BUY\"));\n";
        assert_eq!(unclickable_labels(source)[0].0, 2);
    }

    #[test]
    fn key_label_detection() {
        assert!(contains_key_label("[C]"));
        assert!(contains_key_label(" [4] "));
        assert!(!contains_key_label("[]"));
        assert!(!contains_key_label("[CLICK]"));
        assert!(!contains_key_label("plain"));
    }
}
