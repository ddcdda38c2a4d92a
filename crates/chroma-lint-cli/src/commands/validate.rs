//! Validate command implementation.

use anyhow::{Context, Result};
use chroma_lint_core::RootDirectories;
use std::path::Path;

/// Runs the validate command.
pub fn run(path: &Path) -> Result<()> {
    std::fs::read_dir(path)
        .with_context(|| format!("Cannot read project directory {}", path.display()))?;

    let issues = RootDirectories::existing_discouraged(path);
    if issues.is_empty() {
        println!("No issues found.");
        return Ok(());
    }

    tracing::debug!("{} discouraged directories", issues.len());
    println!("The following issues were found:\n");
    print!("{}", render_table(&issues));
    std::process::exit(1);
}

/// Renders `(directory, advice)` rows as a bordered two-column table.
fn render_table(rows: &[(&str, &str)]) -> String {
    const HEADERS: (&str, &str) = ("Directory", "Comment");

    let dir_width = rows
        .iter()
        .map(|(dir, _)| dir.len())
        .chain(std::iter::once(HEADERS.0.len()))
        .max()
        .unwrap_or_default();
    let comment_width = rows
        .iter()
        .map(|(_, comment)| comment.len())
        .chain(std::iter::once(HEADERS.1.len()))
        .max()
        .unwrap_or_default();

    let border = format!(
        "+{}+{}+\n",
        "-".repeat(dir_width + 2),
        "-".repeat(comment_width + 2)
    );
    let row = |dir: &str, comment: &str| {
        format!("| {dir:<dir_width$} | {comment:<comment_width$} |\n")
    };

    let mut out = border.clone();
    out.push_str(&row(HEADERS.0, HEADERS.1));
    out.push_str(&border);
    for &(dir, comment) in rows {
        out.push_str(&row(dir, comment));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let table = render_table(&[
            ("app", "Use `src`."),
            ("public_html", "Use `public`."),
        ]);
        assert_eq!(
            table,
            "+-------------+---------------+\n\
             | Directory   | Comment       |\n\
             +-------------+---------------+\n\
             | app         | Use `src`.    |\n\
             | public_html | Use `public`. |\n\
             +-------------+---------------+\n"
        );
    }

    #[test]
    fn catalogue_rows_found_on_disk() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("app/views")).expect("mkdir");

        let issues = RootDirectories::existing_discouraged(tmp.path());
        let dirs: Vec<_> = issues.iter().map(|(dir, _)| *dir).collect();
        assert_eq!(dirs, vec!["app", "app/views"]);
        assert!(render_table(&issues).contains("| app/views "));
    }
}
