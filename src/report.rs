use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::pipeline::Finding;

/// Write all findings as CSV, overwriting anything at `path`.
pub fn write_csv(findings: &[Finding], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    writer
        .write_record(["Email", "Repo", "Commit"])
        .context("writing CSV header")?;

    for finding in findings {
        writer
            .write_record([&finding.email, &finding.source, &finding.commit])
            .context("writing CSV row")?;
    }

    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Occurrence count per unique email, most frequent first (ties alphabetical).
pub fn tally(findings: &[Finding]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for finding in findings {
        *counts.entry(&finding.email).or_default() += 1;
    }

    let mut tally: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(email, count)| (email.to_string(), count))
        .collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tally
}

pub fn print_summary(findings: &[Finding], path: &Path) {
    println!();
    println!("{}", "Unique emails and their counts:".bold());
    for (email, count) in tally(findings) {
        println!("  {:<40} {}", email, count.to_string().green());
    }

    println!();
    println!(
        "Full output with repository names and commit links saved to {}.",
        path.display().to_string().bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(email: &str, source: &str, commit: &str) -> Finding {
        Finding {
            email: email.to_string(),
            source: source.to_string(),
            commit: commit.to_string(),
        }
    }

    #[test]
    fn empty_run_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.csv");

        write_csv(&[], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Email,Repo,Commit\n");
        assert!(tally(&[]).is_empty());
    }

    #[test]
    fn rows_preserve_collection_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.csv");
        let findings = vec![
            finding("a@example.com", "widget", "https://x/commit/1"),
            finding("b@example.com", "event", "9000"),
        ];

        write_csv(&findings, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Email,Repo,Commit\n\
             a@example.com,widget,https://x/commit/1\n\
             b@example.com,event,9000\n"
        );
    }

    #[test]
    fn overwrites_a_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.csv");
        std::fs::write(&path, "stale data").unwrap();

        write_csv(&[finding("a@example.com", "widget", "c1")], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Email,Repo,Commit\n"));
        assert!(!contents.contains("stale"));
    }

    #[test]
    fn same_email_in_two_repos_counts_twice() {
        let findings = vec![
            finding("a@example.com", "widget", "c1"),
            finding("a@example.com", "gadget", "c2"),
            finding("b@example.com", "widget", "c3"),
        ];

        assert_eq!(
            tally(&findings),
            vec![
                ("a@example.com".to_string(), 2),
                ("b@example.com".to_string(), 1),
            ]
        );
    }
}
