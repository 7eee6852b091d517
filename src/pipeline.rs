use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::extract;
use crate::github::{Event, GitHub, Repo};

/// One validated email with its provenance: the repository name (or the
/// literal "event") and the commit URL (or event id) it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub email: String,
    pub source: String,
    pub commit: String,
}

/// Run the whole harvest for one username.
///
/// Repositories and events are fetched up front; a failure of either is fatal.
/// Each repository is then processed as an independent task behind a semaphore
/// capping in-flight work, and a failure inside one task only costs that
/// repository's findings. Events are scanned after every task has joined.
pub async fn harvest(
    github: Arc<GitHub>,
    username: &str,
    concurrency: usize,
) -> Result<Vec<Finding>> {
    let (repos, events) = tokio::try_join!(
        github.user_repos(username),
        github.user_events(username)
    )?;

    let gate = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for repo in repos {
        let github = Arc::clone(&github);
        let gate = Arc::clone(&gate);
        tasks.spawn(async move {
            let name = repo.name.clone();
            let result = async {
                let _permit = gate
                    .acquire_owned()
                    .await
                    .context("concurrency gate closed")?;
                harvest_repo(&github, &repo).await
            }
            .await;
            (name, result)
        });
    }

    let mut findings = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(found))) => findings.extend(found),
            Ok((name, Err(e))) => {
                eprintln!("{} skipping {name}: {e:#}", "warning:".yellow());
            }
            Err(e) => {
                eprintln!("{} repository task failed: {e}", "warning:".yellow());
            }
        }
    }

    findings.extend(scan_events(&events));
    Ok(findings)
}

/// List one repository's commits and pull emails out of each commit's patch.
/// Commits are fetched sequentially; only repositories run in parallel.
async fn harvest_repo(github: &GitHub, repo: &Repo) -> Result<Vec<Finding>> {
    let commits = github.repo_commits(&repo.owner.login, &repo.name).await?;

    let mut found = Vec::new();
    for commit in commits {
        let patch = github.commit_patch(&commit.html_url).await?;
        for email in extract::extract_emails(&patch) {
            println!("found {} in {}", email.green(), repo.name.bold());
            found.push(Finding {
                email,
                source: repo.name.clone(),
                commit: commit.html_url.clone(),
            });
        }
    }
    Ok(found)
}

/// Scan event payloads for commit author emails.
pub fn scan_events(events: &[Event]) -> Vec<Finding> {
    let mut found = Vec::new();
    for event in events {
        for commit in &event.payload.commits {
            let Some(email) = commit.author.as_ref().and_then(|a| a.email.as_deref()) else {
                continue;
            };
            if let Ok(email) = extract::normalize_email(email) {
                println!("found {} in event {}", email.green(), event.id.bold());
                found.push(Finding {
                    email,
                    source: "event".to_string(),
                    commit: event.id.clone(),
                });
            }
        }
    }
    found
}
