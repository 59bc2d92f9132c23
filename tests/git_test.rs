use git2::{Oid, Repository, Signature};
use nuget_autoversion::domain::Version;
use nuget_autoversion::feed::MockFeed;
use nuget_autoversion::git::{Git2Repository, SourceControl};
use nuget_autoversion::resolver::{ResolveOptions, VersionResolver};
use nuget_autoversion::AutoversionError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Helper to commit a file change with the given message
fn commit(repo: &Repository, message: &str) -> Oid {
    let workdir = repo.workdir().expect("non-bare repository");
    let content_path = workdir.join("README.md");
    let previous = fs::read_to_string(&content_path).unwrap_or_default();
    fs::write(&content_path, format!("{}{}\n", previous, message)).expect("write file");

    let mut index = repo.index().expect("index");
    index.add_path(Path::new("README.md")).expect("add file");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");

    let signature = Signature::now("Test User", "test@example.com").expect("signature");
    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )
    .expect("commit")
}

fn setup_repo(messages: &[&str]) -> (TempDir, Repository, Vec<Oid>) {
    let dir = TempDir::new().expect("temp dir");
    let repo = Repository::init(dir.path()).expect("init repo");
    let oids = messages.iter().map(|m| commit(&repo, m)).collect();
    (dir, repo, oids)
}

/// Bare repository registered as `origin` of `repo`
fn add_bare_origin(repo: &Repository) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    Repository::init_bare(dir.path()).expect("init bare");
    repo.remote("origin", dir.path().to_str().expect("utf-8 path"))
        .expect("add remote");
    dir
}

#[test]
fn test_recent_commits_newest_first() {
    let (dir, _repo, oids) = setup_repo(&["first", "second", "third"]);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();

    let commits = git.recent_commits(10).unwrap();
    assert_eq!(commits.len(), 3);
    assert_eq!(commits[0].hash, oids[2].to_string());
    assert_eq!(commits[0].message, "third");
    assert_eq!(commits[2].message, "first");
}

#[test]
fn test_recent_commits_respects_limit() {
    let (dir, _repo, oids) = setup_repo(&["one", "two", "three", "four"]);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();

    let commits = git.recent_commits(2).unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[1].hash, oids[2].to_string());
}

#[test]
fn test_recent_commits_with_unbounded_limit() {
    let (dir, _repo, _) = setup_repo(&["one", "two"]);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();

    assert_eq!(git.recent_commits(usize::MAX).unwrap().len(), 2);
    assert_eq!(git.recent_commits(1_000_000_000).unwrap().len(), 2);
}

#[test]
fn test_commit_record_carries_summary_line() {
    let (dir, _repo, _) =
        setup_repo(&["Bump (#update package version to 2.0.0)\n\nLonger body text"]);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();

    let commits = git.recent_commits(1).unwrap();
    assert_eq!(commits[0].message, "Bump (#update package version to 2.0.0)");
}

#[test]
fn test_open_from_subdirectory() {
    let (dir, _repo, _) = setup_repo(&["first"]);
    let nested = dir.path().join("src").join("Project");
    fs::create_dir_all(&nested).unwrap();

    let git = Git2Repository::open(&nested, "origin", None).unwrap();
    assert_eq!(git.recent_commits(5).unwrap().len(), 1);
}

#[test]
fn test_marker_create_and_exists() {
    let (dir, repo, oids) = setup_repo(&["first", "second"]);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();
    let hash = oids[0].to_string();
    let marker = format!("processed-{}", hash);

    assert!(!git.marker_exists(&marker).unwrap());
    git.create_marker(&marker, &hash).unwrap();
    assert!(git.marker_exists(&marker).unwrap());

    // The tag points at the commit that carried the request, not HEAD
    let target = repo
        .find_reference(&format!("refs/tags/{}", marker))
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .id();
    assert_eq!(target, oids[0]);
}

#[test]
fn test_create_existing_marker_fails() {
    let (dir, _repo, oids) = setup_repo(&["first"]);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();
    let hash = oids[0].to_string();

    git.create_marker("processed-x", &hash).unwrap();
    assert!(matches!(
        git.create_marker("processed-x", &hash),
        Err(AutoversionError::MarkerWriteFailed(_))
    ));
}

#[test]
fn test_publish_marker_to_remote() {
    let (dir, repo, oids) = setup_repo(&["first"]);
    let origin = add_bare_origin(&repo);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();
    let hash = oids[0].to_string();
    let marker = format!("processed-{}", hash);

    git.create_marker(&marker, &hash).unwrap();
    git.publish_marker(&marker).unwrap();

    let remote = Repository::open_bare(origin.path()).unwrap();
    let pushed = remote
        .find_reference(&format!("refs/tags/{}", marker))
        .unwrap()
        .target()
        .unwrap();
    assert_eq!(pushed, oids[0]);
}

#[test]
fn test_publish_without_remote_fails_and_keeps_local_tag() {
    let (dir, _repo, oids) = setup_repo(&["first"]);
    let git = Git2Repository::open(dir.path(), "origin", None).unwrap();
    let hash = oids[0].to_string();

    git.create_marker("processed-x", &hash).unwrap();
    assert!(matches!(
        git.publish_marker("processed-x"),
        Err(AutoversionError::MarkerWriteFailed(_))
    ));
    assert!(git.marker_exists("processed-x").unwrap());
}

#[tokio::test]
async fn test_resolution_is_idempotent_across_fresh_handles() {
    let (dir, repo, oids) = setup_repo(&[
        "initial commit",
        "Prepare release (#update package version to 2.0.0)",
        "fix: typo",
    ]);
    let _origin = add_bare_origin(&repo);
    let feed = MockFeed::latest(Version::new(2, 0, 0));
    let options = ResolveOptions::new("Acme.Widgets");

    let first = {
        let git = Git2Repository::open(dir.path(), "origin", None).unwrap();
        VersionResolver::new(&git, &feed).resolve(&options).await.unwrap()
    };
    let second = {
        let git = Git2Repository::open(dir.path(), "origin", None).unwrap();
        VersionResolver::new(&git, &feed).resolve(&options).await.unwrap()
    };

    assert_eq!(first.version.to_string(), "2.0.0");
    assert_eq!(second.version.to_string(), "2.0.1");

    let marker = format!("processed-{}", oids[1]);
    assert!(repo
        .find_reference(&format!("refs/tags/{}", marker))
        .is_ok());
}
