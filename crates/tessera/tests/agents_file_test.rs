//! Reading and writing the agents file.

use chrono::{Duration, Utc};
use tessera::{
    Agent, Credentials, StorageErrorKind, TesseraErrorKind, load_agents, save_agents,
};

fn agent(id: &str) -> Agent {
    Agent::builder()
        .id(id)
        .name("Mei")
        .credentials(Credentials::new("tok", "ref", Utc::now() + Duration::hours(1)))
        .shades(vec!["tea".to_string()])
        .credits(3u32)
        .build()
        .unwrap()
}

#[test]
fn test_missing_file_is_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(load_agents(&dir.path().join("agents.json"))?.is_empty());
    Ok(())
}

#[test]
fn test_saved_agents_load_back() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("agents.json");
    let agents = vec![agent("mei"), agent("ana")];

    save_agents(&path, &agents)?;

    assert_eq!(load_agents(&path)?, agents);
    Ok(())
}

#[test]
fn test_unreadable_file_is_a_file_io_error() -> anyhow::Result<()> {
    // A directory exists but cannot be read as a file.
    let dir = tempfile::tempdir()?;
    let err = load_agents(dir.path()).unwrap_err();
    match err.kind() {
        TesseraErrorKind::Storage(e) => match &e.kind {
            StorageErrorKind::FileIo { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("unexpected storage error: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn test_unwritable_path_is_a_file_io_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing").join("agents.json");
    let err = save_agents(&path, &[agent("mei")]).unwrap_err();
    assert!(matches!(
        err.kind(),
        TesseraErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::FileIo { .. })
    ));
    Ok(())
}

#[test]
fn test_malformed_content_is_a_json_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("agents.json");
    std::fs::write(&path, "{ not agents")?;
    let err = load_agents(&path).unwrap_err();
    assert!(matches!(err.kind(), TesseraErrorKind::Json(_)));
    Ok(())
}
