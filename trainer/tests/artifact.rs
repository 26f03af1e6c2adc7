use proto::Artifact;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use trainer::{
    load_best, save_best, ArtifactLoadError, ArtifactSaveError, PolicyNet, POLICY_KIND,
};

fn net(seed: u64) -> PolicyNet {
    PolicyNet::random(&mut StdRng::seed_from_u64(seed), Some(5))
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("best.pong");
    let policy = net(1);

    save_best(&path, &policy).expect("save succeeds");
    let loaded = load_best(&path).expect("load succeeds");

    assert_eq!(loaded, policy);
}

#[test]
fn test_save_overwrites_previous_artifact() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("models").join("best.pong");

    save_best(&path, &net(1)).expect("first save");
    save_best(&path, &net(2)).expect("second save");

    assert_eq!(load_best(&path).expect("load succeeds"), net(2));
    let entries: Vec<_> = std::fs::read_dir(path.parent().expect("has parent"))
        .expect("read dir")
        .collect();
    assert_eq!(entries.len(), 1, "Temp file must not linger");
}

#[test]
fn test_missing_artifact() {
    let dir = tempdir().expect("temp dir");
    let err = load_best(&dir.path().join("nope.pong")).unwrap_err();
    assert!(matches!(err, ArtifactLoadError::Missing(_)));
}

#[test]
fn test_corrupt_artifact() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("best.pong");

    std::fs::write(&path, b"definitely not a model").expect("write");
    assert!(matches!(
        load_best(&path).unwrap_err(),
        ArtifactLoadError::Corrupt { .. }
    ));

    let bytes = Artifact::new(POLICY_KIND, vec![0xff; 3])
        .to_bytes()
        .expect("encode");
    std::fs::write(&path, bytes).expect("write");
    assert!(matches!(
        load_best(&path).unwrap_err(),
        ArtifactLoadError::Corrupt { .. }
    ));
}

#[test]
fn test_wrong_kind_and_version() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("best.pong");
    let payload = postcard::to_allocvec(&net(3)).expect("encode policy");

    let bytes = Artifact::new("replay", payload.clone())
        .to_bytes()
        .expect("encode");
    std::fs::write(&path, bytes).expect("write");
    assert!(matches!(
        load_best(&path).unwrap_err(),
        ArtifactLoadError::WrongKind { found } if found == "replay"
    ));

    let mut future = Artifact::new(POLICY_KIND, payload);
    future.version = 99;
    std::fs::write(&path, future.to_bytes().expect("encode")).expect("write");
    assert!(matches!(
        load_best(&path).unwrap_err(),
        ArtifactLoadError::UnsupportedVersion { found: 99 }
    ));
}

#[test]
fn test_failed_rename_leaves_no_temp_file() {
    let dir = tempdir().expect("temp dir");
    // A directory in the target's place makes the final rename fail
    let path = dir.path().join("best.pong");
    std::fs::create_dir(&path).expect("create dir");
    std::fs::write(path.join("keep"), b"x").expect("write");

    let err = save_best(&path, &net(4)).unwrap_err();

    assert!(matches!(err, ArtifactSaveError::Io { .. }));
    assert!(!dir.path().join(".best.pong.tmp").exists());
}
