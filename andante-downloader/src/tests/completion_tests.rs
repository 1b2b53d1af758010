use super::*;

const AUDIO: &[&str] = &["mp3", "flac"];

fn fast_watcher() -> CompletionWatcher {
    CompletionWatcher::new(Duration::from_millis(10))
}

#[test]
fn test_empty_then_partial_then_complete() {
    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_path_buf();

    let writer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        std::fs::write(dir_path.join("track.part"), b"partial").unwrap();
        std::thread::sleep(Duration::from_millis(40));
        std::fs::rename(dir_path.join("track.part"), dir_path.join("track.mp3")).unwrap();
    });

    let found = fast_watcher()
        .await_completion(dir.path(), AUDIO, Duration::from_secs(2))
        .unwrap();
    writer.join().unwrap();

    assert_eq!(found, dir.path().join("track.mp3"));
}

#[test]
fn test_times_out_when_never_recognized() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("track.part"), b"partial").unwrap();

    let result = fast_watcher().await_completion(dir.path(), AUDIO, Duration::from_millis(60));
    assert!(matches!(result, Err(DownloadError::Timeout(_))));
}

#[test]
fn test_times_out_on_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let result = fast_watcher().await_completion(dir.path(), AUDIO, Duration::from_millis(60));
    assert!(matches!(result, Err(DownloadError::Timeout(_))));
}

#[test]
fn test_newest_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("earlier.mp3"), b"a").unwrap();
    // Ensure a distinct timestamp for the later file.
    std::thread::sleep(Duration::from_millis(30));
    std::fs::write(dir.path().join("later.flac"), b"b").unwrap();

    let found = fast_watcher()
        .await_completion(dir.path(), AUDIO, Duration::from_secs(1))
        .unwrap();
    assert_eq!(found, dir.path().join("later.flac"));
}

#[test]
fn test_newest_partial_masks_older_complete() {
    // A fresh partial means the in-flight download isn't done, even though
    // an older finished file is still sitting in the directory.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("old.mp3"), b"a").unwrap();
    std::thread::sleep(Duration::from_millis(30));
    std::fs::write(dir.path().join("new.part"), b"b").unwrap();

    let result = fast_watcher().await_completion(dir.path(), AUDIO, Duration::from_millis(80));
    assert!(matches!(result, Err(DownloadError::Timeout(_))));
}

#[test]
fn test_ignores_hidden_files_and_directories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".DS_Store"), b"junk").unwrap();
    std::fs::create_dir(dir.path().join("subdir.mp3")).unwrap();

    let result = fast_watcher().await_completion(dir.path(), AUDIO, Duration::from_millis(60));
    assert!(matches!(result, Err(DownloadError::Timeout(_))));
}
