use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use andante_catalog::AlbumInfo;

use crate::pacing::PacingConfig;

#[derive(Default)]
struct Counters {
    opened: usize,
    selected: usize,
    triggered: usize,
    restarts: usize,
}

/// Scripted driver standing in for the browser-backed session.
struct StubDriver {
    counters: Rc<RefCell<Counters>>,
    challenge: bool,
    error_toast: bool,
    on_trigger: Box<dyn FnMut()>,
}

impl StubDriver {
    fn new(counters: Rc<RefCell<Counters>>) -> Self {
        Self {
            counters,
            challenge: false,
            error_toast: false,
            on_trigger: Box::new(|| {}),
        }
    }
}

impl SiteDriver for StubDriver {
    fn open_item_page(&mut self, _track: &Track) -> Result<(), DownloadError> {
        self.counters.borrow_mut().opened += 1;
        Ok(())
    }

    fn select_format(&mut self, _format: AudioFormat) -> Result<(), DownloadError> {
        self.counters.borrow_mut().selected += 1;
        Ok(())
    }

    fn challenge_present(&mut self) -> Result<bool, DownloadError> {
        Ok(self.challenge)
    }

    fn clear_challenge(&mut self) -> Result<ChallengeOutcome, DownloadError> {
        self.challenge = false;
        Ok(ChallengeOutcome::Solved)
    }

    fn trigger_download(&mut self) -> Result<ClickOutcome, DownloadError> {
        self.counters.borrow_mut().triggered += 1;
        (self.on_trigger)();
        Ok(ClickOutcome::Clicked)
    }

    fn error_indicator_present(&mut self) -> Result<bool, DownloadError> {
        Ok(self.error_toast)
    }

    fn restart(&mut self) -> Result<(), DownloadError> {
        self.counters.borrow_mut().restarts += 1;
        Ok(())
    }
}

fn test_track(title: &str) -> Track {
    Track {
        id: 1,
        title: title.to_string(),
        isrc: None,
        position: 1,
        disc_number: 1,
        artist_name: "Artist".to_string(),
        contributor_names: vec!["Artist".to_string()],
        album: AlbumInfo {
            id: 1,
            title: "Album".to_string(),
            artist_name: "Artist".to_string(),
            label: None,
            release_date: None,
            total_tracks: 1,
            total_discs: 1,
            genres: Vec::new(),
            artwork_url: None,
        },
    }
}

fn fast_pacer() -> Pacer {
    Pacer::new(PacingConfig {
        reset_interval: Duration::from_secs(60),
        short_wait: (Duration::from_millis(1), Duration::from_millis(2)),
        extended_wait: (Duration::from_millis(2), Duration::from_millis(3)),
        long_wait: (Duration::from_millis(5), Duration::from_millis(10)),
        extended_chance: 0.1,
    })
}

struct Fixture {
    counters: Rc<RefCell<Counters>>,
    scratch: tempfile::TempDir,
    dest_root: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            counters: Rc::new(RefCell::new(Counters::default())),
            scratch: tempfile::tempdir().unwrap(),
            dest_root: tempfile::tempdir().unwrap(),
        }
    }

    fn orchestrator(&self, driver: StubDriver) -> Orchestrator<StubDriver> {
        Orchestrator::new(
            driver,
            fast_pacer(),
            self.scratch.path().to_path_buf(),
            self.dest_root.path().to_path_buf(),
        )
        .with_watcher(CompletionWatcher::new(Duration::from_millis(10)))
        .with_completion_deadline(Duration::from_millis(200))
    }

    fn task(&self, title: &str) -> DownloadTask {
        DownloadTask {
            track: test_track(title),
            format: AudioFormat::Mp3_320,
            playlist: None,
        }
    }
}

#[test]
fn test_existing_destination_short_circuits() {
    let fx = Fixture::new();
    let task = fx.task("Song");
    let dest = paths::destination_path(
        fx.dest_root.path(),
        &task.track,
        task.format,
        None,
    );
    std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
    std::fs::write(&dest, b"already here").unwrap();

    let driver = StubDriver::new(fx.counters.clone());
    let mut orch = fx.orchestrator(driver);
    let outcome = orch.download(&task).unwrap();

    assert_eq!(outcome, DownloadOutcome::AlreadyPresent(dest));
    let counters = fx.counters.borrow();
    assert_eq!(counters.opened, 0);
    assert_eq!(counters.selected, 0);
    assert_eq!(counters.triggered, 0);
}

#[test]
fn test_download_moves_file_to_destination() {
    let fx = Fixture::new();
    let task = fx.task("Song");

    let scratch = fx.scratch.path().to_path_buf();
    let mut driver = StubDriver::new(fx.counters.clone());
    driver.on_trigger = Box::new(move || {
        std::fs::write(scratch.join("Song.mp3"), b"audio").unwrap();
    });

    let mut orch = fx.orchestrator(driver);
    let outcome = orch.download(&task).unwrap();

    let expected = fx
        .dest_root
        .path()
        .join("Artist/Album/1-01 Artist - Song.mp3");
    assert_eq!(outcome, DownloadOutcome::Downloaded(expected.clone()));
    assert!(expected.is_file());
    // Fully resolved: nothing left behind for the next item's scan.
    assert_eq!(std::fs::read_dir(fx.scratch.path()).unwrap().count(), 0);
    assert_eq!(fx.counters.borrow().restarts, 0);
}

#[test]
fn test_challenge_is_cleared_before_trigger() {
    let fx = Fixture::new();
    let task = fx.task("Song");

    let scratch = fx.scratch.path().to_path_buf();
    let mut driver = StubDriver::new(fx.counters.clone());
    driver.challenge = true;
    driver.on_trigger = Box::new(move || {
        std::fs::write(scratch.join("Song.mp3"), b"audio").unwrap();
    });

    let mut orch = fx.orchestrator(driver);
    assert!(matches!(
        orch.download(&task),
        Ok(DownloadOutcome::Downloaded(_))
    ));
}

#[test]
fn test_timeout_restarts_session_and_sweeps_scratch() {
    let fx = Fixture::new();
    let task = fx.task("Song");

    // The download never finalizes: only a browser partial shows up.
    let scratch = fx.scratch.path().to_path_buf();
    let mut driver = StubDriver::new(fx.counters.clone());
    driver.on_trigger = Box::new(move || {
        std::fs::write(scratch.join("Song.part"), b"partial").unwrap();
    });

    let mut orch = fx.orchestrator(driver);
    let result = orch.download(&task);

    assert!(matches!(result, Err(DownloadError::Timeout(_))));
    assert_eq!(fx.counters.borrow().restarts, 1);
    assert_eq!(std::fs::read_dir(fx.scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_server_error_is_item_scoped() {
    let fx = Fixture::new();
    let task = fx.task("Song");

    let mut driver = StubDriver::new(fx.counters.clone());
    driver.error_toast = true;

    let mut orch = fx.orchestrator(driver);
    let result = orch.download(&task);

    assert!(matches!(result, Err(DownloadError::ServerError)));
    // Only the timeout path restarts the session.
    assert_eq!(fx.counters.borrow().restarts, 0);
}

#[test]
fn test_batch_continues_past_failures() {
    let fx = Fixture::new();

    let scratch = fx.scratch.path().to_path_buf();
    let calls = Rc::new(RefCell::new(0usize));
    let calls_inner = calls.clone();
    let mut driver = StubDriver::new(fx.counters.clone());
    // First item never completes; the second one does.
    driver.on_trigger = Box::new(move || {
        let mut count = calls_inner.borrow_mut();
        *count += 1;
        if *count > 1 {
            std::fs::write(scratch.join("Second.mp3"), b"audio").unwrap();
        }
    });

    let mut orch = fx.orchestrator(driver);
    let tasks: VecDeque<DownloadTask> = [fx.task("First"), fx.task("Second")].into();
    let report = orch.run_batch(tasks, |_, _| Ok(()));

    let summary = report.summary();
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.total(), 2);
}

#[test]
fn test_batch_records_tagging_failures_per_file() {
    let fx = Fixture::new();

    let scratch = fx.scratch.path().to_path_buf();
    let mut driver = StubDriver::new(fx.counters.clone());
    driver.on_trigger = Box::new(move || {
        std::fs::write(scratch.join("Song.mp3"), b"audio").unwrap();
    });

    let mut orch = fx.orchestrator(driver);
    let tasks: VecDeque<DownloadTask> = [fx.task("Song")].into();
    let report = orch.run_batch(tasks, |_, _| Err("corrupt header".into()));

    let summary = report.summary();
    assert_eq!(summary.tag_failures, 1);
    assert_eq!(summary.completed, 0);
}
