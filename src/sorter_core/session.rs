use crate::sorter_core::category::CategoryRegistry;
use crate::sorter_core::error::{Result, SorterError};
use crate::sorter_core::media::list_images;
use crate::sorter_core::mover::{MoveMethod, move_into};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Complete,
}

/// Result of a successful classification.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub slot: u8,
    pub label: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub method: MoveMethod,
}

/// Counters for the end-of-session summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub moved: usize,
    pub skipped: usize,
    pub missing: usize,
}

impl SessionStats {
    /// Photos not yet moved, skipped or found missing.
    pub fn remaining(&self) -> usize {
        self.total - self.moved - self.skipped - self.missing
    }
}

impl std::fmt::Display for SessionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} moved, {} skipped, {} missing ({} of {} left)",
            self.moved,
            self.skipped,
            self.missing,
            self.remaining(),
            self.total
        )
    }
}

/// One pass over a fixed list of photos.
///
/// The cursor only moves forward: each queued path is moved, skipped or
/// found missing exactly once, and the session is complete when the cursor
/// reaches the end of the queue.
#[derive(Debug)]
pub struct SortingSession {
    queue: Vec<PathBuf>,
    cursor: usize,
    registry: Rc<CategoryRegistry>,
    stats: SessionStats,
}

impl SortingSession {
    pub fn new(queue: Vec<PathBuf>, registry: Rc<CategoryRegistry>) -> Self {
        let stats = SessionStats {
            total: queue.len(),
            ..Default::default()
        };
        SortingSession {
            queue,
            cursor: 0,
            registry,
            stats,
        }
    }

    /// Start a session over the images currently in `source_dir`.
    pub fn open(source_dir: &Path, registry: Rc<CategoryRegistry>) -> Result<Self> {
        let queue = list_images(source_dir)?;
        log::info!(
            "Opened session on {} with {} photos and {} categories",
            source_dir.display(),
            queue.len(),
            registry.size()
        );
        Ok(Self::new(queue, registry))
    }

    pub fn state(&self) -> SessionState {
        if self.cursor < self.queue.len() {
            SessionState::Active
        } else {
            SessionState::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    /// The photo awaiting a decision, or `None` once the session is complete.
    pub fn current_image(&self) -> Option<&Path> {
        self.queue.get(self.cursor).map(PathBuf::as_path)
    }

    /// Move the current photo into the folder of `slot` and advance.
    ///
    /// `NotConfigured`, `DestinationConflict` and `MoveFailed` leave the
    /// cursor where it is. `FileMissing` advances past the vanished file.
    pub fn classify(&mut self, slot: u8) -> Result<MoveOutcome> {
        let source = self
            .current_image()
            .ok_or(SorterError::SessionComplete)?
            .to_path_buf();
        let registry = Rc::clone(&self.registry);
        let category = registry.lookup(slot)?;

        match move_into(&source, &category.destination) {
            Ok((destination, method)) => {
                log::info!(
                    "Moved {} to {} ({})",
                    source.display(),
                    destination.display(),
                    category.label
                );
                self.stats.moved += 1;
                self.advance();
                Ok(MoveOutcome {
                    slot,
                    label: category.label.clone(),
                    source,
                    destination,
                    method,
                })
            }
            Err(SorterError::FileMissing(path)) => {
                log::info!("{} disappeared before it could be sorted", path.display());
                self.stats.missing += 1;
                self.advance();
                Err(SorterError::FileMissing(path))
            }
            Err(e) => {
                log::info!("Could not sort {} into slot {}: {}", source.display(), slot, e);
                Err(e)
            }
        }
    }

    /// Leave the current photo in place and advance.
    pub fn skip(&mut self) -> Result<()> {
        let source = self.current_image().ok_or(SorterError::SessionComplete)?;
        log::info!("Skipped {}", source.display());
        self.stats.skipped += 1;
        self.advance();
        Ok(())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    fn advance(&mut self) {
        debug_assert!(self.cursor < self.queue.len());
        self.cursor += 1;
        if self.is_complete() {
            log::info!("Session complete: {}", self.stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use std::fs;

    struct Fixture {
        temp: TempDir,
        registry: Rc<CategoryRegistry>,
    }

    /// Source folder with the given files, and slot 1 -> `dest1`.
    fn fixture(files: &[&str]) -> Fixture {
        let temp = TempDir::new().unwrap();
        for name in files {
            temp.child("source").child(name).write_str(name).unwrap();
        }
        temp.child("source").create_dir_all().unwrap();
        temp.child("dest1").create_dir_all().unwrap();

        let mut registry = CategoryRegistry::new();
        registry.register(1, "Keep", temp.child("dest1").path()).unwrap();

        Fixture {
            temp,
            registry: Rc::new(registry),
        }
    }

    fn open(fx: &Fixture) -> SortingSession {
        SortingSession::open(fx.temp.child("source").path(), Rc::clone(&fx.registry)).unwrap()
    }

    #[test]
    fn test_classify_all_to_one_category() {
        let fx = fixture(&["a.jpg", "b.png"]);
        let mut session = open(&fx);
        assert_eq!(session.state(), SessionState::Active);

        let first = session.classify(1).unwrap();
        assert_eq!(first.destination.file_name().unwrap(), "a.jpg");
        assert_eq!(first.label, "Keep");
        session.classify(1).unwrap();

        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.current_image(), None);
        let dest = fx.temp.child("dest1");
        assert_eq!(fs::read_to_string(dest.child("a.jpg").path()).unwrap(), "a.jpg");
        assert_eq!(fs::read_to_string(dest.child("b.png").path()).unwrap(), "b.png");
        assert!(!fx.temp.child("source/a.jpg").path().exists());
        assert!(!fx.temp.child("source/b.png").path().exists());
        assert_eq!(session.stats().moved, 2);
    }

    #[test]
    fn test_classify_unconfigured_slot() {
        let fx = fixture(&["a.jpg"]);
        let mut session = SortingSession::open(
            fx.temp.child("source").path(),
            Rc::new(CategoryRegistry::new()),
        )
        .unwrap();

        let err = session.classify(1).unwrap_err();

        assert!(matches!(err, SorterError::NotConfigured(1)));
        assert_eq!(session.cursor(), 0);
        assert_eq!(
            session.current_image().unwrap().file_name().unwrap(),
            "a.jpg"
        );
    }

    #[test]
    fn test_classify_destination_conflict() {
        let fx = fixture(&["a.jpg"]);
        fx.temp.child("dest1/a.jpg").write_str("older").unwrap();
        let mut session = open(&fx);

        let err = session.classify(1).unwrap_err();

        assert!(matches!(err, SorterError::DestinationConflict(_)));
        assert_eq!(session.cursor(), 0);
        assert!(fx.temp.child("source/a.jpg").path().exists());
        assert_eq!(
            fs::read_to_string(fx.temp.child("dest1/a.jpg").path()).unwrap(),
            "older"
        );
    }

    #[test]
    fn test_classify_move_failed_keeps_cursor() {
        let fx = fixture(&["a.jpg"]);
        let dest = fx.temp.child("dest1");
        fs::remove_dir(dest.path()).unwrap();
        dest.write_str("a file where the folder was").unwrap();
        let mut session = open(&fx);

        let err = session.classify(1).unwrap_err();

        assert!(matches!(err, SorterError::MoveFailed { .. }), "{err}");
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.state(), SessionState::Active);
        assert!(fx.temp.child("source/a.jpg").path().exists());
        assert_eq!(session.stats().moved, 0);
    }

    #[test]
    fn test_classify_missing_file_advances() {
        let fx = fixture(&["a.jpg"]);
        let mut session = open(&fx);
        fs::remove_file(fx.temp.child("source/a.jpg").path()).unwrap();

        let err = session.classify(1).unwrap_err();

        assert!(matches!(err, SorterError::FileMissing(_)));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.stats().missing, 1);
    }

    #[test]
    fn test_not_configured_checked_before_missing() {
        let fx = fixture(&["a.jpg"]);
        let mut session = open(&fx);
        fs::remove_file(fx.temp.child("source/a.jpg").path()).unwrap();

        assert!(matches!(session.classify(2), Err(SorterError::NotConfigured(2))));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_skip_leaves_file_in_place() {
        let fx = fixture(&["a.jpg", "b.jpg"]);
        let mut session = open(&fx);

        session.skip().unwrap();

        assert_eq!(session.cursor(), 1);
        assert!(fx.temp.child("source/a.jpg").path().exists());
        assert_eq!(
            session.current_image().unwrap().file_name().unwrap(),
            "b.jpg"
        );
        assert_eq!(session.stats().skipped, 1);
    }

    #[test]
    fn test_complete_session_rejects_actions() {
        let fx = fixture(&["a.jpg"]);
        let mut session = open(&fx);
        session.skip().unwrap();

        assert!(matches!(session.skip(), Err(SorterError::SessionComplete)));
        assert!(matches!(session.classify(1), Err(SorterError::SessionComplete)));
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_empty_queue_starts_complete() {
        let fx = fixture(&[]);
        let session = open(&fx);
        assert!(session.is_empty());
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.current_image(), None);
    }

    #[test]
    fn test_current_image_is_idempotent() {
        let fx = fixture(&["a.jpg", "b.jpg"]);
        let session = open(&fx);
        let first = session.current_image().map(Path::to_path_buf);
        assert_eq!(session.current_image().map(Path::to_path_buf), first);
        assert_eq!(session.current_image().map(Path::to_path_buf), first);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_snapshot_ignores_new_files() {
        let fx = fixture(&["a.jpg"]);
        let mut session = open(&fx);
        fx.temp.child("source/z.jpg").write_str("late").unwrap();

        session.skip().unwrap();

        assert!(session.is_complete());
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_cursor_monotonic_and_reaches_end() {
        let fx = fixture(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        fx.temp.child("dest1/c.jpg").write_str("taken").unwrap();
        let mut session = open(&fx);
        let mut cursors = vec![session.cursor()];
        let mut advancing = 0;

        // a: moved, b: unconfigured then skipped, c: conflict then skipped, d: moved
        for action in ["1", "5", "s", "1", "s", "1"] {
            let ok = match action {
                "s" => session.skip().is_ok(),
                slot => session.classify(slot.parse().unwrap()).is_ok(),
            };
            if ok {
                advancing += 1;
            }
            cursors.push(session.cursor());
        }

        assert!(cursors.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cursors, vec![0, 1, 1, 2, 2, 3, 4]);
        assert_eq!(advancing, 4);
        assert_eq!(session.cursor(), session.len());
        assert_eq!(session.remaining(), 0);
        assert_eq!(
            session.stats(),
            SessionStats {
                total: 4,
                moved: 2,
                skipped: 2,
                missing: 0
            }
        );
        assert_eq!(session.stats().remaining(), 0);
    }
}
