use crate::sorter_core::category::CategoryRegistry;
use crate::sorter_core::error::{Result, SorterError};
use crate::sorter_core::preview::{Preview, PreviewDecoder};
use crate::sorter_core::session::{SessionStats, SortingSession};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Feedback about the action that produced a render.
#[derive(Debug)]
pub enum Notice {
    Moved {
        file: PathBuf,
        label: String,
        destination: PathBuf,
    },
    Skipped(PathBuf),
    /// The photo vanished from disk and was passed over.
    MissingSkipped(PathBuf),
    Error(SorterError),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Moved {
                file,
                label,
                destination,
            } => write!(
                f,
                "Moved {} to {} ({})",
                file_name(file),
                label,
                destination.display()
            ),
            Notice::Skipped(file) => write!(f, "Skipped {}", file_name(file)),
            Notice::MissingSkipped(file) => {
                write!(f, "{} no longer exists, moving on", file_name(file))
            }
            Notice::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

/// The photo under the cursor.
#[derive(Debug)]
pub struct PhotoView {
    pub path: PathBuf,
    /// 1-based position in the queue.
    pub position: usize,
    pub total: usize,
    pub preview: Result<Preview>,
}

#[derive(Debug)]
pub enum View {
    Photo(PhotoView),
    Finished(SessionStats),
    NoSession,
}

/// What the front end should show after handling an event.
#[derive(Debug)]
pub struct Render {
    pub notice: Option<Notice>,
    pub view: View,
}

/// Everything one run of the program works on: the categories, the session
/// over the chosen folder and the decoder used for previews.
pub struct AppContext {
    registry: Rc<CategoryRegistry>,
    session: Option<SortingSession>,
    decoder: Box<dyn PreviewDecoder>,
}

impl AppContext {
    pub fn new(registry: CategoryRegistry, decoder: Box<dyn PreviewDecoder>) -> Self {
        AppContext {
            registry: Rc::new(registry),
            session: None,
            decoder,
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn session(&self) -> Option<&SortingSession> {
        self.session.as_ref()
    }

    /// Start a new session on `source_dir`, discarding any current one.
    pub fn open_folder(&mut self, source_dir: &Path) -> Result<Render> {
        let session = SortingSession::open(source_dir, Rc::clone(&self.registry))?;
        if let Some(previous) = self.session.replace(session) {
            log::info!("Discarded previous session ({})", previous.stats());
        }
        Ok(self.render())
    }

    /// Handle a digit key or category button.
    pub fn on_key(&mut self, slot: u8) -> Render {
        let Some(session) = self.session.as_mut() else {
            return self.render();
        };

        let notice = match session.classify(slot) {
            Ok(outcome) => Notice::Moved {
                file: outcome.source,
                label: outcome.label,
                destination: outcome.destination,
            },
            Err(SorterError::FileMissing(path)) => Notice::MissingSkipped(path),
            Err(e) => Notice::Error(e),
        };
        self.render_with(Some(notice))
    }

    /// Handle the skip key.
    pub fn on_skip(&mut self) -> Render {
        let Some(session) = self.session.as_mut() else {
            return self.render();
        };

        let file = session.current_image().map(Path::to_path_buf);
        let notice = match (session.skip(), file) {
            (Ok(()), Some(file)) => Notice::Skipped(file),
            (Ok(()), None) => Notice::Error(SorterError::SessionComplete),
            (Err(e), _) => Notice::Error(e),
        };
        self.render_with(Some(notice))
    }

    /// Describe the current state without changing it.
    pub fn render(&self) -> Render {
        self.render_with(None)
    }

    fn render_with(&self, notice: Option<Notice>) -> Render {
        let view = match &self.session {
            None => View::NoSession,
            Some(session) => match session.current_image() {
                None => View::Finished(session.stats()),
                Some(path) => View::Photo(PhotoView {
                    path: path.to_path_buf(),
                    position: session.cursor() + 1,
                    total: session.len(),
                    preview: self.decoder.describe(path),
                }),
            },
        };
        Render { notice, view }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
