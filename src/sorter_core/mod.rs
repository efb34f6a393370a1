pub mod app;
pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod mover;
pub mod preview;
pub mod session;
pub mod terminal;

pub use app::{AppContext, Notice, PhotoView, Render, View};
pub use category::{Category, CategoryRegistry};
pub use cli::{CategoryArgs, CategorySpec, Cli, Commands};
pub use config::{CategoryEntry, SorterConfig};
pub use error::{Result, SorterError};
pub use media::list_images;
pub use mover::{MoveMethod, move_into};
pub use preview::{MetadataPreview, Preview, PreviewDecoder, RasterPreview};
pub use session::{MoveOutcome, SessionState, SessionStats, SortingSession};
