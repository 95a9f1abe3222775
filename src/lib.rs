#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id_generator;
pub mod import;
pub mod input;
pub mod notebook;
pub mod page;
pub mod persistence;
pub mod quiz;
pub mod renderer;
pub mod selection;
pub mod session;
pub mod smart_tape;
pub mod state;
pub mod stroke;
pub mod tape;
pub mod texture_manager;
pub mod tools;

pub use app::TapeNoteApp;
pub use command::Command;
pub use error::{SessionError, SessionResult};
pub use event::{EditorEvent, EventBus, EventHandler, EventLog};
pub use import::{ImportError, ImportSource, Outcome, RequestQueue, Resolution};
pub use notebook::{Library, Notebook, NotebookId, PageRef};
pub use page::{Background, BackgroundImage, Orientation, Page, PageId};
pub use quiz::{QuizProgress, QuizTracker};
pub use renderer::Renderer;
pub use selection::Selection;
pub use session::CanvasSession;
pub use state::GestureState;
pub use stroke::{MutableStroke, Stroke, StrokeId, StrokeTool};
pub use tape::{TapeColor, TapeGeometry, TapeId, TapeStrip, TapeTransform};
pub use tools::{ToolKind, ToolSettings};
