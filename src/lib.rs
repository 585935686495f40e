#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod freehand;
pub mod input;
pub mod panels;
pub mod pressure;
pub mod raster;
pub mod rubric;
pub mod snapshot;
pub mod store;
pub mod util;

pub use app::NotesApp;
pub use canvas::{CanvasConfig, NoteCanvas, SaveCallback, Tool};
pub use freehand::{InputPoint, OutlinePoint, StrokeOptions, compute_stroke, stroke_to_path_data};
pub use input::{PointerDevice, PointerEvent, PointerPhase, PointerTranslator};
pub use pressure::PressureSource;
pub use raster::RasterBuffer;
pub use snapshot::SnapshotError;
pub use store::{IndicatorNote, NoteStore};
