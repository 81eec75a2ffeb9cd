pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id;
pub mod image;
pub mod scene;
pub mod style;
pub mod text;

pub use config::EditorConfig;
pub use element::{Element, ElementKind, ElementType, Handle, TextAttrs};
pub use error::{ElementError, ImportError};
pub use event::{EventBus, SceneEvent};
pub use geometry::{Bounds, Point, Viewport};
pub use id::ElementId;
pub use image::{ImageCache, ImageStatus, MemoryImageCache};
pub use scene::{Scene, SceneSnapshot, Validation};
pub use style::{Color, FontSpec, TextAlign};
pub use text::{ApproxMeasure, TextMeasure, text_height, wrap_lines};
