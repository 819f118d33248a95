//! Controller layer: the list and detail state transitions over the task store.
//!
//! Controllers borrow the store per call and never cache task fields beyond the
//! snapshot the list last rendered.

pub mod detail;
pub mod list;

pub use detail::DetailController;
pub use list::{ListController, ListPresentation};
