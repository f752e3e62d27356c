pub mod category;

pub use category::{Category, CategoryRequest, NewCategory, DEFAULT_COLOR, DEFAULT_ICON};
