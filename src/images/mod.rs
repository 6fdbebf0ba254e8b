mod loader;
mod resolver;
mod store;

pub use resolver::{ImageKind, ImageResolver, DEFAULT_ORIGIN};
pub use store::{ImageDirs, ImageStore};
