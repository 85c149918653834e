mod file_finder;

pub use file_finder::{image_extension, FileFinder, FileType, WalkError, IMAGE_EXTENSIONS};
