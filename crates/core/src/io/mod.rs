//! I/O operations for reading and writing LayerKit project files

mod project_file;

pub use project_file::{project_from_str, project_to_string, read_project, write_project};
