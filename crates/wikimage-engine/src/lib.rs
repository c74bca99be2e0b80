pub mod io;
pub mod models;
pub mod rewrite;
pub mod walker;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use models::{link::*, options::*, result::*};
pub use rewrite::{rewrite_link, rewrite_text};
pub use io::IoError;
pub use walker::{
    ConsoleReporter, ConversionSummary, FileOutcome, Reporter, RewrittenFile, convert_directory,
    convert_file,
};
