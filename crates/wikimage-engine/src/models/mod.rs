pub mod link;
pub mod options;
pub mod result;

pub use link::*;
pub use options::*;
pub use result::*;
