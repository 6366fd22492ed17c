pub mod admission;
pub mod lifecycle;
pub mod results;

// Re-export main components
pub use admission::*;
pub use lifecycle::*;
pub use results::*;
