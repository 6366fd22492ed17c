pub mod errors;
pub mod messages;
pub mod room;
pub mod user;

// Re-export all types
pub use errors::*;
pub use messages::*;
pub use room::*;
pub use user::*;

pub type UserId = i32;
pub type RoomId = i32;
pub type LiveId = i32;
