pub mod prelude;

pub mod room_members;
pub mod rooms;
pub mod users;
