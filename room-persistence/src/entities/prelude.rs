pub use super::room_members::Entity as RoomMembers;
pub use super::rooms::Entity as Rooms;
pub use super::users::Entity as Users;
