pub mod room_repository;
pub mod user_repository;

pub use room_repository::RoomRepository;
pub use user_repository::UserRepository;
