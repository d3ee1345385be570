pub mod macros;
pub mod structs;

pub use structs::Behaviour;
pub use structs::Button;
pub use structs::Direction;
pub use structs::DoorState;
pub use structs::FloorIndicator;
pub use structs::ParseDirectionError;
pub use structs::Request;
