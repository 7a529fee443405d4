//! HTTP API handlers for mentor-chat

pub mod conversations;
pub mod generate;
pub mod health;
pub mod interests;
pub mod messages;
pub mod progress;

pub use conversations::conversation_routes;
pub use generate::generate_routes;
pub use health::health_routes;
pub use interests::interest_routes;
pub use messages::message_routes;
pub use progress::progress_routes;
