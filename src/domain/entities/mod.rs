pub mod analysis;
pub mod inbound_message;
pub mod outbound_message;
pub mod transcript;
