pub mod chat_completion;
pub mod message_queue;
