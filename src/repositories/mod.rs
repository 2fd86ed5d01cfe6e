pub mod completion_openai_repository;
pub mod message_kafka_repository;
