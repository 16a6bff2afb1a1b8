//! Repository Implementations
//!
//! In-memory implementation of the domain `MessageRepository`. History is
//! kept for the lifetime of the process only.

mod message_repository;

pub use message_repository::InMemoryMessageRepository;
