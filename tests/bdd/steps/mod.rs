pub mod authorized_steps;
pub mod bookstore_steps;
pub mod common_steps;
pub mod hooks;
pub mod retry_steps;
pub mod token_steps;
pub mod world;
