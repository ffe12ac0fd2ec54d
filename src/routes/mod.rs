pub mod api;
pub mod assets;
pub mod attachments;
pub mod events;
pub mod health;
pub mod pages;
