// Command modules
mod sounds;
mod tuna;

// Re-export all commands
pub use sounds::{adduser, removeuser};
pub use tuna::{importsound, tunacode, tunalogin};
