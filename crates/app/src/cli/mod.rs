pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Account, Daemon, File, Health, Init, Picture, Version};
