pub mod account;
pub mod daemon;
pub mod file;
pub mod health;
pub mod init;
pub mod picture;
pub mod version;

pub use account::Account;
pub use daemon::Daemon;
pub use file::File;
pub use health::Health;
pub use init::Init;
pub use picture::Picture;
pub use version::Version;
