pub mod adb;
pub mod config;
pub mod manager;
pub mod parse;
pub mod runner;
pub mod watcher;

pub use adb::AdbTransport;
pub use config::DeviceConfig;
pub use manager::DeviceManager;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use watcher::AdbDeviceWatcher;
