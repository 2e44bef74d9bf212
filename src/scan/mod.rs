pub mod lambda;
pub mod stat;
pub mod windows;

pub use self::windows::{scan_transcript, WindowStat};
