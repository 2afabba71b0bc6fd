pub mod dispatch;
pub mod gui;
pub mod hotkey;
pub mod logging;
pub mod settings;
pub mod stopwatch;
