pub mod listener;
pub mod opts;
pub mod playback;
