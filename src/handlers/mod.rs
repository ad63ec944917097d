/// Handler modules for Discord events and voice playback
mod playback;
mod voice;

// Re-exported for the command surface's preview flow
pub use playback::{join_with_backoff, play_sound_then_leave, teardown_existing};
pub use voice::handle_voice_state_update;
