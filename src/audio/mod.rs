//! Audio plumbing for the recorder screen
//!
//! - `device`: input/output device enumeration (cpal)
//! - `capture`: PCM microphone capture with bounded buffering
//! - `click`: the metronome's click sound, loaded once per screen

mod capture;
mod click;
mod device;

pub use capture::{AudioFrame, MicCapture};
pub use click::ClickSound;
pub use device::{
    default_input_device, find_input_device, list_input_devices, list_output_devices, AudioDevice,
};
