// EMG Gesture Watch — Core Library
//
// Hardware-independent half of the firmware: sliding sample window, the
// inference server protocol and client, and the sampling loop.  Builds on the
// host so it can be tested without a board.

pub mod config;
pub mod events;
pub mod inference;
pub mod protocol;
pub mod tasks;
pub mod window;

pub use events::{Detection, EmgSample};
pub use inference::{HttpReply, InferenceClient, InferenceError, Transport};
pub use tasks::sampler::{EmgSource, Sampler};
pub use window::{SampleWindow, WindowError, WindowPolicy, WindowSnapshot};
