pub mod emg;
pub mod http;
pub mod wifi;
