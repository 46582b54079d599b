//! Runtime configuration from CLI flags and environment

use clap::Parser;

/// Terminal client for the mood-based playlist backend
#[derive(Parser, Debug, Clone)]
#[command(name = "moodify", version, about)]
pub struct Config {
    /// Base URL of the mood-playlist backend
    #[arg(long, env = "MOODIFY_BACKEND_URL", default_value = "http://127.0.0.1:5000")]
    pub backend_url: String,

    /// Camera device index to capture from
    #[arg(long, env = "MOODIFY_CAMERA_INDEX", default_value_t = 0)]
    pub camera_index: u32,

    /// JPEG quality for captured frames (1-100)
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,
}
