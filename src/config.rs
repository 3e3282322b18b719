use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Public base for the share links handed out on creation.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds between sweeps of dead pastes.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Honor the x-test-now-ms header as the reference time. Leave off
    /// outside test harnesses.
    #[serde(default)]
    pub test_mode: bool,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_owned()
}

fn default_port() -> u16 {
    3000
}

fn default_sweep_interval_secs() -> u64 {
    60
}
