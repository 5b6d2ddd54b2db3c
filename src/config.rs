use clap::Parser;
use std::time::Duration;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "lead-intake")]
#[command(about = "Lead intake endpoint with per-client rate limiting")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 5)]
    pub rate_limit: u32,

    // Rate limit window in milliseconds
    #[arg(long, default_value_t = 60_000)]
    pub rate_window_ms: u64,

    // Seconds between sweeps of expired rate limit records (0 = never)
    #[arg(long, default_value_t = 60)]
    pub sweep_interval: u64,
}

impl Args {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_millis(self.rate_window_ms)
    }

    pub fn sweep_every(&self) -> Option<Duration> {
        match self.sweep_interval {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
