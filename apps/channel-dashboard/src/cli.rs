use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "channel-dashboard",
    version,
    about = "Temperature/humidity dashboard for a remote telemetry channel"
)]
pub struct Args {
    #[arg(long, env = "DASHBOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, env = "DASHBOARD_PORT", default_value_t = 5000)]
    pub port: u16,
    /// Verbose logging; `DASHBOARD_DEBUG=1|true|yes` has the same effect.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    pub fn debug_enabled(&self) -> bool {
        self.debug
            || crate::config::parse_bool_flag(
                std::env::var("DASHBOARD_DEBUG").ok().as_deref(),
                false,
            )
    }
}
