//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "pencils-down")]
#[command(about = "A state-managed countdown daemon for online test sessions with auto-submit")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Identifier of the test attempt this session belongs to
    #[arg(short, long)]
    pub test_id: u64,

    /// Test duration in seconds, as supplied by the scoring server
    #[arg(short, long)]
    pub duration: u64,

    /// Base URL of the test-scoring server
    #[arg(short, long, default_value = "http://localhost:8000")]
    pub server: String,

    /// Display target: "stdout", "stderr", or a writable file path
    #[arg(long, default_value = "stdout")]
    pub display: String,

    /// Directory holding the persisted remaining-time snapshot
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    pub state_dir: PathBuf,

    /// Host address to bind the status API to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the status API to
    #[arg(short, long, default_value = "20553")]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the status API address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
