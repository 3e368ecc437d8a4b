//! `check_config`: fetch a device configuration and report to monitoring.
//!
//! ```bash
//! check_config -H 10.0.0.1 -u admin -p secret -f enable-secret -o ios
//! check_config -H 10.0.0.1 -u admin -o h3c -s ssh    # passwords from the environment
//! ```
//!
//! Prints one status line on stdout (`OK|size=<N>B` or `Critical ...`) and
//! exits 0 or 2. Logs go to stderr; set `RUST_LOG=debug` to follow the
//! session step by step.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::info;

use confgrab::archive;
use confgrab::driver::{CaptureFailure, CaptureResult, SessionBuilder, capture_config};
use confgrab::report::report;
use confgrab::transport::{HostKeyVerification, NetworkConnector, SessionConfig, TransportMode};

const DEFAULT_CRITICAL: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(name = "check_config")]
#[command(about = "Capture a network device configuration and report the result", long_about = None)]
#[command(version)]
struct Cli {
    /// Device address
    #[arg(short = 'H', long)]
    host: String,

    /// Login username
    #[arg(short, long)]
    username: String,

    /// Login password
    #[arg(short, long, env = "CONFGRAB_PASSWORD", hide_env_values = true, default_value = "")]
    password: String,

    /// Enable (privilege) password
    #[arg(short = 'f', long, env = "CONFGRAB_ENABLE", hide_env_values = true, default_value = "")]
    enable: String,

    /// Device OS: ios, catos, h3c or enterasys
    #[arg(short, long)]
    os: String,

    /// Transport used to reach the device
    #[arg(short = 's', long, value_enum, default_value_t = Mode::Telnet)]
    transport: Mode,

    /// Critical response time in seconds
    #[arg(short, long, default_value_t = 60.0)]
    critical: f64,

    /// Port (defaults to 23 for telnet, 22 for ssh)
    #[arg(long)]
    port: Option<u16>,

    /// Connect and per-prompt timeout in seconds
    #[arg(short, long, default_value_t = 25)]
    timeout: u64,

    /// Directory the configuration is written to
    #[arg(short, long, default_value = "/tmp")]
    directory: PathBuf,

    /// Fail when the prompt after escalation is not the privileged one
    #[arg(long)]
    verify_privilege: bool,

    /// SSH host key checking
    #[arg(long, value_enum, default_value_t = HostKeyChecking::AcceptNew)]
    host_key_checking: HostKeyChecking,

    /// known_hosts file used for SSH host key checking
    #[arg(long)]
    known_hosts: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Telnet,
    Ssh,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HostKeyChecking {
    Strict,
    AcceptNew,
    Off,
}

impl Cli {
    fn session_config(&self) -> confgrab::Result<SessionConfig> {
        let mode = match self.transport {
            Mode::Telnet => TransportMode::Telnet,
            Mode::Ssh => TransportMode::Ssh,
        };
        let host_key_verification = match self.host_key_checking {
            HostKeyChecking::Strict => HostKeyVerification::Strict,
            HostKeyChecking::AcceptNew => HostKeyVerification::AcceptNew,
            HostKeyChecking::Off => HostKeyVerification::Disabled,
        };

        let mut builder = SessionBuilder::new(&self.host)
            .username(&self.username)
            .password(&self.password)
            .enable_password(&self.enable)
            .mode(mode)
            .timeout(Duration::from_secs(self.timeout))
            .critical_time(Duration::try_from_secs_f64(self.critical).unwrap_or(DEFAULT_CRITICAL))
            .verify_privilege(self.verify_privilege)
            .host_key_verification(host_key_verification);

        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(path) = &self.known_hosts {
            builder = builder.known_hosts_path(path);
        }

        builder.build()
    }
}

async fn run(cli: &Cli, config: &SessionConfig) -> CaptureResult {
    let capture = capture_config(&NetworkConnector, config, &cli.os).await?;

    let today = chrono::Local::now().date_naive();
    let path = archive::write_capture(&cli.directory, &config.host, today, &capture)?;
    info!("configuration saved to {}", path.display());

    Ok(capture)
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let (result, critical_time) = match cli.session_config() {
        Ok(config) => (run(&cli, &config).await, config.critical_time),
        Err(e) => (Err(CaptureFailure::from(e)), DEFAULT_CRITICAL),
    };

    let report = report(&result, critical_time);
    println!("{report}");
    std::process::exit(report.exit_code());
}
