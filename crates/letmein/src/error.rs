//! CLI error types with miette diagnostics.
//!
//! Maps config, API and reconciliation failures into user-facing errors
//! with help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use letmein_config::ConfigError;
use letmein_core::SyncError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const DISCOVERY: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach ONOS at {url}")]
    #[diagnostic(
        code(letmein::connection_failed),
        help(
            "Check that ONOS is running and reachable.\n\
             URL: {url}\n\
             Set onos_connect_url or pass --onos-url."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: SyncError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(letmein::tls_error),
        help("Check ca_cert, or set insecure = true for lab controllers.")
    )]
    Tls { message: String },

    #[error("ONOS rejected the credentials")]
    #[diagnostic(
        code(letmein::auth_failed),
        help("Embed user:password in onos_connect_url or set username/password.")
    )]
    AuthFailed {
        #[source]
        source: SyncError,
    },

    // ── Reconciliation ───────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(letmein::discovery_failed),
        help("Set ovs_dpid / ovs_port (or --dpid / --port) instead of :discover.")
    )]
    Discovery(SyncError),

    #[error(transparent)]
    #[diagnostic(code(letmein::cycle_failed))]
    Cycle(SyncError),

    #[error("{count} item(s) failed during reconciliation")]
    #[diagnostic(
        code(letmein::item_failures),
        help("Failed items are listed in the report; they are retried on the next cycle.")
    )]
    ItemFailures { count: usize },

    #[error("{count} of {cycles} cycle(s) failed")]
    #[diagnostic(code(letmein::cycles_failed))]
    CyclesFailed { count: u64, cycles: u64 },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(letmein::config),
        help("Run `letmein config show` to see the effective settings.")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::Discovery(_) => exit_code::DISCOVERY,
            Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}

// ── API / core → CliError mapping ────────────────────────────────────

impl From<letmein_api::Error> for CliError {
    fn from(err: letmein_api::Error) -> Self {
        match err {
            letmein_api::Error::Tls(message) => Self::Tls { message },
            other => Self::Config(ConfigError::Validation {
                field: "onos_connect_url".into(),
                reason: other.to_string(),
            }),
        }
    }
}

/// Classify a cycle-fatal error against the controller at `url`.
pub fn from_sync(err: SyncError, url: &str) -> CliError {
    let (connect, unauthorized) = err
        .gateway_error()
        .map_or((false, false), |e| (e.is_connect(), e.is_unauthorized()));

    match err {
        _ if connect => CliError::ConnectionFailed {
            url: url.to_owned(),
            source: err,
        },
        _ if unauthorized => CliError::AuthFailed { source: err },
        SyncError::DiscoveryFailed { .. } => CliError::Discovery(err),
        _ => CliError::Cycle(err),
    }
}
