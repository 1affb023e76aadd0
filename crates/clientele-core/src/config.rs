// ── Runtime connection configuration ──
//
// Describes *how* to reach the appliance. Carries the session id and
// transport tuning but never touches disk; the CLI/TUI builds a
// `ManagerConfig` from `clientele-config` profiles and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use clientele_api::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single appliance.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Appliance URL (e.g., `http://pi.hole`).
    pub url: Url,
    /// Pre-issued session id, sent as `X-FTL-SID`.
    pub session_id: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ManagerConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            session_id: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            session_id: self.session_id.clone(),
        }
    }
}
