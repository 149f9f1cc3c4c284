use crate::config::UpstreamSettings;
use crate::utils::BridgeError;

/// Resolves the data-plane address of the telemetry broker.
///
/// Endpoint provisioning lives outside the bridge; this trait is the seam
/// behind which that lookup hides. Implementations return a
/// `host[:port]` address string.
#[allow(async_fn_in_trait)]
pub trait EndpointDirectory {
    async fn resolve(&self) -> Result<String, BridgeError>;
}

/// Directory backed by the `upstream.endpoint` setting.
///
/// Stands in for the external provisioning service: the address is taken
/// from configuration, and resolution fails when none is configured.
#[derive(Debug, Clone)]
pub struct ConfigDirectory {
    endpoint: Option<String>,
}

impl ConfigDirectory {
    pub fn new(settings: &UpstreamSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
        }
    }
}

impl EndpointDirectory for ConfigDirectory {
    async fn resolve(&self) -> Result<String, BridgeError> {
        self.endpoint.clone().ok_or_else(|| {
            BridgeError::Directory("no upstream endpoint configured".to_string())
        })
    }
}
