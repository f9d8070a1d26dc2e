use crate::bail_vid;
use crate::errors::VidResult;
use crate::ids::VideoId;

/// Derives content locators from the service's externally reachable base
/// address. The result depends on nothing but (base, id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    base: String,
}

impl Locator {
    /// `base` must be an absolute `http://` or `https://` address.
    pub fn new(base: impl Into<String>) -> VidResult<Self> {
        let base = base.into();
        let trimmed = base.trim().trim_end_matches('/');

        let host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"));

        match host {
            Some(host) if !host.is_empty() => Ok(Self {
                base: trimmed.to_string(),
            }),
            _ => bail_vid!(
                invalid_input,
                "Public base address must be an absolute http(s) URL, got {:?}",
                base
            ),
        }
    }

    /// `http://<host>[:<port>]`, omitting the default port.
    pub fn from_host_port(host: &str, port: u16) -> VidResult<Self> {
        if port == 80 {
            Self::new(format!("http://{}", host))
        } else {
            Self::new(format!("http://{}:{}", host, port))
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn data_url(&self, id: VideoId) -> String {
        format!("{}/video/{}/data", self.base, id)
    }
}
