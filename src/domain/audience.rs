use std::fmt;

use super::ServiceName;

/// Who a subscription belongs to, or who a broadcast goes out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The general newsletter list
    Newsletter,
    /// Update list for a single service
    Service(ServiceName),
}

impl Audience {
    /// Parse an optional service name, where absent or blank means the general newsletter
    pub fn from_service_filter(filter: Option<&str>) -> Result<Self, String> {
        match filter.map(str::trim) {
            None | Some("") => Ok(Self::Newsletter),
            Some(name) => name.parse().map(Self::Service),
        }
    }

    pub fn service(&self) -> Option<ServiceName> {
        match self {
            Self::Newsletter => None,
            Self::Service(service) => Some(*service),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newsletter => f.write_str("newsletter"),
            Self::Service(service) => service.fmt(f),
        }
    }
}
