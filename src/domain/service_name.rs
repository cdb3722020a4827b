use std::fmt;
use std::str::FromStr;

/// One of the consultancy's advertised services.
///
/// The display name is the wire and storage representation, it's what the
/// site sends when a visitor subscribes to updates for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    HumanResourceManagement,
    FinancialManagement,
    StrategicManagement,
    BrandManagement,
    GuidanceCounselling,
    MentalHealth,
    Mentorship,
}

impl ServiceName {
    pub const ALL: [ServiceName; 7] = [
        Self::HumanResourceManagement,
        Self::FinancialManagement,
        Self::StrategicManagement,
        Self::BrandManagement,
        Self::GuidanceCounselling,
        Self::MentalHealth,
        Self::Mentorship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HumanResourceManagement => "Human Resource Management",
            Self::FinancialManagement => "Financial Management & Accounting",
            Self::StrategicManagement => "Strategic Management",
            Self::BrandManagement => "Brand Management & Marketing",
            Self::GuidanceCounselling => "Guidance & Counselling",
            Self::MentalHealth => "Mental Health & Wellness Solutions",
            Self::Mentorship => "Mentorship & Coaching",
        }
    }
}

impl FromStr for ServiceName {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err("Service name is required".into());
        }

        Self::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("Unknown service: {}", value))
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
