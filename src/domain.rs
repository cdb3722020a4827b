mod audience;
mod email_address;
mod service_name;

pub use audience::Audience;
pub use email_address::EmailAddress;
pub use service_name::ServiceName;
