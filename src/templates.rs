//! Bodies of the emails the application sends.

use chrono::{Datelike, Utc};

use url::Url;

use crate::client::Email;
use crate::domain::{Audience, EmailAddress, ServiceName};

const COMPANY: &str = "TELLIARCH LIMITED";
const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: linear-gradient(135deg, #1e3a5f, #2d5a87); color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }
    .content { background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px; }
    .footer { text-align: center; margin-top: 20px; color: #666; font-size: 12px; }
    .tag { display: inline-block; background: #c9a227; color: white; padding: 8px 16px; border-radius: 20px; font-weight: bold; }
    .cta { display: inline-block; background: #c9a227; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; margin-top: 20px; }
"#;

/// Builds outgoing emails, every one of them links back to the website
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    website_url: Url,
}

impl EmailTemplates {
    pub fn new(website_url: Url) -> Self {
        Self { website_url }
    }

    /// Confirmation sent after a subscribe or reactivation
    pub fn confirmation(&self, recipient: EmailAddress, audience: Audience) -> Email {
        match audience {
            Audience::Newsletter => self.welcome(recipient),
            Audience::Service(service) => self.service_confirmation(recipient, service),
        }
    }

    fn welcome(&self, recipient: EmailAddress) -> Email {
        let subject = "Welcome to TELLIARCH Newsletter!".to_string();
        let html_body = self.layout(
            "Welcome to TELLIARCH!",
            Some("Empowering Businesses to Achieve Excellence"),
            &format!(
                r#"<p>Dear Subscriber,</p>
<p>Thank you for subscribing to the TELLIARCH newsletter! We're excited to have you join our community.</p>
<p>Stay tuned for valuable content designed to help you and your organization thrive.</p>
<p style="text-align: center;"><a href="{}" class="cta">Visit Our Website</a></p>
<p>Best regards,<br><strong>The TELLIARCH Team</strong></p>"#,
                self.website_url
            ),
        );
        let text_body = format!(
            "Dear Subscriber,\n\nThank you for subscribing to the TELLIARCH newsletter! We're excited to have you join our community.\n\nVisit our website: {}\n\nBest regards,\nThe TELLIARCH Team",
            self.website_url
        );

        Email {
            recipient,
            subject,
            html_body,
            text_body,
        }
    }

    fn service_confirmation(&self, recipient: EmailAddress, service: ServiceName) -> Email {
        let services_url = self.services_url();
        let subject = format!("Subscribed to {} Updates - TELLIARCH", service);
        let html_body = self.layout(
            "Subscription Confirmed!",
            Some("TELLIARCH Service Updates"),
            &format!(
                r#"<p>Dear Subscriber,</p>
<p>Thank you for subscribing to updates about:</p>
<p style="text-align: center;"><span class="tag">{}</span></p>
<p>You'll receive the latest news, insights, and updates related to this service directly in your inbox.</p>
<p style="text-align: center;"><a href="{}" class="cta">View Our Services</a></p>
<p>Best regards,<br><strong>The TELLIARCH Team</strong></p>"#,
                service, services_url
            ),
        );
        let text_body = format!(
            "Dear Subscriber,\n\nThank you for subscribing to updates about {}.\n\nYou'll receive the latest news, insights, and updates related to this service directly in your inbox.\n\nView our services: {}\n\nBest regards,\nThe TELLIARCH Team",
            service, services_url
        );

        Email {
            recipient,
            subject,
            html_body,
            text_body,
        }
    }

    /// A broadcast issue, each line of `content` becomes a paragraph
    pub fn newsletter(
        &self,
        recipient: EmailAddress,
        subject: &str,
        content: &str,
        audience: Audience,
    ) -> Email {
        let paragraphs: String = content
            .lines()
            .map(|line| format!("<p>{}</p>", line))
            .collect();
        let tagline = audience.service().map(|service| service.as_str());
        let html_body = self.layout(
            "TELLIARCH Newsletter",
            tagline,
            &format!(
                r#"{}
<p style="text-align: center;"><a href="{}" class="cta">Visit Our Website</a></p>"#,
                paragraphs, self.website_url
            ),
        );
        let text_body = format!("{}\n\n{}", content, self.website_url);

        Email {
            recipient,
            subject: subject.to_string(),
            html_body,
            text_body,
        }
    }

    fn services_url(&self) -> Url {
        let mut url = self.website_url.clone();
        url.set_fragment(Some("services"));
        url
    }

    fn layout(&self, title: &str, tagline: Option<&str>, content: &str) -> String {
        let tagline = tagline
            .map(|t| format!(r#"<p style="margin: 10px 0 0 0; opacity: 0.9;">{}</p>"#, t))
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html>
<head><style>{style}</style></head>
<body>
  <div class="container">
    <div class="header">
      <h1 style="margin: 0;">{title}</h1>
      {tagline}
    </div>
    <div class="content">
{content}
    </div>
    <div class="footer">
      <p>&copy; {year} {company}. All rights reserved.</p>
      <p>Nairobi, Kenya | info@telliarch.co.ke</p>
    </div>
  </div>
</body>
</html>"#,
            style = STYLE,
            title = title,
            tagline = tagline,
            content = content,
            year = Utc::now().year(),
            company = COMPANY,
        )
    }
}
