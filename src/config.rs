use std::env;

/// Settings the core never reads ad hoc from the environment: collected once
/// at startup and passed in explicitly.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// SendGrid API key; absent means feedback is saved locally, not emailed
    pub sendgrid_api_key: Option<String>,
    pub mail_from: String,
    pub mail_to: String,
    /// Shared secret gating destructive admin actions; absent means no gate
    pub admin_password: Option<String>,
}

const DEFAULT_FROM: &str = "campus@eingang.de";

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            sendgrid_api_key: non_empty(env::var("CAMPUS_SENDGRID_API_KEY").ok()),
            mail_from: env::var("CAMPUS_MAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.to_string()),
            mail_to: env::var("CAMPUS_MAIL_TO").unwrap_or_default(),
            admin_password: non_empty(env::var("CAMPUS_ADMIN_PASSWORD").ok()),
        }
    }

    /// Whether outbound mail is configured at all.
    pub fn mail_configured(&self) -> bool {
        self.sendgrid_api_key.is_some() && !self.mail_to.is_empty()
    }

    /// Check a candidate against the admin password.
    ///
    /// Constant-time comparison; with no password configured the gate is
    /// open (single-user local tool).
    pub fn verify_admin(&self, candidate: &str) -> bool {
        match &self.admin_password {
            None => true,
            Some(password) => {
                let a = password.as_bytes();
                let b = candidate.as_bytes();
                if a.len() != b.len() {
                    return false;
                }
                a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
