//! [`Mailer`] implementations.

pub mod http;
pub mod log;

use std::sync::Arc;

use tracing::info;

use estatehub_core::config::MailConfig;
use estatehub_core::error::AppError;
use estatehub_core::result::AppResult;
use estatehub_core::traits::Mailer;

pub use self::http::HttpMailer;
pub use self::log::LogMailer;

/// Build the mailer named by `mail.provider`.
pub fn build_mailer(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    match config.provider.as_str() {
        "http" => {
            if config.endpoint.is_empty() {
                return Err(AppError::configuration(
                    "mail.endpoint is required for the http mailer",
                ));
            }
            info!(endpoint = %config.endpoint, "Using HTTP mail relay");
            Ok(Arc::new(HttpMailer::new(config)?))
        }
        "log" => {
            info!("Using log-only mailer; no email will be delivered");
            Ok(Arc::new(LogMailer::new(config.from.clone())))
        }
        other => Err(AppError::configuration(format!(
            "Unknown mail provider: '{other}'. Supported: http, log"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mailer() {
        assert_eq!(
            build_mailer(&MailConfig::default()).unwrap().provider_name(),
            "log"
        );

        let http_without_endpoint = MailConfig {
            provider: "http".into(),
            ..Default::default()
        };
        assert!(build_mailer(&http_without_endpoint).is_err());

        let smtp = MailConfig {
            provider: "smtp".into(),
            ..Default::default()
        };
        assert!(build_mailer(&smtp).is_err());
    }
}
