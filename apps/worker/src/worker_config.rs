use std::env;
use std::time::Duration;

use shutoff_application::{DEFAULT_SCAN_CONCURRENCY, RemediationLinkBuilder};
use shutoff_core::{AppError, AppResult};
use shutoff_infrastructure::{RemediationStore, SmtpEmailConfig};

const DEFAULT_HOME_REGION: &str = "eu-west-1";

/// Notification delivery backend.
#[derive(Clone)]
pub(crate) enum EmailProvider {
    Ses { sender: String },
    Smtp(SmtpEmailConfig),
    Console,
}

impl EmailProvider {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Ses { .. } => "ses",
            Self::Smtp(_) => "smtp",
            Self::Console => "console",
        }
    }
}

#[derive(Clone)]
pub(crate) struct WorkerConfig {
    pub(crate) home_region: String,
    pub(crate) distribution_list: Vec<String>,
    pub(crate) email_provider: EmailProvider,
    pub(crate) remediation_link: Option<RemediationLinkBuilder>,
    pub(crate) remediation_store: RemediationStore,
    pub(crate) scan_concurrency: usize,
    pub(crate) scan_interval: Option<Duration>,
}

impl WorkerConfig {
    pub(crate) fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &str| {
            optional(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let home_region =
            optional("SHUTOFF_HOME_REGION").unwrap_or_else(|| DEFAULT_HOME_REGION.to_owned());

        let distribution_list: Vec<String> = required("NOTIFICATION_DISTRIBUTION_LIST")?
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_owned)
            .collect();
        if distribution_list.is_empty() {
            return Err(AppError::Validation(
                "NOTIFICATION_DISTRIBUTION_LIST must name at least one address".to_owned(),
            ));
        }

        let email_provider = match optional("EMAIL_PROVIDER")
            .map(|value| value.to_ascii_lowercase())
            .as_deref()
            .unwrap_or("ses")
        {
            "ses" => EmailProvider::Ses {
                sender: required("NOTIFICATION_SENDER")?,
            },
            "smtp" => EmailProvider::Smtp(SmtpEmailConfig {
                host: required("SMTP_HOST")?,
                port: parse_or("SMTP_PORT", optional("SMTP_PORT"), 587)?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                from_address: required("NOTIFICATION_SENDER")?,
            }),
            "console" => EmailProvider::Console,
            other => {
                return Err(AppError::Validation(format!(
                    "unsupported EMAIL_PROVIDER '{other}', expected ses, smtp or console"
                )));
            }
        };

        let remediation_link = optional("REMEDIATION_CALLBACK_URL")
            .map(|url| RemediationLinkBuilder::parse(url.as_str()))
            .transpose()?;

        let remediation_store = RemediationStore::parse(
            optional("REMEDIATION_STORE").as_deref(),
            optional("REMEDIATION_TABLE_NAME").as_deref(),
            optional("REDIS_URL").as_deref(),
        )?;

        let scan_concurrency = parse_or(
            "SCAN_CONCURRENCY",
            optional("SCAN_CONCURRENCY"),
            DEFAULT_SCAN_CONCURRENCY,
        )?;
        if scan_concurrency == 0 {
            return Err(AppError::Validation(
                "SCAN_CONCURRENCY must be greater than zero".to_owned(),
            ));
        }

        let scan_interval = optional("SCAN_INTERVAL_SECONDS")
            .map(|value| parse_or::<u64>("SCAN_INTERVAL_SECONDS", Some(value), 0))
            .transpose()?
            .map(|seconds| {
                if seconds == 0 {
                    Err(AppError::Validation(
                        "SCAN_INTERVAL_SECONDS must be greater than zero".to_owned(),
                    ))
                } else {
                    Ok(Duration::from_secs(seconds))
                }
            })
            .transpose()?;

        Ok(Self {
            home_region,
            distribution_list,
            email_provider,
            remediation_link,
            remediation_store,
            scan_concurrency,
            scan_interval,
        })
    }
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value.parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
