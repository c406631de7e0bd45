use std::fmt;
use std::num::IntErrorKind;

use serde::Serialize;
use thiserror::Error;

/// Which scrape the operator asked the agent for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Jobs,
    Recruiters,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Jobs => write!(f, "jobs"),
            Target::Recruiters => write!(f, "recruiters"),
        }
    }
}

/// How a launch reaches the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    /// `GET /stream-scrape`, server-sent events until a terminal message.
    #[default]
    Streaming,
    /// `POST /launch`, one acknowledgement followed by a simulated timeline.
    Request,
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::Streaming => write!(f, "stream"),
            ChannelMode::Request => write!(f, "request"),
        }
    }
}

/// Raw operator input, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignInput {
    pub company: String,
    pub location: String,
    pub keywords: String,
    pub recency_minutes: String,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequiredField(&'static str),
    #[error("{field} must be a positive whole number of minutes, got {value:?}")]
    InvalidFormat { field: &'static str, value: String },
    #[error("{field} is out of range (at most {max} minutes), got {value:?}")]
    OutOfRange {
        field: &'static str,
        value: String,
        max: u32,
    },
    #[error("{target} campaigns are not supported in {mode} mode")]
    UnsupportedTarget { target: Target, mode: ChannelMode },
}

/// Validated, immutable parameters of one campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignParameters {
    company: String,
    location: Option<String>,
    keywords: String,
    recency_minutes: Option<u32>,
    target: Target,
}

/// JSON body of `POST /launch`. Absent optionals are omitted, never sent empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchBody<'a> {
    pub target_company: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    pub keywords: &'a str,
    pub scrape_target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_posted_minutes: Option<u32>,
}

impl CampaignParameters {
    pub fn validate(raw: &CampaignInput, mode: ChannelMode) -> Result<Self, ValidationError> {
        let company = raw.company.trim();
        if company.is_empty() {
            return Err(ValidationError::MissingRequiredField("company"));
        }

        let location = match raw.location.trim() {
            "" if mode == ChannelMode::Request => {
                return Err(ValidationError::MissingRequiredField("location"));
            }
            "" => None,
            value => Some(value.to_string()),
        };

        if mode == ChannelMode::Streaming && raw.target == Target::Recruiters {
            return Err(ValidationError::UnsupportedTarget {
                target: raw.target,
                mode,
            });
        }

        Ok(Self {
            company: company.to_string(),
            location,
            keywords: raw.keywords.trim().to_string(),
            recency_minutes: parse_recency(&raw.recency_minutes)?,
            target: raw.target,
        })
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn recency_minutes(&self) -> Option<u32> {
        self.recency_minutes
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Ordered query pairs for the streaming endpoint. The agent declares
    /// `location` and `keywords` as required, so both are always present;
    /// only the recency filter is omitted when absent.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        pairs.push(("company", self.company.clone()));
        pairs.push(("location", self.location.clone().unwrap_or_default()));
        pairs.push(("keywords", self.keywords.clone()));
        if let Some(minutes) = self.recency_minutes {
            pairs.push(("time_posted_minutes", minutes.to_string()));
        }
        pairs
    }

    /// Form-encoded query string built from [`Self::query_pairs`].
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    pub fn launch_body(&self) -> LaunchBody<'_> {
        LaunchBody {
            target_company: &self.company,
            location: self.location.as_deref(),
            keywords: &self.keywords,
            scrape_target: self.target,
            time_posted_minutes: self.recency_minutes,
        }
    }
}

/// Blank means "any time"; anything else must be a whole number >= 1.
fn parse_recency(raw: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let invalid = || ValidationError::InvalidFormat {
        field: "recency_minutes",
        value: trimmed.to_string(),
    };
    let out_of_range = || ValidationError::OutOfRange {
        field: "recency_minutes",
        value: trimmed.to_string(),
        max: u32::MAX,
    };
    match trimmed.parse::<u32>() {
        Ok(0) => Err(invalid()),
        Ok(minutes) => Ok(Some(minutes)),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Err(out_of_range()),
        Err(_) => Err(invalid()),
    }
}

/// What an opened channel is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub mode: ChannelMode,
    pub parameters: CampaignParameters,
}
