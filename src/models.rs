use serde::{Deserialize, Serialize};

/// Work-location arrangement values, kept as enum-like strings so the JSON
/// artifact and the database column read the same.
pub mod modality {
    pub const ON_SITE: &str = "OnSite";
    pub const HYBRID: &str = "Hybrid";
    pub const REMOTE: &str = "Remote";
    /// Extraction-time sentinel, distinct from a real category.
    /// The normalizer turns it into None before persistence.
    pub const NOT_SPECIFIED: &str = "NotSpecified";
}

pub const STATUS_ACTIVE: &str = "ACTIVE";

/// One job posting, as scraped. Every field except `status` is optional
/// because any piece of markup may be missing from any given listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub offer_id: Option<i64>, // site-assigned; never submitted to the database
    pub offer_url: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub study_level: Option<String>,
    pub sector_activity: Option<String>, // " / "-joined when several apply
    pub skills: Option<String>,
    pub modality: Option<String>,
    pub flexible_hours: Option<i64>, // 0 or 1 after normalization
    pub basic_salary: Option<String>,
    pub status: String,
    pub date_publication: Option<String>, // YYYY-MM-DD
    pub date_expiration: Option<String>,  // YYYY-MM-DD
    pub created_at: Option<String>,       // YYYY-MM-DD HH:MM:SS
    pub updated_at: Option<String>,
}

impl JobOffer {
    pub fn new() -> Self {
        Self {
            status: STATUS_ACTIVE.to_string(),
            ..Default::default()
        }
    }
}
