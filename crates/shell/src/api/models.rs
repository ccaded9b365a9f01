//! Backend response shapes and the small derived figures views show.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Draft,
    Submitted,
    Accepted,
    Rejected,
    Denied,
    Appealed,
    Paid,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub id: String,
    pub patient_name: String,
    pub payer: String,
    pub status: ClaimStatus,
    pub billed_amount: f64,
    pub service_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: String,
    pub patient_name: String,
    pub provider: String,
    pub encounter_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    pub total_billed: f64,
    pub total_collected: f64,
    pub outstanding_ar: f64,
    pub denied_claims: u64,
    pub total_claims: u64,
}

impl RevenueMetrics {
    /// Collected / billed, as a percentage.
    pub fn collection_rate(&self) -> Option<f64> {
        percentage(self.total_collected, self.total_billed)
    }

    pub fn denial_rate(&self) -> Option<f64> {
        percentage(self.denied_claims as f64, self.total_claims as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerPerformance {
    pub payer: String,
    pub claims: u64,
    pub paid: u64,
    pub denied: u64,
    pub avg_days_to_pay: f64,
}

impl PayerPerformance {
    pub fn denial_rate(&self) -> Option<f64> {
        percentage(self.denied as f64, self.claims as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub billed: f64,
    pub collected: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRequest {
    pub activation_token: String,
    pub password: String,
}

/// Filter applied by the claims inbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimFilter {
    pub status: Option<ClaimStatus>,
    /// Case-insensitive match on claim id, patient or payer.
    pub text: Option<String>,
}

impl ClaimFilter {
    pub fn matches(&self, claim: &ClaimSummary) -> bool {
        if self.status.is_some_and(|s| s != claim.status) {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let text = text.to_lowercase();
                [&claim.id, &claim.patient_name, &claim.payer]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&text))
            }
        }
    }

    pub fn apply<'a>(&self, claims: &'a [ClaimSummary]) -> Vec<&'a ClaimSummary> {
        claims.iter().filter(|c| self.matches(c)).collect()
    }
}

pub fn total_billed<'a>(claims: impl IntoIterator<Item = &'a ClaimSummary>) -> f64 {
    claims.into_iter().map(|c| c.billed_amount).sum()
}

fn percentage(part: f64, whole: f64) -> Option<f64> {
    (whole > 0.0).then(|| part * 100.0 / whole)
}
