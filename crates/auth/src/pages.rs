use serde::{Deserialize, Serialize};

/// Stable identifier of a navigable view.
///
/// Distinct from the display label and the URL path; both are derived from the
/// identifier through exhaustive matches, so adding a page without a label or
/// path does not compile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageId {
    Dashboard,
    ClaimsInbox,
    ClaimWorkspace,
    NewClaim,
    Acknowledgements,
    Eras,
    Denials,
    Appeals,
    Eligibility,
    PatientBilling,
    Payers,
    FeeSchedules,
    Reports,
    AuditLog,
    AdminSettings,
}

impl PageId {
    pub const ALL: [PageId; 15] = [
        PageId::Dashboard,
        PageId::ClaimsInbox,
        PageId::ClaimWorkspace,
        PageId::NewClaim,
        PageId::Acknowledgements,
        PageId::Eras,
        PageId::Denials,
        PageId::Appeals,
        PageId::Eligibility,
        PageId::PatientBilling,
        PageId::Payers,
        PageId::FeeSchedules,
        PageId::Reports,
        PageId::AuditLog,
        PageId::AdminSettings,
    ];

    /// Stable key (matches the serde representation).
    pub fn key(&self) -> &'static str {
        match self {
            PageId::Dashboard => "dashboard",
            PageId::ClaimsInbox => "claims_inbox",
            PageId::ClaimWorkspace => "claim_workspace",
            PageId::NewClaim => "new_claim",
            PageId::Acknowledgements => "acknowledgements",
            PageId::Eras => "eras",
            PageId::Denials => "denials",
            PageId::Appeals => "appeals",
            PageId::Eligibility => "eligibility",
            PageId::PatientBilling => "patient_billing",
            PageId::Payers => "payers",
            PageId::FeeSchedules => "fee_schedules",
            PageId::Reports => "reports",
            PageId::AuditLog => "audit_log",
            PageId::AdminSettings => "admin_settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageId::Dashboard => "Dashboard",
            PageId::ClaimsInbox => "Claims Inbox",
            PageId::ClaimWorkspace => "Claim Workspace",
            PageId::NewClaim => "New Claim",
            PageId::Acknowledgements => "Acknowledgements",
            PageId::Eras => "ERAs",
            PageId::Denials => "Denials",
            PageId::Appeals => "Appeals",
            PageId::Eligibility => "Eligibility",
            PageId::PatientBilling => "Patient Billing",
            PageId::Payers => "Payers",
            PageId::FeeSchedules => "Fee Schedules",
            PageId::Reports => "Reports",
            PageId::AuditLog => "Audit Log",
            PageId::AdminSettings => "Admin & Settings",
        }
    }

    /// Canonical URL path (without sub-resource segments).
    pub fn path(&self) -> &'static str {
        match self {
            PageId::Dashboard => "/dashboard",
            PageId::ClaimsInbox => "/claims-inbox",
            PageId::ClaimWorkspace => "/claim-workspace",
            PageId::NewClaim => "/new-claim",
            PageId::Acknowledgements => "/acks",
            PageId::Eras => "/eras",
            PageId::Denials => "/denials",
            PageId::Appeals => "/appeals",
            PageId::Eligibility => "/eligibility",
            PageId::PatientBilling => "/patient-billing",
            PageId::Payers => "/payers",
            PageId::FeeSchedules => "/fee-schedules",
            PageId::Reports => "/reports",
            PageId::AuditLog => "/audit-log",
            PageId::AdminSettings => "/admin-settings",
        }
    }

    /// Whether the page is addressed by a sub-resource id in its path.
    pub fn takes_resource_id(&self) -> bool {
        matches!(self, PageId::ClaimWorkspace)
    }
}

impl core::fmt::Display for PageId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}
