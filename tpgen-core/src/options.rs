//! Run configuration for a single plan-generation pass.
//!
//! Everything a generation pass needs to know about the application under
//! test lives in one typed struct, validated once before dispatch begins.

use crate::{Result, TpgError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Industry domain classifier. Closed enumeration; the set matches the
/// domains the planning UI offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Telecom Industry")]
    Telecom,
    #[serde(rename = "E-Commerce")]
    ECommerce,
    #[serde(rename = "IT Industry")]
    It,
    #[serde(rename = "Marketing, Advertising, Sales")]
    MarketingAdvertisingSales,
    #[serde(rename = "Government sector")]
    Government,
    #[serde(rename = "Media & Entertainment")]
    MediaEntertainment,
    #[serde(rename = "Travel & Tourism")]
    TravelTourism,
    #[serde(rename = "IoT & Geofencing")]
    IotGeofencing,
    #[serde(rename = "Finances")]
    Finances,
    #[serde(rename = "Supply Chain, Inventory & Order Management")]
    SupplyChain,
    #[serde(rename = "Health Care, Fitness & Recreation")]
    HealthCare,
    #[serde(rename = "Social Media, Social Media Analysis")]
    SocialMedia,
    #[serde(rename = "Ticketing")]
    Ticketing,
    #[serde(rename = "Service Sector")]
    ServiceSector,
    #[serde(rename = "Gaming Industry")]
    Gaming,
    #[serde(rename = "Education Industry")]
    Education,
    #[serde(rename = "Mobile App Development")]
    MobileAppDevelopment,
    #[serde(rename = "Distribution Management System")]
    DistributionManagement,
    #[serde(rename = "Science & Innovation")]
    ScienceInnovation,
    #[serde(rename = "Construction & Engineering")]
    ConstructionEngineering,
    #[serde(rename = "Manufacturing")]
    Manufacturing,
    #[serde(rename = "Ecology and Environmental Protection")]
    Ecology,
    #[serde(rename = "Project Management Industry")]
    ProjectManagement,
    #[serde(rename = "Logistics")]
    Logistics,
    #[serde(rename = "Procurement Management Solution")]
    Procurement,
    #[serde(rename = "Digital Agriculture")]
    DigitalAgriculture,
}

impl Domain {
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Telecom => "Telecom Industry",
            Domain::ECommerce => "E-Commerce",
            Domain::It => "IT Industry",
            Domain::MarketingAdvertisingSales => "Marketing, Advertising, Sales",
            Domain::Government => "Government sector",
            Domain::MediaEntertainment => "Media & Entertainment",
            Domain::TravelTourism => "Travel & Tourism",
            Domain::IotGeofencing => "IoT & Geofencing",
            Domain::Finances => "Finances",
            Domain::SupplyChain => "Supply Chain, Inventory & Order Management",
            Domain::HealthCare => "Health Care, Fitness & Recreation",
            Domain::SocialMedia => "Social Media, Social Media Analysis",
            Domain::Ticketing => "Ticketing",
            Domain::ServiceSector => "Service Sector",
            Domain::Gaming => "Gaming Industry",
            Domain::Education => "Education Industry",
            Domain::MobileAppDevelopment => "Mobile App Development",
            Domain::DistributionManagement => "Distribution Management System",
            Domain::ScienceInnovation => "Science & Innovation",
            Domain::ConstructionEngineering => "Construction & Engineering",
            Domain::Manufacturing => "Manufacturing",
            Domain::Ecology => "Ecology and Environmental Protection",
            Domain::ProjectManagement => "Project Management Industry",
            Domain::Logistics => "Logistics",
            Domain::Procurement => "Procurement Management Solution",
            Domain::DigitalAgriculture => "Digital Agriculture",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One technology-stack slot: a named choice, or a free-text "Other" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechChoice {
    Named(String),
    Other(String),
}

impl TechChoice {
    pub fn label(&self) -> &str {
        match self {
            TechChoice::Named(name) => name,
            TechChoice::Other(detail) => detail,
        }
    }
}

/// Chosen technologies by category. Unfilled categories are skipped when
/// building prompt text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStack {
    pub frontend: Option<TechChoice>,
    pub backend: Option<TechChoice>,
    pub database: Option<TechChoice>,
    pub messaging: Option<TechChoice>,
    pub cloud: Option<TechChoice>,
    pub additional: Option<String>,
}

impl TechStack {
    /// Comma-joined "category: technology" description for prompt text.
    /// Empty slots and blank "Other" entries contribute nothing.
    pub fn describe(&self) -> String {
        let slots = [
            ("Frontend Technology", &self.frontend),
            ("Backend Technology", &self.backend),
            ("Database", &self.database),
            ("Messaging Queue", &self.messaging),
            ("Cloud Infrastructure", &self.cloud),
        ];

        let mut parts: Vec<String> = slots
            .iter()
            .filter_map(|(category, choice)| {
                choice.as_ref().and_then(|c| {
                    let label = c.label().trim();
                    if label.is_empty() { None } else { Some(format!("{category}: {label}")) }
                })
            })
            .collect();

        if let Some(additional) = &self.additional {
            if !additional.trim().is_empty() {
                parts.push(format!("Additional Technologies: {}", additional.trim()));
            }
        }

        parts.join(", ")
    }
}

/// Optional testing disciplines beyond the always-present functional one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    Functional,
    Automation,
    Performance,
    Security,
}

impl Discipline {
    pub fn label(&self) -> &'static str {
        match self {
            Discipline::Functional => "Functional Testing",
            Discipline::Automation => "Automation Testing",
            Discipline::Performance => "Performance Testing",
            Discipline::Security => "Security Testing",
        }
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Team roles that can carry responsibilities in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TesterRole {
    FunctionalTester,
    AutomationTester,
    PerformanceTester,
    SecurityTester,
    TestLead,
    TestManager,
}

impl TesterRole {
    pub const ALL: [TesterRole; 6] = [
        TesterRole::FunctionalTester,
        TesterRole::AutomationTester,
        TesterRole::PerformanceTester,
        TesterRole::SecurityTester,
        TesterRole::TestLead,
        TesterRole::TestManager,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TesterRole::FunctionalTester => "Functional Testers",
            TesterRole::AutomationTester => "Automation Testers",
            TesterRole::PerformanceTester => "Performance Testers",
            TesterRole::SecurityTester => "Security Testers",
            TesterRole::TestLead => "Test Lead",
            TesterRole::TestManager => "Test Manager",
        }
    }
}

impl std::fmt::Display for TesterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Team composition. Discipline flags gate the corresponding headcounts:
/// a disabled discipline always reports zero testers, and the dispatcher
/// renders a placeholder instead of issuing estimation calls for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProfile {
    #[serde(default)]
    pub functional_testers: u32,
    #[serde(default)]
    pub test_leads: u32,
    #[serde(default)]
    pub test_managers: u32,
    #[serde(default)]
    pub automation: bool,
    #[serde(default)]
    pub automation_testers: u32,
    #[serde(default)]
    pub performance: bool,
    #[serde(default)]
    pub performance_testers: u32,
    #[serde(default)]
    pub security: bool,
    #[serde(default)]
    pub security_testers: u32,
}

impl TeamProfile {
    pub fn discipline_enabled(&self, discipline: Discipline) -> bool {
        match discipline {
            Discipline::Functional => true,
            Discipline::Automation => self.automation,
            Discipline::Performance => self.performance,
            Discipline::Security => self.security,
        }
    }

    /// Testers available for a discipline; zero when the flag is off.
    pub fn discipline_headcount(&self, discipline: Discipline) -> u32 {
        if !self.discipline_enabled(discipline) {
            return 0;
        }
        match discipline {
            Discipline::Functional => self.functional_testers,
            Discipline::Automation => self.automation_testers,
            Discipline::Performance => self.performance_testers,
            Discipline::Security => self.security_testers,
        }
    }

    /// Headcount by role, gated by discipline flags.
    pub fn headcount(&self, role: TesterRole) -> u32 {
        match role {
            TesterRole::FunctionalTester => self.functional_testers,
            TesterRole::AutomationTester => self.discipline_headcount(Discipline::Automation),
            TesterRole::PerformanceTester => self.discipline_headcount(Discipline::Performance),
            TesterRole::SecurityTester => self.discipline_headcount(Discipline::Security),
            TesterRole::TestLead => self.test_leads,
            TesterRole::TestManager => self.test_managers,
        }
    }

    fn check(&self) -> Result<()> {
        let gated = [
            (self.automation, self.automation_testers, "automation"),
            (self.performance, self.performance_testers, "performance"),
            (self.security, self.security_testers, "security"),
        ];
        for (enabled, count, name) in gated {
            if !enabled && count > 0 {
                return Err(TpgError::Config(format!(
                    "{count} {name} testers configured but {name} testing is disabled"
                )));
            }
        }
        Ok(())
    }
}

/// Approval or review date; "To be Decided" is a legitimate value carried
/// through to the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDate {
    On(NaiveDate),
    Undecided,
}

impl std::fmt::Display for ApprovalDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalDate::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ApprovalDate::Undecided => f.write_str("To be Decided"),
        }
    }
}

/// One approver or reviewer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub role: String,
    pub date: ApprovalDate,
}

impl PersonRecord {
    pub fn new(name: impl Into<String>, role: impl Into<String>, date: ApprovalDate) -> Self {
        Self { name: name.into(), role: role.into(), date }
    }
}

impl std::fmt::Display for PersonRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name: {}, Role: {}, Date: {}", self.name, self.role, self.date)
    }
}

/// Immutable-per-run configuration for one plan generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub application_name: String,
    pub created_by: String,
    pub creation_date: NaiveDate,
    pub domain: Domain,
    #[serde(default)]
    pub tech_stack: TechStack,
    #[serde(default)]
    pub team: TeamProfile,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub reference_urls: Vec<String>,
    #[serde(default)]
    pub document_names: Vec<String>,
    #[serde(default)]
    pub approvers: Vec<PersonRecord>,
    #[serde(default)]
    pub reviewers: Vec<PersonRecord>,
}

impl GenerationOptions {
    pub fn new(
        application_name: impl Into<String>,
        created_by: impl Into<String>,
        creation_date: NaiveDate,
        domain: Domain,
    ) -> Self {
        Self {
            application_name: application_name.into(),
            created_by: created_by.into(),
            creation_date,
            domain,
            tech_stack: TechStack::default(),
            team: TeamProfile::default(),
            keywords: Vec::new(),
            reference_urls: Vec::new(),
            document_names: Vec::new(),
            approvers: Vec::new(),
            reviewers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tech_stack(mut self, tech_stack: TechStack) -> Self {
        self.tech_stack = tech_stack;
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: TeamProfile) -> Self {
        self.team = team;
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    #[must_use]
    pub fn with_reference_urls(mut self, urls: Vec<String>) -> Self {
        self.reference_urls = urls;
        self
    }

    #[must_use]
    pub fn with_document_names(mut self, names: Vec<String>) -> Self {
        self.document_names = names;
        self
    }

    #[must_use]
    pub fn with_approvers(mut self, approvers: Vec<PersonRecord>) -> Self {
        self.approvers = approvers;
        self
    }

    #[must_use]
    pub fn with_reviewers(mut self, reviewers: Vec<PersonRecord>) -> Self {
        self.reviewers = reviewers;
        self
    }

    /// Validate once before dispatch. Prompt builders never re-check
    /// individual fields; an empty optional field only degrades prompt
    /// quality.
    pub fn validate(&self) -> Result<()> {
        if self.application_name.trim().is_empty() {
            return Err(TpgError::Config("application name must not be empty".to_string()));
        }
        self.team.check()
    }

    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }
}
