//! The ordered section catalog defining the document structure.

use crate::{Result, TpgError};
use std::collections::HashSet;

pub const SECTION_TEST_PLAN_IDENTIFIER: &str = "Test Plan Identifier";
pub const SECTION_REFERENCES: &str = "References";
pub const SECTION_APPROVALS: &str = "Approvals";
pub const SECTION_INTRODUCTION: &str = "Introduction";
pub const SECTION_FEATURES_TO_BE_TESTED: &str = "Features to be Tested";
pub const SECTION_FEATURES_NOT_TO_BE_TESTED: &str = "Features not to be Tested";
pub const SECTION_TEST_DELIVERABLES: &str = "Test Deliverables";
pub const SECTION_REMAINING_TEST_TASKS: &str = "Remaining Test Tasks";
pub const SECTION_ENVIRONMENTAL_NEEDS: &str = "Environmental Needs";
pub const SECTION_STAFFING_AND_TRAINING: &str = "Staffing and Training Needs";
pub const SECTION_RESPONSIBILITIES: &str = "Responsibilities";
pub const SECTION_SCHEDULE: &str = "Schedule";
pub const SECTION_TEST_ESTIMATION: &str = "Test Estimation";
pub const SECTION_GLOSSARY: &str = "Glossary";

/// Canonical catalog order for a full test plan.
pub const DEFAULT_SECTIONS: [&str; 21] = [
    SECTION_TEST_PLAN_IDENTIFIER,
    SECTION_REFERENCES,
    SECTION_APPROVALS,
    SECTION_INTRODUCTION,
    "Test Items",
    "Software Risk Issues",
    SECTION_FEATURES_TO_BE_TESTED,
    SECTION_FEATURES_NOT_TO_BE_TESTED,
    "Approach",
    "Item Pass/Fail Criteria",
    "Suspension Criteria and Resumption Requirements",
    SECTION_TEST_DELIVERABLES,
    SECTION_REMAINING_TEST_TASKS,
    "Test Data Needs",
    SECTION_ENVIRONMENTAL_NEEDS,
    SECTION_STAFFING_AND_TRAINING,
    SECTION_RESPONSIBILITIES,
    SECTION_SCHEDULE,
    "Planning Risks and Contingencies",
    SECTION_TEST_ESTIMATION,
    SECTION_GLOSSARY,
];

/// Fixed, ordered list of section names. Duplicate names are rejected at
/// construction: the accumulated plan is a write-once-per-name mapping, and
/// a duplicate entry would silently drop one section's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCatalog {
    sections: Vec<String>,
}

impl SectionCatalog {
    pub fn new(sections: Vec<String>) -> Result<Self> {
        if sections.is_empty() {
            return Err(TpgError::Config("section catalog must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for name in &sections {
            if !seen.insert(name.as_str()) {
                return Err(TpgError::Config(format!(
                    "duplicate section name in catalog: {name:?}"
                )));
            }
        }
        Ok(Self { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(String::as_str)
    }
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self { sections: DEFAULT_SECTIONS.iter().map(|s| (*s).to_string()).collect() }
    }
}
