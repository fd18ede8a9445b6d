//! # tpgen-core
//!
//! Core traits and types for the tpgen test-plan generation engine.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions shared by the
//! provider and orchestration layers:
//!
//! - [`ChatModel`] - The single-attempt chat-completion boundary
//! - [`GenerationOptions`] - Typed, validated per-run configuration
//! - [`SectionCatalog`] - The fixed ordered section list of the document
//! - [`Feature`] / [`parse_features`] - Extracted feature records and the
//!   permissive reply parser
//! - [`TpgError`] / [`Result`] - Unified error handling

pub mod catalog;
pub mod error;
pub mod feature;
pub mod model;
pub mod options;

pub use catalog::{
    DEFAULT_SECTIONS, SECTION_APPROVALS, SECTION_ENVIRONMENTAL_NEEDS,
    SECTION_FEATURES_NOT_TO_BE_TESTED, SECTION_FEATURES_TO_BE_TESTED, SECTION_GLOSSARY,
    SECTION_INTRODUCTION, SECTION_REFERENCES, SECTION_REMAINING_TEST_TASKS,
    SECTION_RESPONSIBILITIES, SECTION_SCHEDULE, SECTION_STAFFING_AND_TRAINING,
    SECTION_TEST_DELIVERABLES, SECTION_TEST_ESTIMATION, SECTION_TEST_PLAN_IDENTIFIER,
    SectionCatalog,
};
pub use error::{Result, TpgError};
pub use feature::{Feature, UNKNOWN_CRITICALITY, format_features, parse_features};
pub use model::{ChatMessage, ChatModel, ChatReply, ChatRequest, GenerateConfig, Role, TokenUsage};
pub use options::{
    ApprovalDate, Discipline, Domain, GenerationOptions, PersonRecord, TeamProfile, TechChoice,
    TechStack, TesterRole,
};
