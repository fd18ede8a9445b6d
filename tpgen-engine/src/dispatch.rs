//! Sequential section dispatch: one catalog walk, one accumulated plan.
//!
//! Sections fall into three shapes:
//!
//! - locally assembled (References, Approvals): no model call at all.
//! - single-call: one prompt, one retried completion.
//! - fan-out: one retried completion per feature, discipline, or role,
//!   joined into a single section body.
//!
//! Failure handling is per section. Structural sections escalate an
//! exhausted budget and abort the run; narrative and fan-out sections
//! degrade to visible placeholder text so one flaky section cannot sink
//! an otherwise complete document.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tpgen_core::{
    ChatModel, Discipline, Feature, GenerationOptions, Result, SECTION_APPROVALS,
    SECTION_ENVIRONMENTAL_NEEDS, SECTION_FEATURES_NOT_TO_BE_TESTED,
    SECTION_FEATURES_TO_BE_TESTED, SECTION_GLOSSARY, SECTION_INTRODUCTION, SECTION_REFERENCES,
    SECTION_REMAINING_TEST_TASKS, SECTION_RESPONSIBILITIES, SECTION_SCHEDULE,
    SECTION_STAFFING_AND_TRAINING, SECTION_TEST_DELIVERABLES, SECTION_TEST_ESTIMATION,
    SECTION_TEST_PLAN_IDENTIFIER, SectionCatalog, TesterRole, TpgError,
};
use tpgen_model::{RetryConfig, execute_with_retry};

use crate::assemble;
use crate::extract::FeatureExtractor;
use crate::prompt::{self, Prompt};

/// Disciplines the Test Estimation section covers, in render order.
const ESTIMATED_DISCIPLINES: [Discipline; 3] =
    [Discipline::Automation, Discipline::Performance, Discipline::Security];

/// Disciplines the Schedule section covers; functional is always present,
/// the rest are gated by the team flags.
const SCHEDULED_DISCIPLINES: [Discipline; 4] = [
    Discipline::Functional,
    Discipline::Automation,
    Discipline::Performance,
    Discipline::Security,
];

/// Per-call-site retry budgets. Structural sections get a tighter budget
/// than the bulk narrative ones, and per-feature calls the tightest, so a
/// long feature list cannot multiply a provider outage into hundreds of
/// attempts.
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Feature/criticality extraction.
    pub extraction: RetryConfig,
    /// Test Plan Identifier.
    pub identifier: RetryConfig,
    /// Generic catalog sections and Features not to be Tested.
    pub section: RetryConfig,
    /// Narrative sections that degrade to placeholders, plus the
    /// deliverables/environment/staffing group.
    pub narrative: RetryConfig,
    /// Per-discipline and per-role fan-out calls.
    pub fan_out: RetryConfig,
    /// Per-feature detail calls.
    pub feature_detail: RetryConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            extraction: RetryConfig::default(),
            identifier: RetryConfig::default(),
            section: RetryConfig::default().with_max_attempts(10),
            narrative: RetryConfig::default(),
            fan_out: RetryConfig::default(),
            feature_detail: RetryConfig::default().with_max_attempts(3),
        }
    }
}

impl DispatchConfig {
    /// Keep the attempt budgets but drop every backoff sleep. Used by
    /// tests and offline scripted runs.
    #[must_use]
    pub fn without_backoff(mut self) -> Self {
        for retry in [
            &mut self.extraction,
            &mut self.identifier,
            &mut self.section,
            &mut self.narrative,
            &mut self.fan_out,
            &mut self.feature_detail,
        ] {
            retry.base_delay = Duration::ZERO;
            retry.max_delay = Duration::ZERO;
        }
        self
    }
}

/// Per-section generation metadata for run reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRecord {
    pub name: String,
    pub word_count: usize,
    pub elapsed: Duration,
}

/// The accumulated plan: section bodies in catalog order plus the
/// per-section records gathered during the walk.
#[derive(Debug, Default)]
pub struct TestPlan {
    pub sections: IndexMap<String, String>,
    pub records: Vec<SectionRecord>,
}

impl TestPlan {
    pub fn total_words(&self) -> usize {
        self.records.iter().map(|record| record.word_count).sum()
    }

    /// Render the plan as a markdown document, one `##` heading per
    /// section, in catalog order.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for (name, content) in &self.sections {
            out.push_str("## ");
            out.push_str(name);
            out.push_str("\n\n");
            out.push_str(content);
            out.push_str("\n\n");
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    PlanIdentifier,
    References,
    Approvals,
    Introduction,
    FeaturesToBeTested,
    FeaturesNotToBeTested,
    TestDeliverables,
    RemainingTestTasks,
    EnvironmentalNeeds,
    StaffingAndTraining,
    Responsibilities,
    Schedule,
    TestEstimation,
    Glossary,
    Generic,
}

fn section_kind(name: &str) -> SectionKind {
    match name {
        SECTION_TEST_PLAN_IDENTIFIER => SectionKind::PlanIdentifier,
        SECTION_REFERENCES => SectionKind::References,
        SECTION_APPROVALS => SectionKind::Approvals,
        SECTION_INTRODUCTION => SectionKind::Introduction,
        SECTION_FEATURES_TO_BE_TESTED => SectionKind::FeaturesToBeTested,
        SECTION_FEATURES_NOT_TO_BE_TESTED => SectionKind::FeaturesNotToBeTested,
        SECTION_TEST_DELIVERABLES => SectionKind::TestDeliverables,
        SECTION_REMAINING_TEST_TASKS => SectionKind::RemainingTestTasks,
        SECTION_ENVIRONMENTAL_NEEDS => SectionKind::EnvironmentalNeeds,
        SECTION_STAFFING_AND_TRAINING => SectionKind::StaffingAndTraining,
        SECTION_RESPONSIBILITIES => SectionKind::Responsibilities,
        SECTION_SCHEDULE => SectionKind::Schedule,
        SECTION_TEST_ESTIMATION => SectionKind::TestEstimation,
        SECTION_GLOSSARY => SectionKind::Glossary,
        _ => SectionKind::Generic,
    }
}

/// Walks the section catalog strictly in order against one model,
/// accumulating section bodies into a [`TestPlan`].
pub struct PlanGenerator {
    model: Arc<dyn ChatModel>,
    catalog: SectionCatalog,
    config: DispatchConfig,
}

impl PlanGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model, catalog: SectionCatalog::default(), config: DispatchConfig::default() }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: SectionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn with_dispatch_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate the full plan for one validated options bag and
    /// requirement corpus.
    ///
    /// Sections are generated strictly sequentially in catalog order.
    /// The returned error is either a config rejection or an escalated
    /// failure from a structural section; degradable sections never
    /// surface errors here.
    pub async fn generate(&self, options: &GenerationOptions, corpus: &str) -> Result<TestPlan> {
        options.validate()?;

        let extractor =
            FeatureExtractor::new().with_retry_config(self.config.extraction.clone());
        let features = extractor.extract(&self.model, corpus).await;

        let mut plan = TestPlan::default();
        let total = self.catalog.len();

        for (position, name) in self.catalog.iter().enumerate() {
            tracing::info!(section = name, position = position + 1, total, "generating section");
            let started = Instant::now();
            let content = self.generate_section(name, options, &features, corpus).await?;
            let elapsed = started.elapsed();
            let word_count = content.split_whitespace().count();
            tracing::debug!(
                section = name,
                word_count,
                elapsed_ms = elapsed.as_millis() as u64,
                "section complete"
            );

            plan.records.push(SectionRecord { name: name.to_string(), word_count, elapsed });
            plan.sections.insert(name.to_string(), content);
        }

        Ok(plan)
    }

    async fn generate_section(
        &self,
        name: &str,
        options: &GenerationOptions,
        features: &[Feature],
        corpus: &str,
    ) -> Result<String> {
        match section_kind(name) {
            SectionKind::References => {
                Ok(assemble::render_references(&options.document_names, &options.reference_urls))
            }
            SectionKind::Approvals => {
                Ok(assemble::render_approvals(&options.approvers, &options.reviewers))
            }
            SectionKind::PlanIdentifier => {
                self.call(&self.config.identifier, prompt::plan_identifier(options)).await
            }
            SectionKind::Generic => {
                self.call(&self.config.section, prompt::generic_section(name, options, features, corpus))
                    .await
            }
            SectionKind::FeaturesNotToBeTested => {
                self.call(&self.config.section, prompt::excluded_features(options, features)).await
            }
            SectionKind::TestDeliverables => {
                self.call(&self.config.narrative, prompt::test_deliverables(options)).await
            }
            SectionKind::EnvironmentalNeeds => {
                self.call(&self.config.narrative, prompt::environmental_needs(options)).await
            }
            SectionKind::StaffingAndTraining => {
                self.call(&self.config.narrative, prompt::staffing(options, features, corpus)).await
            }
            SectionKind::Introduction => {
                Ok(self.narrative_or_placeholder(prompt::introduction(options), "introduction").await)
            }
            SectionKind::Glossary => {
                Ok(self.narrative_or_placeholder(prompt::glossary(corpus), "glossary").await)
            }
            SectionKind::RemainingTestTasks => Ok(self
                .narrative_or_placeholder(prompt::remaining_tasks(options), "remaining test tasks")
                .await),
            SectionKind::FeaturesToBeTested => Ok(self.features_to_be_tested(features).await),
            SectionKind::TestEstimation => Ok(self.test_estimation(options, features).await),
            SectionKind::Schedule => Ok(self.schedule(options).await),
            SectionKind::Responsibilities => Ok(self.responsibilities(options).await),
        }
    }

    /// One retried completion, trimmed.
    async fn call(&self, retry: &RetryConfig, prompt: Prompt) -> Result<String> {
        let request = prompt.into_request(self.model.name());
        let reply = execute_with_retry(retry, || {
            let model = Arc::clone(&self.model);
            let request = request.clone();
            async move { model.complete(request).await }
        })
        .await?;
        Ok(reply.text.trim().to_string())
    }

    /// Narrative sections degrade to a visible placeholder instead of
    /// aborting the run.
    async fn narrative_or_placeholder(&self, prompt: Prompt, label: &str) -> String {
        match self.call(&self.config.narrative, prompt).await {
            Ok(text) => text,
            Err(error @ TpgError::Unexpected(_)) => {
                tracing::error!(section = label, error = %error, "section failed");
                format!("An unexpected error occurred while generating the {label} section.")
            }
            Err(error) => {
                tracing::error!(section = label, error = %error, "section failed");
                format!("Failed to generate the {label} section after multiple attempts.")
            }
        }
    }

    async fn features_to_be_tested(&self, features: &[Feature]) -> String {
        if features.is_empty() {
            return "No features were extracted from the requirements, so feature-level \
                    testing details are not available."
                .to_string();
        }

        let mut entries = Vec::with_capacity(features.len());
        for feature in features {
            let outcome =
                self.call(&self.config.feature_detail, prompt::feature_detail(feature)).await;
            let entry = match outcome {
                Ok(detail) => format!("{} ({}): {detail}", feature.name, feature.criticality),
                Err(error) => {
                    tracing::warn!(feature = %feature.name, error = %error, "feature detail failed");
                    format!(
                        "{} ({}): Detailed explanation could not be generated after multiple \
                         attempts.",
                        feature.name, feature.criticality
                    )
                }
            };
            entries.push(entry);
        }
        entries.join("\n\n")
    }

    async fn test_estimation(&self, options: &GenerationOptions, features: &[Feature]) -> String {
        let mut blocks = Vec::with_capacity(ESTIMATED_DISCIPLINES.len());
        for discipline in ESTIMATED_DISCIPLINES {
            let label = discipline.label();
            if !options.team.discipline_enabled(discipline) {
                blocks.push(format!(
                    "Estimation for {label} was not done as it was not chosen to be estimated."
                ));
                continue;
            }

            let testers = options.team.discipline_headcount(discipline);
            let outcome = self
                .call(&self.config.fan_out, prompt::estimation(discipline, features, testers))
                .await;
            let block = match outcome {
                Ok(text) => format!("{label} Estimated Effort: {text}"),
                Err(error @ TpgError::Unexpected(_)) => {
                    tracing::error!(discipline = label, error = %error, "estimation failed");
                    format!("{label} Estimation error, please check logs.")
                }
                Err(error) => {
                    tracing::error!(discipline = label, error = %error, "estimation failed");
                    format!("{label} Estimation failed after multiple attempts.")
                }
            };
            blocks.push(block);
        }
        blocks.join("\n\n")
    }

    async fn schedule(&self, options: &GenerationOptions) -> String {
        let mut blocks = Vec::new();
        for discipline in SCHEDULED_DISCIPLINES {
            if !options.team.discipline_enabled(discipline) {
                continue;
            }
            let label = discipline.label();
            let outcome =
                self.call(&self.config.fan_out, prompt::schedule(options, discipline)).await;
            let block = match outcome {
                Ok(text) => format!("{label} Schedule:\n{text}"),
                Err(error) => {
                    tracing::error!(discipline = label, error = %error, "schedule failed");
                    format!("{label} Schedule: Error generating schedule.")
                }
            };
            blocks.push(block);
        }
        blocks.join("\n\n")
    }

    async fn responsibilities(&self, options: &GenerationOptions) -> String {
        let active: Vec<(TesterRole, u32)> = TesterRole::ALL
            .iter()
            .map(|role| (*role, options.team.headcount(*role)))
            .filter(|(_, count)| *count > 0)
            .collect();

        if active.is_empty() {
            return "No responsibilities assigned due to lack of testing personnel.".to_string();
        }

        let mut blocks = Vec::with_capacity(active.len());
        for (role, count) in active {
            let label = role.label();
            let outcome =
                self.call(&self.config.fan_out, prompt::responsibilities(role, count)).await;
            let block = match outcome {
                Ok(text) => format!("{label} ({count} members): {text}"),
                Err(error) => {
                    tracing::error!(role = label, error = %error, "responsibilities failed");
                    format!("{label} ({count} members): Error in generating responsibilities.")
                }
            };
            blocks.push(block);
        }
        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tpgen_core::{Domain, TeamProfile};
    use tpgen_model::ScriptedModel;

    fn options() -> GenerationOptions {
        GenerationOptions::new(
            "Storefront",
            "QA Lead",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            Domain::ECommerce,
        )
    }

    fn generator(model: ScriptedModel, sections: &[&str]) -> (PlanGenerator, Arc<ScriptedModel>) {
        let model = Arc::new(model);
        let catalog =
            SectionCatalog::new(sections.iter().map(|s| (*s).to_string()).collect()).unwrap();
        let generator = PlanGenerator::new(Arc::clone(&model) as Arc<dyn ChatModel>)
            .with_catalog(catalog)
            .with_dispatch_config(DispatchConfig::default().without_backoff());
        (generator, model)
    }

    #[tokio::test]
    async fn test_local_sections_only_cost_the_extraction_call() {
        // No scripted replies: extraction fails with Unexpected and
        // degrades to an empty feature list.
        let (generator, model) =
            generator(ScriptedModel::new("scripted"), &["References", "Approvals"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert_eq!(model.request_count(), 1);
        assert_eq!(
            plan.sections["References"],
            "Documents:\nNo documents available.\n\nNo referenced URLs provided."
        );
        assert_eq!(
            plan.sections["Approvals"],
            "Approvers:\nNo approvers recorded.\n\nReviewers:\nNo reviewers recorded."
        );
    }

    #[tokio::test]
    async fn test_identifier_exhaustion_aborts_the_run() {
        let mut scripted = ScriptedModel::new("scripted").with_reply("Login: High");
        for _ in 0..5 {
            scripted = scripted.with_error(TpgError::Provider("boom".to_string()));
        }
        let (generator, _) = generator(scripted, &["Test Plan Identifier"]);

        let error = generator.generate(&options(), "stories").await.unwrap_err();
        assert!(matches!(error, TpgError::Exhausted { attempts: 5, .. }));
    }

    #[tokio::test]
    async fn test_introduction_degrades_to_placeholder() {
        let mut scripted = ScriptedModel::new("scripted").with_reply("Login: High");
        for _ in 0..5 {
            scripted = scripted.with_error(TpgError::Provider("boom".to_string()));
        }
        let (generator, _) = generator(scripted, &["Introduction"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert_eq!(
            plan.sections["Introduction"],
            "Failed to generate the introduction section after multiple attempts."
        );
    }

    #[tokio::test]
    async fn test_unexpected_introduction_failure_has_distinct_placeholder() {
        let scripted = ScriptedModel::new("scripted")
            .with_reply("Login: High")
            .with_error(TpgError::Unexpected("socket closed".to_string()));
        let (generator, model) = generator(scripted, &["Introduction"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert_eq!(
            plan.sections["Introduction"],
            "An unexpected error occurred while generating the introduction section."
        );
        // Unexpected errors are not retried.
        assert_eq!(model.request_count(), 2);
    }

    #[tokio::test]
    async fn test_feature_fan_out_mixes_details_and_placeholders() {
        let mut scripted = ScriptedModel::new("scripted")
            .with_reply("Login: High, Checkout")
            .with_reply("Login guards every session.");
        for _ in 0..3 {
            scripted = scripted.with_error(TpgError::Provider("boom".to_string()));
        }
        let (generator, model) = generator(scripted, &["Features to be Tested"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert_eq!(
            plan.sections["Features to be Tested"],
            "Login (High): Login guards every session.\n\n\
             Checkout (Unknown): Detailed explanation could not be generated after multiple \
             attempts."
        );
        // 1 extraction + 1 detail + 3 attempts for the second feature.
        assert_eq!(model.request_count(), 5);
    }

    #[tokio::test]
    async fn test_empty_feature_list_skips_the_fan_out() {
        let (generator, model) =
            generator(ScriptedModel::new("scripted"), &["Features to be Tested"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert!(plan.sections["Features to be Tested"].contains("No features were extracted"));
        assert_eq!(model.request_count(), 1);
    }

    #[tokio::test]
    async fn test_estimation_skips_disabled_disciplines_without_calls() {
        let scripted = ScriptedModel::new("scripted").with_reply("Login: High");
        let (generator, model) = generator(scripted, &["Test Estimation"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        let section = &plan.sections["Test Estimation"];
        for label in ["Automation Testing", "Performance Testing", "Security Testing"] {
            assert!(section.contains(&format!(
                "Estimation for {label} was not done as it was not chosen to be estimated."
            )));
        }
        assert_eq!(model.request_count(), 1);
    }

    #[tokio::test]
    async fn test_schedule_always_covers_functional() {
        let scripted = ScriptedModel::new("scripted")
            .with_reply("Login: High")
            .with_reply("Week 1: design. Week 2: execute.");
        let (generator, model) = generator(scripted, &["Schedule"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert_eq!(
            plan.sections["Schedule"],
            "Functional Testing Schedule:\nWeek 1: design. Week 2: execute."
        );
        assert_eq!(model.request_count(), 2);
    }

    #[tokio::test]
    async fn test_schedule_failure_renders_error_line() {
        let mut scripted = ScriptedModel::new("scripted").with_reply("Login: High");
        for _ in 0..5 {
            scripted = scripted.with_error(TpgError::Provider("boom".to_string()));
        }
        let (generator, _) = generator(scripted, &["Schedule"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert_eq!(
            plan.sections["Schedule"],
            "Functional Testing Schedule: Error generating schedule."
        );
    }

    #[tokio::test]
    async fn test_responsibilities_without_staff_makes_no_calls() {
        let scripted = ScriptedModel::new("scripted").with_reply("Login: High");
        let (generator, model) = generator(scripted, &["Responsibilities"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        assert_eq!(
            plan.sections["Responsibilities"],
            "No responsibilities assigned due to lack of testing personnel."
        );
        assert_eq!(model.request_count(), 1);
    }

    #[tokio::test]
    async fn test_responsibilities_cover_each_active_role() {
        let scripted = ScriptedModel::new("scripted")
            .with_reply("Login: High")
            .with_default_reply("Owns the area.");
        let (generator, model) = generator(scripted, &["Responsibilities"]);
        let opts = options().with_team(TeamProfile {
            functional_testers: 2,
            test_leads: 1,
            ..Default::default()
        });

        let plan = generator.generate(&opts, "stories").await.unwrap();
        assert_eq!(
            plan.sections["Responsibilities"],
            "Functional Testers (2 members): Owns the area.\n\n\
             Test Lead (1 members): Owns the area."
        );
        assert_eq!(model.request_count(), 3);
    }

    #[tokio::test]
    async fn test_invalid_options_fail_before_any_call() {
        let (generator, model) = generator(ScriptedModel::new("scripted"), &["References"]);
        let mut opts = options();
        opts.application_name = String::new();

        let error = generator.generate(&opts, "stories").await.unwrap_err();
        assert!(matches!(error, TpgError::Config(_)));
        assert_eq!(model.request_count(), 0);
    }

    #[tokio::test]
    async fn test_records_track_catalog_order_and_word_counts() {
        let scripted = ScriptedModel::new("scripted")
            .with_reply("Login: High")
            .with_default_reply("three short words");
        let (generator, _) = generator(scripted, &["References", "Introduction", "Glossary"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        let names: Vec<&str> = plan.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["References", "Introduction", "Glossary"]);
        assert_eq!(plan.records[1].word_count, 3);
        assert!(plan.total_words() > 0);
    }

    #[tokio::test]
    async fn test_markdown_rendering_keeps_order() {
        let scripted = ScriptedModel::new("scripted")
            .with_reply("Login: High")
            .with_default_reply("Body text.");
        let (generator, _) = generator(scripted, &["Introduction", "Glossary"]);

        let plan = generator.generate(&options(), "stories").await.unwrap();
        let markdown = plan.to_markdown();
        let intro = markdown.find("## Introduction").unwrap();
        let glossary = markdown.find("## Glossary").unwrap();
        assert!(intro < glossary);
        assert!(markdown.contains("Body text."));
    }
}
