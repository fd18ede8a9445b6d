//! Prompt construction for every section kind.
//!
//! Each builder pairs a fixed system instruction with a user message
//! assembled from the run options, and carries the token/temperature
//! limits for that section. Builders are pure string assembly; no
//! validation happens here (the options are validated once before
//! dispatch) and no builder ever fails.

use tpgen_core::{
    ChatMessage, ChatRequest, Discipline, Feature, GenerateConfig, GenerationOptions, TesterRole,
    format_features,
};

/// A model-agnostic prompt: messages plus generation limits. The
/// dispatcher binds it to a concrete model id at call time.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub messages: Vec<ChatMessage>,
    pub config: GenerateConfig,
}

impl Prompt {
    fn new(system: impl Into<String>, user: String, config: GenerateConfig) -> Self {
        Self { messages: vec![ChatMessage::system(system), ChatMessage::user(user)], config }
    }

    pub fn into_request(self, model: &str) -> ChatRequest {
        ChatRequest::new(model, self.messages).with_config(self.config)
    }
}

/// One-shot feature/criticality extraction over the requirement corpus.
pub fn extract_features(corpus: &str) -> Prompt {
    Prompt::new(
        "Identify and evaluate the criticality of main features in the user stories. \
         Respond with a comma-separated list of \"feature: criticality\" pairs.",
        format!(
            "User stories:\n\n{corpus}\n\nList the main features and assess their criticality."
        ),
        GenerateConfig { max_tokens: Some(250), temperature: None },
    )
}

/// Fallback prompt for catalog sections without a dedicated builder.
pub fn generic_section(
    name: &str,
    options: &GenerationOptions,
    features: &[Feature],
    corpus: &str,
) -> Prompt {
    Prompt::new(
        format!("Generate the {name} section with a focus on essential requirements."),
        format!(
            "Section: {name}\n\
             Application Name: {app}\n\
             Domain: {domain}\n\
             Main Features: {features}\n\
             Keywords: {keywords}\n\
             User Stories: {corpus}\n\
             Please provide concise details for this section focusing on the needs for this \
             \"{name}\" of a test plan document, keeping in mind the domain and main features.",
            app = options.application_name,
            domain = options.domain,
            features = format_features(features),
            keywords = options.keywords_joined(),
        ),
        GenerateConfig::new(1000, 0.7),
    )
}

pub fn plan_identifier(options: &GenerationOptions) -> Prompt {
    Prompt::new(
        "Create a unique identifier for the test plan.",
        format!(
            "Generate a unique identifier and creator information for a test plan.\n\
             Application Name: {app}\n\
             Created By: {created_by}\n\
             Date: {date}\n\
             Please provide a test plan identifier that includes a unique number and details \
             about who created the test plan and when it was created.",
            app = options.application_name,
            created_by = options.created_by,
            date = options.creation_date.format("%Y-%m-%d"),
        ),
        GenerateConfig::new(300, 0.5),
    )
}

pub fn introduction(options: &GenerationOptions) -> Prompt {
    Prompt::new(
        "Generate an introduction for the test plan.",
        format!(
            "Application Name: {app}\n\
             Domain: {domain}\n\
             Tech Stack: {stack}\n\
             Describe the application's main functionality, its purpose within the {domain} \
             domain, and the overall goals of this test plan.",
            app = options.application_name,
            domain = options.domain,
            stack = options.tech_stack.describe(),
        ),
        GenerateConfig::new(500, 0.5),
    )
}

/// Rationale for features deliberately excluded from testing.
pub fn excluded_features(options: &GenerationOptions, features: &[Feature]) -> Prompt {
    Prompt::new(
        "Generate the Features not to be Tested section focused on non-testing rationale.",
        format!(
            "Application Name: {app}\n\
             Domain: {domain}\n\
             Current Features: {features}\n\
             Keywords: {keywords}\n\
             Identify features or aspects of the application that will not be tested in this \
             plan and explain the rationale for excluding each of them.",
            app = options.application_name,
            domain = options.domain,
            features = format_features(features),
            keywords = options.keywords_joined(),
        ),
        GenerateConfig::new(1000, 0.7),
    )
}

/// Per-feature testing rationale used by the Features to be Tested fan-out.
pub fn feature_detail(feature: &Feature) -> Prompt {
    Prompt::new(
        "Generate a detailed explanation for testing a feature.",
        format!(
            "Feature: {name}\n\
             Criticality: {criticality}\n\
             Explain why this feature is critical to be tested and what risks are involved \
             if it is not thoroughly tested.",
            name = feature.name,
            criticality = feature.criticality,
        ),
        GenerateConfig::new(500, 0.5),
    )
}

pub fn test_deliverables(options: &GenerationOptions) -> Prompt {
    Prompt::new(
        "Generate a comprehensive list of testing deliverables with descriptions.",
        format!(
            "Application Name: {app}\n\
             Domain: {domain}\n\
             List the deliverables of the testing process, such as the test plan itself, test \
             cases, defect reports, and summary reports, with a short description of each.",
            app = options.application_name,
            domain = options.domain,
        ),
        GenerateConfig::new(1000, 0.5),
    )
}

pub fn environmental_needs(options: &GenerationOptions) -> Prompt {
    Prompt::new(
        "Generate detailed requirements for the testing environments necessary for the project.",
        format!(
            "Application Name: {app}\n\
             Domain: {domain}\n\
             Tech Stack: {stack}\n\
             Describe the hardware, software, network and data requirements of the test \
             environments, considering the technologies in use.",
            app = options.application_name,
            domain = options.domain,
            stack = options.tech_stack.describe(),
        ),
        GenerateConfig::new(1000, 0.5),
    )
}

pub fn remaining_tasks(options: &GenerationOptions) -> Prompt {
    Prompt::new(
        "Generate a detailed list of remaining testing tasks.",
        format!(
            "Application Name: {app}\n\
             Domain: {domain}\n\
             Tech Stack: {stack}\n\
             List the testing tasks that remain to be completed before this plan can be \
             executed, including preparation and follow-up activities.",
            app = options.application_name,
            domain = options.domain,
            stack = options.tech_stack.describe(),
        ),
        GenerateConfig::new(500, 0.5),
    )
}

pub fn staffing(options: &GenerationOptions, features: &[Feature], corpus: &str) -> Prompt {
    Prompt::new(
        "Calculate the required testing resources and training needs.",
        format!(
            "Application Name: {app}\n\
             Domain: {domain}\n\
             Main Features: {features}\n\
             User Stories: {corpus}\n\
             Determine the staffing needed to execute this test plan and any training \
             required for the team, considering the features and their criticality.",
            app = options.application_name,
            domain = options.domain,
            features = format_features(features),
        ),
        GenerateConfig::new(500, 0.5),
    )
}

/// Schedule for one testing discipline, part of the Schedule fan-out.
pub fn schedule(options: &GenerationOptions, discipline: Discipline) -> Prompt {
    Prompt::new(
        "Generate a detailed testing schedule.",
        format!(
            "Section: Schedule\n\
             Application Name: {app}\n\
             Domain: {domain}\n\
             Generate a detailed schedule for {discipline}, covering its major milestones \
             from test design through execution and reporting.",
            app = options.application_name,
            domain = options.domain,
        ),
        GenerateConfig::new(500, 0.5),
    )
}

/// Responsibilities for one active role, part of the Responsibilities
/// fan-out.
pub fn responsibilities(role: TesterRole, count: u32) -> Prompt {
    Prompt::new(
        "Generate detailed responsibilities for testing roles.",
        format!(
            "Role: {role}\n\
             Count: {count}\n\
             Generate detailed responsibilities for the {role} involved in the testing \
             process.",
        ),
        GenerateConfig::new(500, 0.5),
    )
}

/// Effort estimation for one discipline, part of the Test Estimation
/// fan-out.
pub fn estimation(discipline: Discipline, features: &[Feature], testers: u32) -> Prompt {
    Prompt::new(
        "Calculate testing effort based on the details provided.",
        format!(
            "Estimate the effort in man-days needed for {discipline} given the following \
             details:\n\
             Features and their descriptions: {features}\n\
             Number of Testers: {testers}\n\
             Please provide a detailed estimation considering the complexity and workload.",
            features = format_features(features),
        ),
        GenerateConfig::new(500, 0.5),
    )
}

pub fn glossary(corpus: &str) -> Prompt {
    Prompt::new(
        "Extract and define technical terms for the glossary section.",
        format!(
            "User Stories: {corpus}\n\
             Extract the technical and domain terms used above and provide a short \
             definition for each.",
        ),
        GenerateConfig::new(500, 0.5),
    )
}
