//! Locally assembled sections that never touch the model.

use tpgen_core::PersonRecord;

/// Render the References section from document names and URLs. Both lists
/// are 1-indexed; empty lists render fixed notices so the section is never
/// blank.
pub fn render_references(document_names: &[String], reference_urls: &[String]) -> String {
    let mut text = String::from("Documents:\n");

    if document_names.is_empty() {
        text.push_str("No documents available.");
    } else {
        let lines: Vec<String> = document_names
            .iter()
            .enumerate()
            .map(|(index, name)| format!("{}. {name}", index + 1))
            .collect();
        text.push_str(&lines.join("\n"));
    }

    if reference_urls.is_empty() {
        text.push_str("\n\nNo referenced URLs provided.");
    } else {
        text.push_str("\n\nReferenced URLs:\n");
        let lines: Vec<String> = reference_urls
            .iter()
            .enumerate()
            .map(|(index, url)| format!("{}. {url}", index + 1))
            .collect();
        text.push_str(&lines.join("\n"));
    }

    text
}

/// Render the Approvals section from approver and reviewer records.
pub fn render_approvals(approvers: &[PersonRecord], reviewers: &[PersonRecord]) -> String {
    let mut text = String::from("Approvers:\n");
    text.push_str(&render_people(approvers, "No approvers recorded."));
    text.push_str("\n\nReviewers:\n");
    text.push_str(&render_people(reviewers, "No reviewers recorded."));
    text
}

fn render_people(people: &[PersonRecord], empty_notice: &str) -> String {
    if people.is_empty() {
        return empty_notice.to_string();
    }
    people.iter().map(PersonRecord::to_string).collect::<Vec<_>>().join("\n")
}
