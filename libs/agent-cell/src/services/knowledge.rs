// libs/agent-cell/src/services/knowledge.rs
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::AgentError;

pub const TOP_K: usize = 3;
pub const NO_MATCH: &str = "No relevant information found.";

/// Free-text query in, formatted clinic information out.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    async fn context_for(&self, query: &str) -> Result<String, AgentError>;
}

// ==============================================================================
// CLINIC INFORMATION FILE
// ==============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClinicInfo {
    clinic_details: ClinicDetails,
    insurance_and_billing: InsuranceAndBilling,
    visit_preparation: VisitPreparation,
    policies: BTreeMap<String, String>,
    appointment_types: BTreeMap<String, AppointmentTypeInfo>,
    common_questions: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClinicDetails {
    name: String,
    address: String,
    phone: String,
    email: String,
    hours: serde_json::Map<String, Value>,
    directions: String,
    parking: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InsuranceAndBilling {
    accepted_insurance: Vec<String>,
    payment_methods: Vec<String>,
    billing_policy: String,
    cancellation_fee: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VisitPreparation {
    first_visit_documents: Vec<String>,
    what_to_bring: Vec<String>,
    arrival_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppointmentTypeInfo {
    duration: Value,
    description: String,
    cost_range: String,
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn bullets(items: &[String]) -> String {
    items.iter().map(|item| format!("- {}", item)).collect::<Vec<_>>().join("\n")
}

impl ClinicInfo {
    fn into_passages(self) -> Vec<String> {
        let details = &self.clinic_details;
        let hours = details
            .hours
            .iter()
            .map(|(day, value)| format!("  {}: {}", day, plain(value)))
            .collect::<Vec<_>>()
            .join("\n");

        let mut passages = vec![
            format!(
                "Clinic Name: {}\nAddress: {}\nPhone: {}\nEmail: {}\nHours:\n{}",
                details.name, details.address, details.phone, details.email, hours
            ),
            format!("Directions: {}", details.directions),
            format!("Parking Information: {}", details.parking),
            format!(
                "Accepted Insurance Providers: {}",
                self.insurance_and_billing.accepted_insurance.join(", ")
            ),
            format!(
                "Payment Methods: {}\nBilling Policy: {}",
                self.insurance_and_billing.payment_methods.join(", "),
                self.insurance_and_billing.billing_policy
            ),
            format!("Cancellation Fee: {}", self.insurance_and_billing.cancellation_fee),
            format!(
                "First Visit Documents Required:\n{}",
                bullets(&self.visit_preparation.first_visit_documents)
            ),
            format!(
                "What to Bring to Your Appointment:\n{}",
                bullets(&self.visit_preparation.what_to_bring)
            ),
            format!("Arrival Time: {}", self.visit_preparation.arrival_time),
        ];

        passages.extend(
            self.policies
                .iter()
                .map(|(name, text)| format!("{}: {}", title_case(name), text)),
        );
        passages.extend(self.appointment_types.iter().map(|(name, info)| {
            format!(
                "Appointment Type: {}\nDuration: {} minutes\nDescription: {}\nCost: {}",
                title_case(name),
                plain(&info.duration),
                info.description,
                info.cost_range
            )
        }));
        passages.extend(
            self.common_questions
                .iter()
                .map(|(question, answer)| format!("Q: {}?\nA: {}", title_case(question), answer)),
        );

        passages
    }
}

// ==============================================================================
// LEXICAL RETRIEVAL
// ==============================================================================

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// Passages ranked by how many distinct query terms they contain. Ties keep
/// file order; passages sharing no term are dropped.
pub fn rank_passages<'a>(query: &str, passages: &'a [String], limit: usize) -> Vec<&'a str> {
    let query_terms = terms(query);
    let mut scored: Vec<(usize, usize, &str)> = passages
        .iter()
        .enumerate()
        .map(|(index, passage)| {
            let passage_terms = terms(passage);
            let score = query_terms.intersection(&passage_terms).count();
            (score, index, passage.as_str())
        })
        .filter(|(score, _, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().take(limit).map(|(_, _, passage)| passage).collect()
}

pub fn format_context(passages: &[&str]) -> String {
    if passages.is_empty() {
        return NO_MATCH.to_string();
    }

    let mut context = String::from("Here is relevant information from our clinic knowledge base:\n\n");
    for (index, passage) in passages.iter().enumerate() {
        context.push_str(&format!("{}. {}\n\n", index + 1, passage));
    }
    context.trim().to_string()
}

/// Clinic information file split into passages on first use.
///
/// A failed load is not cached, so the next question retries the file.
pub struct ClinicKnowledgeBase {
    path: PathBuf,
    passages: OnceCell<Vec<String>>,
}

impl ClinicKnowledgeBase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            passages: OnceCell::new(),
        }
    }

    pub fn from_passages(passages: Vec<String>) -> Self {
        Self {
            path: PathBuf::new(),
            passages: OnceCell::new_with(Some(passages)),
        }
    }

    async fn passages(&self) -> Result<&[String], AgentError> {
        let passages = self
            .passages
            .get_or_try_init(|| load_passages(&self.path))
            .await?;
        Ok(passages.as_slice())
    }
}

async fn load_passages(path: &Path) -> Result<Vec<String>, AgentError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AgentError::KnowledgeRetrieval(format!("cannot read {}: {}", path.display(), e))
    })?;
    let info: ClinicInfo = serde_json::from_str(&raw).map_err(|e| {
        AgentError::KnowledgeRetrieval(format!("invalid clinic information in {}: {}", path.display(), e))
    })?;

    let passages = info.into_passages();
    info!("Clinic knowledge base loaded: {} passages from {}", passages.len(), path.display());
    Ok(passages)
}

#[async_trait]
impl KnowledgeRetriever for ClinicKnowledgeBase {
    async fn context_for(&self, query: &str) -> Result<String, AgentError> {
        let passages = self.passages().await?;
        let ranked = rank_passages(query, passages, TOP_K);
        debug!("Knowledge lookup matched {} passages", ranked.len());
        Ok(format_context(&ranked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_info() -> ClinicInfo {
        serde_json::from_value(json!({
            "clinic_details": {
                "name": "HealthCare Plus Clinic",
                "address": "456 Medical Center Drive",
                "phone": "+1-555-123-4567",
                "hours": {"monday_friday": "8:00 AM - 6:00 PM", "sunday": "Closed"},
                "parking": "Free parking garage behind the building"
            },
            "insurance_and_billing": {
                "accepted_insurance": ["Aetna", "Blue Cross Blue Shield"]
            },
            "policies": {"late_arrival": "Patients more than 15 minutes late may be rescheduled."},
            "common_questions": {"do_you_offer_telehealth": "Yes, for follow-up visits."}
        }))
        .unwrap()
    }

    #[test]
    fn test_passages_cover_each_section() {
        let passages = sample_info().into_passages();

        assert!(passages[0].starts_with("Clinic Name: HealthCare Plus Clinic"));
        assert!(passages[0].contains("sunday: Closed"));
        assert!(passages.iter().any(|p| p == "Accepted Insurance Providers: Aetna, Blue Cross Blue Shield"));
        assert!(passages.iter().any(|p| p.starts_with("Late Arrival: ")));
        assert!(passages.iter().any(|p| p.starts_with("Q: Do You Offer Telehealth?")));
    }

    #[test]
    fn test_ranking_prefers_more_shared_terms() {
        let passages = sample_info().into_passages();
        let ranked = rank_passages("Is there free parking at the garage?", &passages, TOP_K);

        assert_eq!(ranked[0], "Parking Information: Free parking garage behind the building");
    }

    #[test]
    fn test_no_shared_terms_yields_fallback_text() {
        let passages = sample_info().into_passages();
        let ranked = rank_passages("xyzzy", &passages, TOP_K);

        assert!(ranked.is_empty());
        assert_eq!(format_context(&ranked), NO_MATCH);
    }

    #[test]
    fn test_context_is_numbered() {
        let context = format_context(&["first", "second"]);
        assert_eq!(
            context,
            "Here is relevant information from our clinic knowledge base:\n\n1. first\n\n2. second"
        );
    }
}
