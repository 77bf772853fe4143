//! Built-in stage prompts.
//!
//! [`TemplatePromptProvider`] renders a prompt from a [`PromptSelector`] by
//! stacking fixed paragraphs: stage instructions, the tone for the leader's
//! style, focus-area emphasis, directness phrasing, intervention guidance,
//! and the JSON response contract every language-model stage validates
//! against. Output is a pure function of the selector.

use pipeline::{InterventionPreference, PromptProvider, PromptSelector, StageKind, ToneTemplate};

/// Directness at or above this asks for imperative recommendations.
const DIRECT_THRESHOLD: f64 = 0.7;

/// Directness at or below this asks for suggestions and questions.
const GENTLE_THRESHOLD: f64 = 0.3;

const RESPONSE_CONTRACT: &str = "\
Respond with a single JSON object and nothing else:
{
  \"score\": <number from 0 to 10, higher is healthier>,
  \"key_findings\": [
    \"<plain observation>\",
    {\"text\": \"<recommended action>\", \"actionable\": true, \"urgency\": \"immediate\" | \"thirty_day\" | \"strategic\"}
  ],
  \"reasoning\": \"<why the score is what it is>\"
}";

/// Prompt provider backed by the built-in templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePromptProvider;

impl TemplatePromptProvider {
    /// Creates the provider.
    pub fn new() -> Self {
        Self
    }
}

impl PromptProvider for TemplatePromptProvider {
    fn template_for(&self, selector: &PromptSelector) -> String {
        if let Some(custom) = &selector.custom_override {
            return custom.clone();
        }

        let mut sections = vec![
            format!("Stage: {}", selector.stage),
            stage_instructions(selector.stage).to_string(),
            tone_paragraph(selector.tone).to_string(),
        ];
        if !selector.focus_areas.is_empty() {
            let areas = selector
                .focus_areas
                .iter()
                .map(|a| a.as_str().replace('_', " "))
                .collect::<Vec<_>>()
                .join(", ");
            sections.push(format!(
                "The leader is focused on: {areas}. Give findings in these areas extra attention."
            ));
        }
        let directness = selector.directness.as_f64();
        sections.push(format!(
            "Directness level: {directness:.2} (0 = gentle, 1 = blunt). {}",
            directness_paragraph(directness)
        ));
        sections.push(intervention_paragraph(selector.intervention_preference).to_string());
        sections.push(RESPONSE_CONTRACT.to_string());
        sections.join("\n\n")
    }
}

fn stage_instructions(stage: StageKind) -> &'static str {
    match stage {
        StageKind::LeadershipAnalysis => {
            "You are an executive communication analyst. Judge how effectively leadership \
             communicates: clarity of direction, transparency about decisions, and whether \
             messages invite the organization in or talk past it."
        }
        StageKind::TeamHealthAnalysis => {
            "You are an organizational health analyst. Judge team alignment and engagement: \
             balance of participation, whether concerns are raised safely, and whether \
             discussion converges on shared decisions."
        }
        StageKind::RiskDetection => {
            "You are an organizational risk analyst. Look for early-warning signals such as \
             disengagement, burnout, unresolved conflict, execution slippage, and attrition \
             risk. Weigh the prior leadership and team-health findings included in the input. \
             A high score means low risk."
        }
        StageKind::Preprocess | StageKind::Summary => {
            "You are an organizational communication analyst. Summarize the communication \
             health shown in the input."
        }
    }
}

fn tone_paragraph(tone: ToneTemplate) -> &'static str {
    match tone {
        ToneTemplate::Consensus => {
            "The leader builds consensus. Frame findings around shared ownership and how \
             to bring people into decisions."
        }
        ToneTemplate::Decisive => {
            "The leader sets direction. Lead with outcomes and the decision required; keep \
             background short."
        }
        ToneTemplate::Developmental => {
            "The leader develops people. Frame findings as growth opportunities for the \
             individuals and managers involved."
        }
        ToneTemplate::Horizon => {
            "The leader thinks in long horizons. Connect findings to strategic priorities and \
             organizational trajectory."
        }
    }
}

fn directness_paragraph(directness: f64) -> &'static str {
    if directness >= DIRECT_THRESHOLD {
        "State recommendations as direct imperatives. Do not soften bad news."
    } else if directness <= GENTLE_THRESHOLD {
        "Phrase recommendations as suggestions and open questions."
    } else {
        "Phrase recommendations plainly, with brief supporting context."
    }
}

fn intervention_paragraph(preference: InterventionPreference) -> &'static str {
    match preference {
        InterventionPreference::Coaching => {
            "Recommend interventions that work through managers with guidance and questions."
        }
        InterventionPreference::Directive => {
            "Recommend interventions where the leader steps in and directs the fix."
        }
        InterventionPreference::HandsOff => {
            "Recommend intervention only for critical issues; otherwise suggest what to monitor."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{CompanyName, LeaderName, LeadershipProfile, LeadershipStyle, ProfileAdapter};

    fn profile() -> LeadershipProfile {
        LeadershipProfile::new(
            LeaderName::new("Dana").unwrap(),
            CompanyName::new("Northwind").unwrap(),
        )
    }

    #[test]
    fn prompt_names_the_stage_and_carries_the_response_contract() {
        let selector = ProfileAdapter::new().prompt_for(StageKind::RiskDetection, &profile());

        let prompt = TemplatePromptProvider::new().template_for(&selector);

        assert!(prompt.starts_with("Stage: RiskDetection"));
        assert!(prompt.contains("organizational risk analyst"));
        assert!(prompt.contains("\"key_findings\""));
    }

    #[test]
    fn style_and_directness_change_the_prompt() {
        let adapter = ProfileAdapter::new();
        let gentle = profile().with_directness(0.1);
        let blunt = profile()
            .with_style(LeadershipStyle::Directive)
            .with_directness(0.9);

        let gentle_prompt = TemplatePromptProvider
            .template_for(&adapter.prompt_for(StageKind::LeadershipAnalysis, &gentle));
        let blunt_prompt = TemplatePromptProvider
            .template_for(&adapter.prompt_for(StageKind::LeadershipAnalysis, &blunt));

        assert!(gentle_prompt.contains("Directness level: 0.10 (0 = gentle, 1 = blunt)."));
        assert!(blunt_prompt.contains("Directness level: 0.90"));
        assert!(gentle_prompt.contains("suggestions and open questions"));
        assert!(blunt_prompt.contains("direct imperatives"));
        assert!(blunt_prompt.contains("sets direction"));
        assert!(gentle_prompt.contains("builds consensus"));
    }

    #[test]
    fn focus_areas_are_listed() {
        let focused = profile().with_focus_areas(["psychological safety", "retention"]);
        let selector = ProfileAdapter::new().prompt_for(StageKind::TeamHealthAnalysis, &focused);

        let prompt = TemplatePromptProvider.template_for(&selector);

        assert!(prompt.contains("psychological safety, retention"));
    }

    #[test]
    fn custom_override_is_returned_verbatim() {
        let adapter = ProfileAdapter::new().with_override(StageKind::Summary, "Just say hi.");
        let selector = adapter.prompt_for(StageKind::Summary, &profile());

        assert_eq!(TemplatePromptProvider.template_for(&selector), "Just say hi.");
    }

    #[test]
    fn same_selector_same_prompt() {
        let selector = ProfileAdapter::new().prompt_for(StageKind::TeamHealthAnalysis, &profile());
        assert_eq!(
            TemplatePromptProvider.template_for(&selector),
            TemplatePromptProvider.template_for(&selector)
        );
    }
}
