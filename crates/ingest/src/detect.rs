//! Communication type auto-detection.

use pipeline::CommunicationType;

const ALL_HANDS_MARKERS: &[&str] = &["all hands", "all-hands", "company meeting", "quarterly"];

/// Guesses the communication type of `raw_text`.
///
/// Rules, first match wins:
///
/// 1. a JSON array whose first element has `user` and `ts` keys is a Slack export;
/// 2. a `From:` header plus an `@` is an email thread;
/// 3. all-hands vocabulary (`all hands`, `company meeting`, `quarterly`) is an all-hands;
/// 4. anything else is a team meeting.
pub fn detect_communication_type(raw_text: &str) -> CommunicationType {
    let trimmed = raw_text.trim_start();
    if trimmed.starts_with('[') && looks_like_slack_export(trimmed) {
        return CommunicationType::SlackChannel;
    }
    if raw_text.contains("From:") && raw_text.contains('@') {
        return CommunicationType::LeadershipEmail;
    }
    let lower = raw_text.to_lowercase();
    if ALL_HANDS_MARKERS.iter().any(|m| lower.contains(m)) {
        return CommunicationType::AllHands;
    }
    CommunicationType::TeamMeeting
}

fn looks_like_slack_export(text: &str) -> bool {
    let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(text)
    else {
        return false;
    };
    items
        .first()
        .and_then(serde_json::Value::as_object)
        .is_some_and(|first| first.contains_key("user") && first.contains_key("ts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_slack_exports() {
        let raw = r#"[{"user": "U01", "text": "hi", "ts": "1.0"}]"#;
        assert_eq!(detect_communication_type(raw), CommunicationType::SlackChannel);
    }

    #[test]
    fn json_without_slack_keys_is_not_slack() {
        let raw = r#"[{"name": "x"}]"#;
        assert_eq!(detect_communication_type(raw), CommunicationType::TeamMeeting);
    }

    #[test]
    fn detects_email_threads() {
        let raw = "From: ceo@company.com\nSubject: Q3\nTeam, ...";
        assert_eq!(detect_communication_type(raw), CommunicationType::LeadershipEmail);
    }

    #[test]
    fn detects_all_hands() {
        let raw = "CEO: Welcome to our Quarterly review!\nCFO: Numbers are up.";
        assert_eq!(detect_communication_type(raw), CommunicationType::AllHands);
    }

    #[test]
    fn falls_back_to_team_meeting() {
        let raw = "Sarah: Standup time\nAlex: Nothing blocking";
        assert_eq!(detect_communication_type(raw), CommunicationType::TeamMeeting);
    }
}
