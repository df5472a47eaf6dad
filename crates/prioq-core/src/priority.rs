use serde::{Deserialize, Deserializer, Serialize};

/// Priority tier for task execution.
/// Tasks in a higher tier are always popped before any lower tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    /// Low is the default tier; unrecognized priority strings
    /// normalize here rather than being rejected.
    #[default]
    Low,
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Priority::parse(Some(&s)))
    }
}

impl Priority {
    /// Normalize an optional priority string to a tier.
    /// Absent or unrecognized input yields `Low`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("high") => Priority::High,
            Some("medium") => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tiers() {
        assert_eq!(Priority::parse(Some("high")), Priority::High);
        assert_eq!(Priority::parse(Some("medium")), Priority::Medium);
        assert_eq!(Priority::parse(Some("low")), Priority::Low);
    }

    #[test]
    fn test_parse_normalizes_to_low() {
        assert_eq!(Priority::parse(None), Priority::Low);
        assert_eq!(Priority::parse(Some("")), Priority::Low);
        assert_eq!(Priority::parse(Some("urgent")), Priority::Low);
        assert_eq!(Priority::parse(Some("HIGH")), Priority::Low);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");

        let parsed: Priority = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Priority::Medium);
    }

    #[test]
    fn test_deserialize_unrecognized_is_low() {
        let parsed: Priority = serde_json::from_str("\"whenever\"").unwrap();
        assert_eq!(parsed, Priority::Low);
    }

    #[test]
    fn test_default_is_low() {
        assert_eq!(Priority::default(), Priority::Low);
    }
}
