use serde_json::{Map, Value};

/// Feature property carrying the hazard code. Some exports use the upper-case spelling.
pub const RISK_PROPERTY: &str = "peligrosid";
pub const RISK_PROPERTY_UPPER: &str = "PELIGROSID";
pub const DESCRIPTION_PROPERTY: &str = "description";

/// Water-hazard level of a feature, decoded once from its properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Alta,
    Media,
    Baja,
    Unspecified,
}

impl RiskLevel {
    /// Known levels, most severe first (legend order).
    pub const RANKED: [RiskLevel; 3] = [RiskLevel::Alta, RiskLevel::Media, RiskLevel::Baja];

    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("alta") => Self::Alta,
            Some("media") => Self::Media,
            Some("baja") => Self::Baja,
            _ => Self::Unspecified,
        }
    }

    /// Decode from a feature property map, accepting either casing of the property key.
    /// Keys are tried in the same order as the paint `coalesce`, skipping null values.
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        let code = properties
            .get(RISK_PROPERTY)
            .and_then(Value::as_str)
            .or_else(|| properties.get(RISK_PROPERTY_UPPER).and_then(Value::as_str))
            .or_else(|| {
                properties
                    .iter()
                    .filter(|(key, _)| key.eq_ignore_ascii_case(RISK_PROPERTY))
                    .find_map(|(_, value)| value.as_str())
            });
        Self::from_code(code)
    }

    pub const fn code(self) -> Option<&'static str> {
        match self {
            Self::Alta => Some("alta"),
            Self::Media => Some("media"),
            Self::Baja => Some("baja"),
            Self::Unspecified => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Alta => "Alta",
            Self::Media => "Media",
            Self::Baja => "Baja",
            Self::Unspecified => "No especificado",
        }
    }

    pub(crate) const fn fill_lightness(self) -> u8 {
        match self {
            Self::Alta => 25,
            Self::Media => 45,
            Self::Baja => 65,
            Self::Unspecified => 55,
        }
    }

    pub(crate) const fn outline_lightness(self) -> u8 {
        match self {
            Self::Alta => 15,
            Self::Media => 35,
            Self::Baja => 55,
            Self::Unspecified => 45,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::RiskLevel;

    fn props(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn known_codes_resolve_to_labels() {
        assert_eq!(RiskLevel::from_code(Some("alta")).label(), "Alta");
        assert_eq!(RiskLevel::from_code(Some("media")).label(), "Media");
        assert_eq!(RiskLevel::from_code(Some("baja")).label(), "Baja");
    }

    #[test]
    fn unknown_or_missing_codes_are_unspecified() {
        assert_eq!(RiskLevel::from_code(None).label(), "No especificado");
        assert_eq!(
            RiskLevel::from_code(Some("extrema")),
            RiskLevel::Unspecified
        );
        assert_eq!(RiskLevel::from_code(Some("")), RiskLevel::Unspecified);
    }

    #[test]
    fn decodes_either_property_casing() {
        assert_eq!(
            RiskLevel::from_properties(&props(json!({"peligrosid": "media"}))),
            RiskLevel::Media
        );
        assert_eq!(
            RiskLevel::from_properties(&props(json!({"PELIGROSID": "alta"}))),
            RiskLevel::Alta
        );
        assert_eq!(
            RiskLevel::from_properties(&props(json!({"Peligrosid": "baja"}))),
            RiskLevel::Baja
        );
    }

    #[test]
    fn null_lower_case_code_falls_through_to_upper_case() {
        assert_eq!(
            RiskLevel::from_properties(&props(json!({"peligrosid": null, "PELIGROSID": "alta"}))),
            RiskLevel::Alta
        );
        assert_eq!(
            RiskLevel::from_properties(&props(json!({"peligrosid": null, "Peligrosid": "media"}))),
            RiskLevel::Media
        );
    }

    #[test]
    fn non_string_property_is_unspecified() {
        assert_eq!(
            RiskLevel::from_properties(&props(json!({"peligrosid": 3}))),
            RiskLevel::Unspecified
        );
        assert_eq!(
            RiskLevel::from_properties(&props(json!({}))),
            RiskLevel::Unspecified
        );
    }
}
