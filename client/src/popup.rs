use riesgo_shared::FeaturePopup;

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Markup handed to the engine's popup. Feature properties come from the tile archives and are
/// escaped before they reach `setHTML`.
pub fn popup_html(popup: &FeaturePopup) -> String {
    let mut html = format!(
        r#"<div style="padding: 4px 2px; font-family: 'Inter', system-ui, sans-serif; max-width: 240px;"><h3 style="font-size: 0.85rem; font-weight: 600; margin: 0 0 6px;">{}</h3>"#,
        escape_html(popup.title)
    );
    if let Some(risk) = popup.risk {
        html.push_str(&format!(
            r#"<p style="font-size: 0.75rem; margin: 0 0 4px;"><strong>Nivel:</strong> {}</p>"#,
            escape_html(risk.label())
        ));
    }
    if let Some(description) = &popup.description {
        html.push_str(&format!(
            r#"<p style="font-size: 0.75rem; margin: 0; color: #4b5563;">{}</p>"#,
            escape_html(description)
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use riesgo_shared::{LayerId, RiskLevel};

    #[test]
    fn hazard_popup_shows_level_label() {
        let html = popup_html(&FeaturePopup {
            layer: LayerId::HazardCurrent,
            title: "Zona de Riesgo Hídrico",
            risk: Some(RiskLevel::Media),
            description: None,
        });
        assert!(html.contains("Zona de Riesgo Hídrico"));
        assert!(html.contains("<strong>Nivel:</strong> Media"));
    }

    #[test]
    fn unknown_level_reads_no_especificado() {
        let html = popup_html(&FeaturePopup {
            layer: LayerId::HazardOriginal,
            title: "Zona de Riesgo Hídrico",
            risk: Some(RiskLevel::Unspecified),
            description: None,
        });
        assert!(html.contains("No especificado"));
    }

    #[test]
    fn description_is_escaped() {
        let html = popup_html(&FeaturePopup {
            layer: LayerId::Cadastre,
            title: "Parcela Catastral",
            risk: None,
            description: Some("<img src=x onerror=alert(1)> & co".to_string()),
        });
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt; &amp; co"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("Nivel"));
    }
}
