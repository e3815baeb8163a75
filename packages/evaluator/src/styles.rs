//! Per-type default text styles for text-bearing elements.

use funnel_model::{ElementType, TextStyle};

fn style(
    font_size: &str,
    font_weight: &str,
    line_height: &str,
    text_align: &str,
    color: &str,
) -> TextStyle {
    TextStyle {
        font_family: Some("Inter, system-ui, sans-serif".to_string()),
        font_size: Some(font_size.to_string()),
        font_weight: Some(font_weight.to_string()),
        line_height: Some(line_height.to_string()),
        text_align: Some(text_align.to_string()),
        color: Some(color.to_string()),
        ..Default::default()
    }
}

/// Defaults a text-bearing element's `props.style` is merged over.
/// Other types get an empty style.
pub fn default_text_style(element_type: &ElementType) -> TextStyle {
    match element_type {
        ElementType::Headline => style("48px", "700", "1.2", "center", "#111827"),
        ElementType::Subheadline => style("24px", "500", "1.4", "center", "#4b5563"),
        ElementType::Text => style("16px", "400", "1.6", "left", "#374151"),
        ElementType::Button => style("18px", "600", "1.2", "center", "#ffffff"),
        ElementType::List => style("16px", "400", "1.8", "left", "#374151"),
        _ => TextStyle::default(),
    }
}

/// Element style merged over its type defaults
pub fn resolved_text_style(element_type: &ElementType, own: &TextStyle) -> TextStyle {
    own.merged_over(&default_text_style(element_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_values_override_defaults() {
        let own = TextStyle {
            font_size: Some("60px".into()),
            ..Default::default()
        };
        let resolved = resolved_text_style(&ElementType::Headline, &own);

        assert_eq!(resolved.font_size.as_deref(), Some("60px"));
        assert_eq!(resolved.font_weight.as_deref(), Some("700"));
    }

    #[test]
    fn test_non_text_types_have_no_defaults() {
        assert_eq!(default_text_style(&ElementType::Hero), TextStyle::default());
    }
}
