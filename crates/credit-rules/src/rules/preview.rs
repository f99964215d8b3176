use std::fmt::Write;

use super::domain::RuleDefinition;

/// Plain-text summary shown beside the editor. Empty until the rule has a name.
pub fn rule_preview(rule: &RuleDefinition) -> String {
    let metadata = rule.metadata();
    if metadata.name.trim().is_empty() {
        return String::new();
    }

    let mut preview = String::new();
    let product = metadata.product_type.as_deref().unwrap_or("All Products");
    let _ = writeln!(preview, "Rule: {}", metadata.name);
    let _ = writeln!(preview, "Product Type: {product}");
    let _ = writeln!(preview, "Description: {}", metadata.description);
    preview.push('\n');

    if !rule.conditions().is_empty() {
        preview.push_str("Conditions:\n");
        for (index, condition) in rule.conditions().iter().enumerate() {
            let _ = writeln!(
                preview,
                "  {}. {} {} {}",
                index + 1,
                condition.field(),
                condition.operator(),
                condition.value()
            );
        }
        if rule.conditions().len() > 1 {
            let _ = writeln!(preview, "  Logical Operator: {}", rule.logical_operator());
        }
    }

    if !rule.actions().is_empty() {
        preview.push_str("\nActions:\n");
        for (index, action) in rule.actions().iter().enumerate() {
            let _ = write!(preview, "  {}. {}", index + 1, action.kind());
            if let Some(value) = action.value() {
                let _ = write!(preview, " = {value}");
            }
            if let Some(multiplier) = action.multiplier() {
                let _ = write!(preview, " (x{multiplier})");
            }
            if let Some(calculation) = action.calculation() {
                let _ = write!(preview, " [{calculation}]");
            }
            preview.push('\n');
        }
    }

    preview
}
