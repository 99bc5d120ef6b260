use super::rules::AreaRuleSet;

/// Label assigned when no area keyword appears in a résumé.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Returns the areas whose keywords occur in `text`, in rule-set order.
///
/// Matching is a case-insensitive substring test. Each rule contributes at most once: the
/// scan of a rule's keywords stops at its first hit, while the remaining rules are still
/// checked.
pub fn classify(text: &str, rules: &AreaRuleSet) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut matched: Vec<String> = Vec::new();

    for rule in rules.areas() {
        let hit = rule
            .keywords
            .iter()
            .filter(|keyword| !keyword.is_empty())
            .any(|keyword| haystack.contains(keyword.to_lowercase().as_str()));

        if hit && !matched.iter().any(|area| area == &rule.name) {
            matched.push(rule.name.clone());
        }
    }

    if matched.is_empty() {
        matched.push(UNCLASSIFIED.to_string());
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::normalizer::normalize_text;
    use crate::workflows::screening::rules::AreaRule;

    fn rules() -> AreaRuleSet {
        AreaRuleSet::new(vec![
            AreaRule {
                name: "Engineering".to_string(),
                keywords: vec!["python".to_string(), "rust".to_string()],
            },
            AreaRule {
                name: "Sales".to_string(),
                keywords: vec!["crm".to_string()],
            },
        ])
        .expect("valid rules")
    }

    #[test]
    fn matches_every_rule_in_definition_order() {
        let text = normalize_text("Experienced Python developer with CRM tools");
        assert_eq!(classify(&text, &rules()), vec!["Engineering", "Sales"]);
    }

    #[test]
    fn one_label_per_rule_even_with_several_keyword_hits() {
        let text = normalize_text("Python and Rust services");
        assert_eq!(classify(&text, &rules()), vec!["Engineering"]);
    }

    #[test]
    fn falls_back_to_unclassified() {
        let text = normalize_text("Pastry chef with ten years of experience");
        assert_eq!(classify(&text, &rules()), vec![UNCLASSIFIED]);
    }

    #[test]
    fn matching_ignores_case_of_raw_text() {
        assert_eq!(classify("SALESFORCE CRM ADMIN", &rules()), vec!["Sales"]);
    }

    #[test]
    fn keywords_match_inside_longer_words() {
        assert_eq!(classify("trusted advisor", &rules()), vec!["Engineering"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let rules = rules();
        let text = normalize_text("crm rust");
        let first = classify(&text, &rules);
        for _ in 0..5 {
            assert_eq!(classify(&text, &rules), first);
        }
        assert_eq!(classify("nothing relevant", &rules), vec![UNCLASSIFIED]);
        assert_eq!(classify(&text, &rules), first);
    }
}
