//! Answer matching
//!
//! Input and accepted answers are compared after the same normalization
//! (trim, lowercase). There is no fuzzy matching and no numeric parsing:
//! `73.0` matches only because it is listed.

use crate::data::Question;

/// Outcome of checking one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Correct,
    WrongSpecial { message: String, icon: String },
    WrongGeneric,
}

impl MatchResult {
    pub fn is_correct(&self) -> bool {
        matches!(self, MatchResult::Correct)
    }
}

/// Trimmed, lowercased input, or `None` when nothing is left
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

fn contains_normalized(set: &[String], needle: &str) -> bool {
    set.iter()
        .filter_map(|candidate| normalize(candidate))
        .any(|candidate| candidate == needle)
}

/// Check `raw` against `question`. Special-wrong triggers win over answers.
pub fn matches(question: &Question, raw: &str) -> MatchResult {
    let Some(answer) = normalize(raw) else {
        return MatchResult::WrongGeneric;
    };

    if let Some(special) = &question.special_wrong {
        if contains_normalized(&special.triggers, &answer) {
            return MatchResult::WrongSpecial {
                message: special.message.clone(),
                icon: special.icon.clone(),
            };
        }
    }

    if contains_normalized(&question.answers, &answer) {
        MatchResult::Correct
    } else {
        MatchResult::WrongGeneric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuestionBank;

    fn variants(answer: &str) -> Vec<String> {
        vec![
            answer.to_string(),
            answer.to_uppercase(),
            answer.to_lowercase(),
            format!(" {} ", answer),
            format!("\t{}\n", answer.to_uppercase()),
        ]
    }

    #[test]
    fn every_accepted_literal_matches_in_any_case_and_padding() {
        let bank = QuestionBank::default();
        for question in bank.iter() {
            for answer in &question.answers {
                for input in variants(answer) {
                    assert_eq!(
                        matches(question, &input),
                        MatchResult::Correct,
                        "{} rejected {:?}",
                        question.id,
                        input
                    );
                }
            }
        }
    }

    #[test]
    fn sibling_trigger_gets_the_special_denial() {
        let bank = QuestionBank::default();
        let sibling = bank.get(3).unwrap();
        for input in ["kashaf", "KASHAF", "  Kashaf ", "kAsHaF"] {
            assert_eq!(
                matches(sibling, input),
                MatchResult::WrongSpecial {
                    message: "The most invalid answer".to_string(),
                    icon: "❌".to_string(),
                }
            );
        }
    }

    #[test]
    fn special_trigger_only_applies_to_its_own_question() {
        let bank = QuestionBank::default();
        assert_eq!(matches(bank.get(0).unwrap(), "kashaf"), MatchResult::WrongGeneric);
    }

    #[test]
    fn unknown_answers_are_generic_denials() {
        let bank = QuestionBank::default();
        let sum = bank.get(2).unwrap();
        for input in ["74", "73.00", "seventythree", "73 ", "ayan"] {
            let expected = if input.trim() == "73" {
                MatchResult::Correct
            } else {
                MatchResult::WrongGeneric
            };
            assert_eq!(matches(sum, input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn normalize_rejects_blank_input() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   \t "), None);
        assert_eq!(normalize(" Bamboo "), Some("bamboo".to_string()));
    }

    #[test]
    fn special_check_runs_before_answers() {
        let question = Question::new("Q.99", "?", &["same"], "✓")
            .with_special_wrong(&["SAME"], "nope", "✗");
        assert!(matches!(
            matches(&question, "same"),
            MatchResult::WrongSpecial { .. }
        ));
    }
}
