//! The four firewall questions

use super::Question;
use serde::{Deserialize, Serialize};

/// Immutable, ordered question sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from any non-empty question list
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() || questions.iter().any(|q| q.answers.is_empty()) {
            return None;
        }
        Some(Self { questions })
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.questions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self {
            questions: vec![
                Question::new(
                    "Q.01",
                    "On what date your brother was born?",
                    &[
                        "19 june 2007",
                        "19/6/2007",
                        "19-6-2007",
                        "19.6.2007",
                        "june 19 2007",
                        "19 6 2007",
                        "2007-06-19",
                        "19/06/2007",
                    ],
                    "🔓",
                ),
                Question::new(
                    "Q.02",
                    "What does a panda eats?",
                    &[
                        "bamboo",
                        "bamboos",
                        "the bamboo",
                        "green bamboo",
                        "bamboo shoots",
                        "bamboo leaves",
                        "bamboo",
                    ],
                    "🐼",
                ),
                Question::new(
                    "Q.03",
                    "What is 19 + 11 + 43?",
                    &["73", "seventy three", "seventy-three", "73.0"],
                    "🔢",
                ),
                Question::new(
                    "Q.04",
                    "Who is Shinzo favourite sibling?",
                    &["ayan", "Ayan", "AYAN", " ayan", "Ayan "],
                    "❤️",
                )
                .with_special_wrong(
                    &["kashaf", "Kashaf", "KASHAF", "kashaf ", "Kashaf "],
                    "The most invalid answer",
                    "❌",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bank_has_four_questions_in_order() {
        let bank = QuestionBank::default();
        let ids: Vec<_> = bank.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["Q.01", "Q.02", "Q.03", "Q.04"]);
        assert!(bank.is_last(3));
        assert!(!bank.is_last(2));
    }

    #[test]
    fn only_the_sibling_question_has_a_special_wrong() {
        let bank = QuestionBank::default();
        let with_special: Vec<_> = bank
            .iter()
            .filter(|q| q.special_wrong.is_some())
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(with_special, vec!["Q.04"]);
    }

    #[test]
    fn rejects_empty_banks_and_empty_answer_sets() {
        assert!(QuestionBank::new(Vec::new()).is_none());
        assert!(QuestionBank::new(vec![Question::new("Q.01", "?", &[], "x")]).is_none());
        assert!(QuestionBank::new(vec![Question::new("Q.01", "?", &["a"], "x")]).is_some());
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let bank = QuestionBank::default();
        let json = serde_json::to_value(&bank).unwrap();
        let last = &json["questions"][3];
        assert_eq!(last["id"], "Q.04");
        assert_eq!(last["special_wrong"]["message"], "The most invalid answer");
        assert!(json["questions"][0]["special_wrong"].is_null());
    }
}
