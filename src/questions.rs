use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::QuestionError;

/// An interview question as served by the course backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// The text a spoken answer is evaluated against: the first non-empty
    /// of explanation, correct answer and raw content.
    pub fn reference_text(&self) -> &str {
        [
            self.explanation.as_deref(),
            self.correct_answer.as_deref(),
            Some(self.content.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or("")
    }
}

/// A course module, used only for drawing questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub module_order: i64,
}

/// Where questions come from. The HTTP client implementing this lives
/// outside this crate; tests use in-memory sources.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn list_modules(&self, course_id: i64) -> anyhow::Result<Vec<Module>>;
    async fn list_questions(&self, module_id: i64) -> anyhow::Result<Vec<Question>>;
}

/// Draws a practice question: a uniformly random module of the course,
/// then a uniformly random question of that module.
pub async fn draw_question(
    source: &dyn QuestionSource,
    course_id: i64,
) -> Result<Question, QuestionError> {
    let modules = source.list_modules(course_id).await?;
    let module = modules
        .choose(&mut rand::thread_rng())
        .ok_or(QuestionError::NoModules)?;

    let questions = source.list_questions(module.id).await?;
    questions
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or(QuestionError::NoQuestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(explanation: Option<&str>, correct: Option<&str>, content: &str) -> Question {
        Question {
            id: 1,
            title: "t".into(),
            content: content.into(),
            difficulty: None,
            options: Vec::new(),
            correct_answer: correct.map(Into::into),
            explanation: explanation.map(Into::into),
        }
    }

    struct InMemorySource {
        modules: Vec<Module>,
        questions: Vec<Question>,
    }

    #[async_trait]
    impl QuestionSource for InMemorySource {
        async fn list_modules(&self, _course_id: i64) -> anyhow::Result<Vec<Module>> {
            Ok(self.modules.clone())
        }

        async fn list_questions(&self, _module_id: i64) -> anyhow::Result<Vec<Question>> {
            Ok(self.questions.clone())
        }
    }

    #[test]
    fn reference_text_prefers_explanation() {
        let q = question(Some("because"), Some("42"), "what is the answer");
        assert_eq!(q.reference_text(), "because");
    }

    #[test]
    fn reference_text_falls_back_past_empty_fields() {
        let q = question(Some(""), Some("42"), "what is the answer");
        assert_eq!(q.reference_text(), "42");

        let q = question(None, Some(""), "what is the answer");
        assert_eq!(q.reference_text(), "what is the answer");

        let q = question(None, None, "");
        assert_eq!(q.reference_text(), "");
    }

    #[test]
    fn question_deserializes_from_backend_payload() {
        let payload = r#"{
            "id": 7,
            "title": "Recursion",
            "content": "What is recursion?",
            "difficulty": "easy",
            "options": ["a", "b"],
            "correctAnswer": "A function calling itself",
            "explanation": "Recursion calls itself"
        }"#;
        let q: Question = serde_json::from_str(payload).unwrap();
        assert_eq!(q.id, 7);
        assert_eq!(q.correct_answer.as_deref(), Some("A function calling itself"));
        assert_eq!(q.reference_text(), "Recursion calls itself");

        // Optional fields may be absent entirely.
        let q: Question = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(q.reference_text(), "");
    }

    #[tokio::test]
    async fn draw_fails_on_a_course_without_modules() {
        let source = InMemorySource {
            modules: vec![],
            questions: vec![question(None, None, "c")],
        };
        assert!(matches!(
            draw_question(&source, 1).await,
            Err(QuestionError::NoModules)
        ));
    }

    #[tokio::test]
    async fn draw_fails_on_a_module_without_questions() {
        let source = InMemorySource {
            modules: vec![Module {
                id: 1,
                title: "m".into(),
                module_order: 0,
            }],
            questions: vec![],
        };
        assert!(matches!(
            draw_question(&source, 1).await,
            Err(QuestionError::NoQuestions)
        ));
    }

    #[tokio::test]
    async fn draw_returns_a_member_of_the_module() {
        let source = InMemorySource {
            modules: vec![Module {
                id: 1,
                title: "m".into(),
                module_order: 0,
            }],
            questions: vec![
                question(Some("a"), None, "1"),
                question(Some("b"), None, "2"),
            ],
        };
        let drawn = draw_question(&source, 1).await.unwrap();
        assert!(source.questions.contains(&drawn));
    }
}
