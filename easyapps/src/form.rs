use std::fmt;

use anyhow::Result;
use owo_colors::OwoColorize;

pub const ANSWER_ROWS: usize = 4;

pub fn field_name(position: usize) -> String {
    format!("answer_to_question_{position}")
}

/// A labeled multi-line answer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerField {
    pub label: String,
    pub name: String,
    pub rows: usize,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub fields: Vec<AnswerField>,
}

impl ApplicationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut AnswerField> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// Name/value pairs in field order, ready to be form encoded.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }

    fn append(&mut self, position: usize, question: &str, value: String) {
        self.fields.push(AnswerField {
            label: question.to_string(),
            name: field_name(position),
            rows: ANSWER_ROWS,
            value,
        });
    }
}

/// Appends one empty answer field per question.
pub fn render_questions<S: AsRef<str>>(form: &mut ApplicationForm, questions: &[S]) {
    for (i, question) in questions.iter().enumerate() {
        form.append(i + 1, question.as_ref(), String::new());
    }
}

/// Appends one answer field per question, pre-filled with the answer at the
/// same index. Nothing is rendered when the two lists differ in length.
pub fn render_questions_with_answers<Q: AsRef<str>, A: AsRef<str>>(
    form: &mut ApplicationForm,
    questions: &[Q],
    answers: &[A],
) -> Result<()> {
    if questions.len() != answers.len() {
        anyhow::bail!(
            "got {} answers for {} questions",
            answers.len(),
            questions.len()
        );
    }

    for (i, (question, answer)) in questions.iter().zip(answers).enumerate() {
        form.append(i + 1, question.as_ref(), answer.as_ref().to_string());
    }

    Ok(())
}

impl fmt::Display for ApplicationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            writeln!(f, "{}", field.label.bold())?;
            if field.value.is_empty() {
                writeln!(f, "{}", "(no answer)".dimmed())?;
            } else {
                writeln!(f, "{}", field.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_questions_names_fields_by_position() {
        let mut form = ApplicationForm::new();
        render_questions(&mut form, &["Why us?", "Tell us about yourself", "Anything else?"]);

        assert_eq!(form.len(), 3);
        for (i, field) in form.fields.iter().enumerate() {
            assert_eq!(field.name, format!("answer_to_question_{}", i + 1));
            assert_eq!(field.value, "");
            assert_eq!(field.rows, ANSWER_ROWS);
        }
        assert_eq!(form.fields[1].label, "Tell us about yourself");
    }

    #[test]
    fn test_render_no_questions() {
        let mut form = ApplicationForm::new();
        render_questions::<&str>(&mut form, &[]);
        assert!(form.is_empty());
    }

    #[test]
    fn test_render_questions_with_answers_prefills() {
        let questions = vec!["Q1".to_string(), "Q2".to_string()];
        let answers = vec!["A1".to_string(), "A2".to_string()];
        let mut form = ApplicationForm::new();

        render_questions_with_answers(&mut form, &questions, &answers).unwrap();

        assert_eq!(form.fields[0].value, "A1");
        assert_eq!(form.fields[1].value, "A2");
        assert_eq!(
            form.pairs(),
            vec![
                ("answer_to_question_1".to_string(), "A1".to_string()),
                ("answer_to_question_2".to_string(), "A2".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_questions_with_mismatched_answers_renders_nothing() {
        let mut form = ApplicationForm::new();
        let result = render_questions_with_answers(&mut form, &["Q1", "Q2"], &["A1"]);

        assert!(result.is_err());
        assert!(form.is_empty());
    }

    #[test]
    fn test_field_mut_updates_value() {
        let mut form = ApplicationForm::new();
        render_questions(&mut form, &["Q1"]);
        form.field_mut("answer_to_question_1").unwrap().value = "edited".to_string();
        assert_eq!(form.fields[0].value, "edited");
    }
}
