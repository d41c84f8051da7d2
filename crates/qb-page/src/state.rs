//! View state for the question page.
//!
//! Three independent pieces drive rendering: the layout, the loading flag,
//! and an optional selected question. Content (`user`,
//! `subjects_with_questions`) is only ever replaced wholesale by a completed
//! fetch chain.

use qb_core::entities::{QuestionAuthorJoin, Subject, SubjectQuestionJoin, User};
use qb_core::enums::LayoutType;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub subjects_with_questions: Vec<SubjectQuestionJoin>,
    pub user: Option<User>,
    pub loading: bool,
    pub layout: LayoutType,
    pub selected: Option<QuestionAuthorJoin>,
}

/// What the content area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    /// Placeholder while a fetch chain runs.
    Loading,
    /// One question, with the subject it sits under (if still present).
    Detail {
        subject: Option<&'a Subject>,
        question: &'a QuestionAuthorJoin,
    },
    /// The whole collection in the current layout.
    Collection {
        layout: LayoutType,
        subjects: &'a [SubjectQuestionJoin],
    },
}

impl ViewState {
    #[must_use]
    pub fn with_layout(layout: LayoutType) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// The header (layout toggle, refresh) is hidden while a question is open.
    #[must_use]
    pub const fn header_visible(&self) -> bool {
        self.selected.is_none()
    }

    pub const fn toggle_layout(&mut self) {
        self.layout = self.layout.toggled();
    }

    /// Open a question by id. Ignored while loading or if no such question
    /// is loaded.
    pub fn select(&mut self, question_id: i64) -> bool {
        if self.loading {
            return false;
        }
        match self.find_question(question_id) {
            Some((_, question)) => {
                self.selected = Some(question.clone());
                true
            }
            None => false,
        }
    }

    /// Close the open question.
    pub fn back(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn find_question(&self, question_id: i64) -> Option<(&Subject, &QuestionAuthorJoin)> {
        self.subjects_with_questions.iter().find_map(|join| {
            join.question(question_id)
                .map(|question| (&join.subject, question))
        })
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.subjects_with_questions
            .iter()
            .map(|join| join.questions.len())
            .sum()
    }

    #[must_use]
    pub fn content(&self) -> Content<'_> {
        if self.loading {
            return Content::Loading;
        }
        if let Some(question) = &self.selected {
            return Content::Detail {
                subject: self
                    .find_question(question.id)
                    .map(|(subject, _)| subject),
                question,
            };
        }
        Content::Collection {
            layout: self.layout,
            subjects: &self.subjects_with_questions,
        }
    }

    /// Replace the content with a completed fetch.
    ///
    /// A selection survives only if its question is still present, and then
    /// points at the fresh copy.
    pub(crate) fn commit(&mut self, user: User, subjects: Vec<SubjectQuestionJoin>) {
        self.user = Some(user);
        self.subjects_with_questions = subjects;
        let refreshed = self
            .selected
            .as_ref()
            .and_then(|selected| self.find_question(selected.id))
            .map(|(_, question)| question.clone());
        self.selected = refreshed;
    }

    /// Drop everything tied to the signed-in account.
    pub(crate) fn clear_account(&mut self) {
        self.user = None;
        self.subjects_with_questions.clear();
        self.selected = None;
        self.loading = false;
    }
}
