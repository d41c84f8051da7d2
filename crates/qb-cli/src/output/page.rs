//! Terminal rendering of the question page.
//!
//! Every function here is pure: it takes a [`ViewState`] (or a piece of it)
//! and returns the text to print.

use qb_core::entities::{QuestionAuthorJoin, Subject, SubjectQuestionJoin};
use qb_core::enums::LayoutType;
use qb_page::{Content, ViewState};

use crate::output::table::{display_width, pad, truncate_text};
use crate::ui;

const DEFAULT_WIDTH: usize = 80;
const CARD_MIN_WIDTH: usize = 24;
const CARD_GAP: usize = 2;

#[derive(Clone, Copy, Debug)]
pub struct PageOptions {
    pub width: usize,
    /// Fixed grid column count; `0` fits columns to `width`.
    pub grid_columns: u16,
    pub color: bool,
    /// Show interactive key hints (`browse`).
    pub key_hints: bool,
}

impl PageOptions {
    pub fn from_prefs(grid_columns: u16, key_hints: bool) -> Self {
        let prefs = ui::prefs();
        Self {
            width: prefs.term_width.unwrap_or(DEFAULT_WIDTH),
            grid_columns,
            color: prefs.color,
            key_hints,
        }
    }
}

/// The whole page: header (unless a question is open) and content area.
#[must_use]
pub fn render_page(state: &ViewState, options: &PageOptions) -> String {
    let mut sections = Vec::with_capacity(2);
    if state.header_visible() {
        sections.push(render_header(state, options));
    }

    let content = match state.content() {
        Content::Loading => render_skeleton(options),
        Content::Detail { subject, question } => render_detail(subject, question, options),
        Content::Collection { subjects, .. } if subjects.is_empty() => render_empty(state),
        Content::Collection {
            layout: LayoutType::Grid,
            subjects,
        } => render_grid(subjects, options),
        Content::Collection {
            layout: LayoutType::List,
            subjects,
        } => render_list(subjects, options),
    };
    sections.push(content);
    sections.join("\n\n")
}

#[must_use]
pub fn render_header(state: &ViewState, options: &PageOptions) -> String {
    let who = state
        .user
        .as_ref()
        .map_or("not signed in", |user| user.display_name());
    let title = format!("Questions  ·  {who}");

    let mut lines = vec![
        bold(&truncate_text(&title, options.width), options.color),
        format!(
            "{} subjects · {} questions · layout: {}",
            state.subjects_with_questions.len(),
            state.question_count(),
            state.layout,
        ),
    ];
    if options.key_hints {
        lines.push(dim(
            "[t] toggle layout  [r] refresh  [s ID] open question  [q] quit",
            options.color,
        ));
    }
    lines.join("\n")
}

/// Placeholder shown while the fetch chain runs.
#[must_use]
pub fn render_skeleton(options: &PageOptions) -> String {
    let bar = options.width.min(48);
    [bar, bar * 2 / 3, bar, bar / 2]
        .iter()
        .map(|width| dim(&"░".repeat(*width), options.color))
        .chain(std::iter::once("Loading questions…".to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_empty(state: &ViewState) -> String {
    if state.user.is_none() {
        "Not signed in. Run `qbank auth login --email <email>` or set QBANK_AUTH__EMAIL."
            .to_string()
    } else {
        "No questions yet.".to_string()
    }
}

fn subject_heading(join: &SubjectQuestionJoin, options: &PageOptions) -> String {
    let heading = format!("{} ({})", join.subject.name, join.questions.len());
    bold(&truncate_text(&heading, options.width), options.color)
}

/// Number of card columns that fit, or the configured count.
#[must_use]
pub fn grid_columns(options: &PageOptions) -> usize {
    if options.grid_columns > 0 {
        return usize::from(options.grid_columns);
    }
    ((options.width + CARD_GAP) / (CARD_MIN_WIDTH + CARD_GAP)).max(1)
}

#[must_use]
pub fn render_grid(subjects: &[SubjectQuestionJoin], options: &PageOptions) -> String {
    let columns = grid_columns(options);
    let card_width = (options.width.saturating_sub(CARD_GAP * (columns - 1)) / columns).max(8);

    let mut blocks = Vec::with_capacity(subjects.len());
    for join in subjects {
        let mut lines = vec![subject_heading(join, options)];
        if join.questions.is_empty() {
            lines.push("  (no questions)".to_string());
        }
        for row in join.questions.chunks(columns) {
            let cards = row
                .iter()
                .map(|question| card(question, card_width))
                .collect::<Vec<_>>();
            let gap = " ".repeat(CARD_GAP);
            for line_index in 0..CARD_HEIGHT {
                let line = cards
                    .iter()
                    .map(|card| card[line_index].as_str())
                    .collect::<Vec<_>>()
                    .join(&gap);
                lines.push(line);
            }
        }
        blocks.push(lines.join("\n"));
    }
    blocks.join("\n\n")
}

const CARD_HEIGHT: usize = 4;

fn card(question: &QuestionAuthorJoin, width: usize) -> [String; CARD_HEIGHT] {
    let inner = width.saturating_sub(2);
    let title = format!("#{} {}", question.id, question.headline());
    let author = format!("by {}", question.author.display_name());
    [
        format!("┌{}┐", "─".repeat(inner)),
        format!("│{}│", pad(&truncate_text(&title, inner), inner, false)),
        format!("│{}│", pad(&truncate_text(&author, inner), inner, false)),
        format!("└{}┘", "─".repeat(inner)),
    ]
}

#[must_use]
pub fn render_list(subjects: &[SubjectQuestionJoin], options: &PageOptions) -> String {
    let id_width = subjects
        .iter()
        .flat_map(|join| &join.questions)
        .map(|question| display_width(&question.id.to_string()) + 1)
        .max()
        .unwrap_or(2);

    let mut blocks = Vec::with_capacity(subjects.len());
    for join in subjects {
        let mut lines = vec![subject_heading(join, options)];
        if join.questions.is_empty() {
            lines.push("  (no questions)".to_string());
        }
        for question in &join.questions {
            let id = pad(&format!("#{}", question.id), id_width, false);
            let line = format!(
                "  {id}  {}  · {}",
                question.headline(),
                question.author.display_name()
            );
            lines.push(truncate_text(&line, options.width));
        }
        blocks.push(lines.join("\n"));
    }
    blocks.join("\n\n")
}

#[must_use]
pub fn render_detail(
    subject: Option<&Subject>,
    question: &QuestionAuthorJoin,
    options: &PageOptions,
) -> String {
    let subject_name = subject.map_or("-", |subject| subject.name.as_str());
    let author = &question.author;
    let byline = if author.email.is_empty() {
        author.display_name().to_string()
    } else if author.username.is_some() {
        format!("{} <{}>", author.display_name(), author.email)
    } else {
        author.email.clone()
    };

    let mut lines = vec![
        bold(&format!("#{} {}", question.id, question.headline()), options.color),
        format!("Subject: {subject_name}  ·  Author: {byline}"),
    ];
    if let Some(created_at) = question.created_at {
        lines.push(format!("Created: {}", created_at.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.push(String::new());
    if question.content.trim().is_empty() {
        lines.push(dim("(no content)", options.color));
    } else {
        lines.extend(question.content.lines().map(str::to_string));
    }
    if options.key_hints {
        lines.push(String::new());
        lines.push(dim("[b] back", options.color));
    }
    lines.join("\n")
}

fn bold(text: &str, color: bool) -> String {
    if color {
        format!("\u{1b}[1m{text}\u{1b}[0m")
    } else {
        text.to_string()
    }
}

fn dim(text: &str, color: bool) -> String {
    if color {
        format!("\u{1b}[2m{text}\u{1b}[0m")
    } else {
        text.to_string()
    }
}
