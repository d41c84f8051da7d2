use qb_core::entities::{QuestionAuthorJoin, SubjectQuestionJoin, User};
use qb_core::enums::LayoutType;
use qb_page::{FetchOutcome, QuestionPage, ViewState};
use serde::Serialize;

use crate::cli::root_commands::QuestionsArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::notifier::StderrNotifier;
use crate::output::page::{PageOptions, render_page};
use crate::output::{output, table, table_options};
use crate::progress::Progress;

#[derive(Serialize)]
struct QuestionsResponse<'a> {
    user: Option<&'a User>,
    layout: LayoutType,
    subjects: &'a [SubjectQuestionJoin],
    selected: Option<&'a QuestionAuthorJoin>,
}

/// The open question as a key/value table.
#[derive(Serialize)]
struct QuestionDetail {
    id: i64,
    subject: Option<String>,
    title: String,
    author: String,
    content: String,
}

/// One flattened row per question for `--format table`.
#[derive(Debug, PartialEq, Eq)]
struct QuestionRow {
    id: i64,
    subject: String,
    title: String,
    author: String,
}

/// Run the fetch chain once and print the page.
pub async fn handle(args: &QuestionsArgs, ctx: AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let layout = args.layout.unwrap_or(ctx.config.general.default_layout);
    let grid_columns = ctx.config.general.grid_columns;
    let page = QuestionPage::new(ctx.backend, StderrNotifier::from_prefs(), ctx.session, layout);

    let spinner = Progress::spinner("Loading questions");
    let outcome = page.refetch().await;
    spinner.finish_clear();

    ensure_loaded(outcome)?;

    if let Some(id) = args.select
        && !page.select_question(id)
    {
        anyhow::bail!("question #{id} is not in your organization's subjects");
    }

    let state = page.state();
    match flags.format {
        OutputFormat::Page => {
            println!("{}", render_page(&state, &PageOptions::from_prefs(grid_columns, false)));
            Ok(())
        }
        OutputFormat::Table if state.selected.is_none() => {
            let rows = question_rows(&state)
                .into_iter()
                .map(|row| vec![row.id.to_string(), row.subject, row.title, row.author])
                .collect::<Vec<_>>();
            if rows.is_empty() {
                println!("(no rows)");
            } else {
                println!(
                    "{}",
                    table::render_rows(&["id", "subject", "title", "author"], &rows, table_options())
                );
            }
            Ok(())
        }
        OutputFormat::Table => {
            let detail = state.selected.as_ref().map(|question| QuestionDetail {
                id: question.id,
                subject: state
                    .find_question(question.id)
                    .map(|(subject, _)| subject.name.clone()),
                title: question.headline().to_string(),
                author: question.author.display_name().to_string(),
                content: question.content.clone(),
            });
            output(&detail, OutputFormat::Table)
        }
        format @ (OutputFormat::Json | OutputFormat::Raw) => output(
            &QuestionsResponse {
                user: state.user.as_ref(),
                layout: state.layout,
                subjects: &state.subjects_with_questions,
                selected: state.selected.as_ref(),
            },
            format,
        ),
    }
}

/// Turn a fetch outcome into the command result.
///
/// A failed chain has already been reported through the notifier, so the
/// returned error only marks the command as failed.
fn ensure_loaded(outcome: FetchOutcome) -> anyhow::Result<()> {
    match outcome {
        FetchOutcome::Committed {
            subjects,
            questions,
        } => {
            tracing::debug!(subjects, questions, "questions loaded");
            Ok(())
        }
        FetchOutcome::NoSession => anyhow::bail!(
            "not signed in; run `qbank auth login --email <email>` or set QBANK_AUTH__EMAIL"
        ),
        FetchOutcome::Failed(error) => {
            tracing::debug!(%error, stage = %error.stage(), "questions command failed");
            anyhow::bail!("questions were not loaded")
        }
        FetchOutcome::Superseded => anyhow::bail!("question fetch was interrupted"),
    }
}

fn question_rows(state: &ViewState) -> Vec<QuestionRow> {
    state
        .subjects_with_questions
        .iter()
        .flat_map(|join| {
            join.questions.iter().map(|question| QuestionRow {
                id: question.id,
                subject: join.subject.name.clone(),
                title: question.headline().to_string(),
                author: question.author.display_name().to_string(),
            })
        })
        .collect()
}
