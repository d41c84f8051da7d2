use std::future::Future;
use std::pin::Pin;

use anyhow::Context;
use qb_core::identity::AuthIdentity;
use qb_page::{FetchOutcome, Notification, Notifier, QuestionPage, ViewState};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BrowseArgs;
use crate::context::AppContext;
use crate::notifier::StderrNotifier;
use crate::output::page::{PageOptions, render_page};
use crate::progress::Progress;

const HELP: &str = "\
commands:
  t          toggle grid/list layout
  r          refresh
  s ID       open question ID
  b          back to the list
  u EMAIL    browse as another account (this run only)
  o          sign out (this run only)
  h          show this help
  q          quit";

/// One line of input in the browse loop.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Toggle,
    Refresh,
    Select(i64),
    Back,
    SwitchUser(String),
    SignOut,
    Help,
    Quit,
}

impl BrowseCommand {
    /// `Ok(None)` for a blank line.
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let argument = words.next();

        let command = match (verb.to_ascii_lowercase().as_str(), argument) {
            ("t" | "toggle", None) => Self::Toggle,
            ("r" | "refresh", None) => Self::Refresh,
            ("b" | "back", None) => Self::Back,
            ("o" | "signout", None) => Self::SignOut,
            ("h" | "help" | "?", None) => Self::Help,
            ("q" | "quit" | "exit", None) => Self::Quit,
            ("s" | "select", Some(id)) => Self::Select(
                id.trim_start_matches('#')
                    .parse()
                    .map_err(|_| format!("not a question id: {id}"))?,
            ),
            ("s" | "select", None) => return Err("usage: s ID".to_string()),
            ("u" | "user", Some(email)) => Self::SwitchUser(email.to_string()),
            ("u" | "user", None) => return Err("usage: u EMAIL".to_string()),
            _ => return Err(format!("unknown command: {} (h for help)", line.trim())),
        };

        if words.next().is_some() {
            return Err(format!("unexpected input after command: {}", line.trim()));
        }
        Ok(Some(command))
    }
}

type RefreshFuture<'a> = Pin<Box<dyn Future<Output = FetchOutcome> + 'a>>;

async fn finish_refresh(refresh: &mut Option<RefreshFuture<'_>>) -> FetchOutcome {
    match refresh.as_mut() {
        Some(future) => future.await,
        None => std::future::pending().await,
    }
}

/// Interactive question page: re-renders on every state change and reads
/// commands from stdin until `q` or end of input.
pub async fn handle(args: &BrowseArgs, ctx: AppContext, _flags: &GlobalFlags) -> anyhow::Result<()> {
    let AppContext {
        config,
        backend,
        session,
        ..
    } = ctx;
    let layout = args.layout.unwrap_or(config.general.default_layout);
    let options = PageOptions::from_prefs(config.general.grid_columns, true);

    let page = QuestionPage::new(backend, StderrNotifier::from_prefs(), session.clone(), layout);
    let mut state_rx = page.watch();
    let effect = page.run(session.subscribe());
    tokio::pin!(effect);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut refresh: Option<RefreshFuture<'_>> = None;
    let mut spinner: Option<Progress> = None;

    show(&page.state(), &options, &mut spinner);

    loop {
        tokio::select! {
            () = &mut effect => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                show(&state, &options, &mut spinner);
            }
            outcome = finish_refresh(&mut refresh), if refresh.is_some() => {
                refresh = None;
                tracing::debug!(?outcome, "manual refresh finished");
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                match BrowseCommand::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(BrowseCommand::Quit)) => break,
                    Ok(Some(BrowseCommand::Toggle)) => page.toggle_layout(),
                    Ok(Some(BrowseCommand::Refresh)) => {
                        if session.current().as_ref().and_then(AuthIdentity::usable_email).is_none() {
                            page.notifier()
                                .show(Notification::info("not signed in; use `u EMAIL` first"));
                        } else {
                            refresh = Some(Box::pin(page.refetch()));
                        }
                    }
                    Ok(Some(BrowseCommand::Select(id))) => {
                        if !page.select_question(id) {
                            page.notifier()
                                .show(Notification::info(format!("no question #{id} on this page")));
                        }
                    }
                    Ok(Some(BrowseCommand::Back)) => page.back(),
                    Ok(Some(BrowseCommand::SwitchUser(email))) => {
                        session.sign_in(AuthIdentity::from_email(email));
                    }
                    Ok(Some(BrowseCommand::SignOut)) => session.sign_out(),
                    Ok(Some(BrowseCommand::Help)) => println!("{HELP}"),
                    Err(message) => page.notifier().show(Notification::info(message)),
                }
            }
        }
    }

    Ok(())
}

fn show(state: &ViewState, options: &PageOptions, spinner: &mut Option<Progress>) {
    if state.loading {
        if spinner.is_none() {
            *spinner = Some(Progress::spinner("Loading questions"));
        }
    } else if let Some(done) = spinner.take() {
        done.finish_clear();
    }
    println!("\n{}", render_page(state, options));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::BrowseCommand;

    #[rstest]
    #[case("t", BrowseCommand::Toggle)]
    #[case("  R ", BrowseCommand::Refresh)]
    #[case("s 42", BrowseCommand::Select(42))]
    #[case("select #7", BrowseCommand::Select(7))]
    #[case("b", BrowseCommand::Back)]
    #[case("u a@x.com", BrowseCommand::SwitchUser("a@x.com".into()))]
    #[case("o", BrowseCommand::SignOut)]
    #[case("?", BrowseCommand::Help)]
    #[case("quit", BrowseCommand::Quit)]
    fn parses_commands(#[case] line: &str, #[case] expected: BrowseCommand) {
        assert_eq!(BrowseCommand::parse(line), Ok(Some(expected)));
    }

    #[test]
    fn blank_line_is_not_a_command() {
        assert_eq!(BrowseCommand::parse("   "), Ok(None));
    }

    #[rstest]
    #[case("s")]
    #[case("s abc")]
    #[case("u")]
    #[case("t now")]
    #[case("x")]
    fn rejects_malformed_input(#[case] line: &str) {
        assert!(BrowseCommand::parse(line).is_err());
    }
}
