//! Line-driven front end.
//!
//! Each input line is one command. Plain text becomes the query (so typing
//! behaves like editing the search field), `:more` loads the next page,
//! `:clear` empties the field and `:quit` stops. Every state change is
//! printed as a one-line summary followed by any photos not shown yet.

use crate::model::Photo;
use crate::state::{SearchSession, SearchUiState};
use std::io;
use std::ops::ControlFlow;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::debug;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the query text.
    Query(String),
    /// `:more`: fetch the next page.
    LoadMore,
    /// `:clear`: empty the query.
    Clear,
    /// `:quit`: stop reading input.
    Quit,
}

/// Parse an input line. Anything that is not a known `:` command is query text.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.trim() {
        ":more" | ":m" => Command::LoadMore,
        ":clear" | ":c" => Command::Clear,
        ":quit" | ":q" => Command::Quit,
        _ => Command::Query(line.to_string()),
    }
}

/// Forward a command to the session.
pub fn apply_command(session: &SearchSession, command: Command) -> ControlFlow<()> {
    debug!(?command, "Applying command");
    match command {
        Command::Query(text) => session.set_query(text),
        Command::LoadMore => session.load_more(),
        Command::Clear => session.clear(),
        Command::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

/// Read commands until `:quit` or end of input.
///
/// # Errors
///
/// Returns the underlying I/O error if reading fails.
pub async fn run_commands<R>(session: &SearchSession, reader: R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if apply_command(session, parse_command(&line)).is_break() {
            break;
        }
    }
    Ok(())
}

/// One-line description of the state.
pub fn render_summary(state: &SearchUiState) -> String {
    let mut line = if state.query.trim().is_empty() {
        "(no query)".to_string()
    } else {
        format!("{:?}", state.query)
    };
    line.push_str(&format!(
        ": {} photos, page {}/{}, {} total",
        state.items.len(),
        state.current_page,
        state.total_pages,
        state.total_items
    ));

    if state.has_next_page {
        line.push_str(", more available");
    }
    if state.is_loading {
        line.push_str(", loading");
    }
    if state.is_loading_more {
        line.push_str(", loading more");
    }
    if let Some(error) = &state.error {
        line.push_str(&format!(", error: {error}"));
    }
    line
}

/// Print every state update to `out` until the session goes away.
///
/// Photos already present when the printer starts count as shown. When the
/// new items extend the ones already printed only the tail is printed; a
/// replaced result list is printed in full.
///
/// # Errors
///
/// Returns the underlying I/O error if writing fails.
pub async fn print_updates<W>(
    mut updates: watch::Receiver<SearchUiState>,
    out: &mut W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut shown: Vec<Photo> = updates.borrow().items.clone();

    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();

        let mut text = render_summary(&state);
        text.push('\n');
        let fresh = if state.items.starts_with(&shown) {
            &state.items[shown.len()..]
        } else {
            &state.items[..]
        };
        for photo in fresh {
            text.push_str(&format!("  {photo}\n"));
        }

        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        shown = state.items;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionOptions;
    use crate::test_harness::{page, photo, ScriptedSource};
    use std::time::Duration;

    fn loaded_state() -> SearchUiState {
        let mut state = SearchUiState::default();
        state.set_query("cats");
        state.begin_search();
        state.apply_first_page(page(&["p1", "p2"], 1, 5, 100));
        state
    }

    // ===== parse_command Tests =====

    #[test]
    fn plain_text_is_query() {
        assert_eq!(parse_command("red fox"), Command::Query("red fox".to_string()));
    }

    #[test]
    fn query_keeps_inner_whitespace_and_drops_line_ending() {
        assert_eq!(parse_command(" cats \r\n"), Command::Query(" cats ".to_string()));
    }

    #[test]
    fn empty_line_is_empty_query() {
        assert_eq!(parse_command(""), Command::Query(String::new()));
    }

    #[test]
    fn colon_commands_parse() {
        assert_eq!(parse_command(":more"), Command::LoadMore);
        assert_eq!(parse_command(":m"), Command::LoadMore);
        assert_eq!(parse_command(":clear"), Command::Clear);
        assert_eq!(parse_command(" :quit "), Command::Quit);
        assert_eq!(parse_command(":q"), Command::Quit);
    }

    #[test]
    fn unknown_colon_text_is_query() {
        assert_eq!(parse_command(":cats"), Command::Query(":cats".to_string()));
    }

    // ===== render_summary Tests =====

    #[test]
    fn summary_of_empty_state() {
        insta::assert_snapshot!(
            render_summary(&SearchUiState::default()),
            @"(no query): 0 photos, page 1/0, 0 total"
        );
    }

    #[test]
    fn summary_of_loaded_state() {
        insta::assert_snapshot!(
            render_summary(&loaded_state()),
            @r#""cats": 2 photos, page 1/5, 100 total, more available"#
        );
    }

    #[test]
    fn summary_while_loading_more() {
        let mut state = loaded_state();
        state.begin_load_more(20);

        insta::assert_snapshot!(
            render_summary(&state),
            @r#""cats": 2 photos, page 1/5, 100 total, more available, loading more"#
        );
    }

    #[test]
    fn summary_with_error() {
        let mut state = SearchUiState::default();
        state.set_query("error");
        state.begin_search();
        state.fail_search("Network error: connection reset");

        insta::assert_snapshot!(
            render_summary(&state),
            @r#""error": 0 photos, page 1/0, 0 total, error: Network error: connection reset"#
        );
    }

    // ===== print_updates Tests =====

    #[tokio::test]
    async fn print_updates_writes_summary_and_new_photos() {
        let (tx, rx) = watch::channel(SearchUiState::default());
        tx.send_modify(|state| *state = loaded_state());
        drop(tx);

        let mut out = Vec::new();
        print_updates(rx, &mut out).await.expect("write to vec");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "\"cats\": 2 photos, page 1/5, 100 total, more available\n\
             \x20 p1 https://example.com/p1.jpg\n\
             \x20 p2 https://example.com/p2.jpg\n"
        );
    }

    #[tokio::test]
    async fn print_updates_prints_only_appended_photos() {
        let (tx, rx) = watch::channel(loaded_state());
        let printer = tokio::spawn(async move {
            let mut out = Vec::new();
            print_updates(rx, &mut out).await.map(|()| out)
        });
        tokio::task::yield_now().await;

        tx.send_modify(|state| {
            state.begin_load_more(20);
            state.apply_next_page(page(&["p3"], 2, 5, 100));
        });
        drop(tx);
        let out = printer.await.expect("printer task").expect("write to vec");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("p3 https://example.com/p3.jpg"));
        assert!(!text.contains("p1 "), "already shown photos are skipped: {text}");
    }

    // ===== run_commands Tests =====

    #[tokio::test(start_paused = true)]
    async fn run_commands_stops_at_quit() {
        let source = ScriptedSource::new();
        let session = SearchSession::spawn(source.clone(), SessionOptions::default());

        run_commands(&session, &b"cats\n:quit\ndogs\n"[..])
            .await
            .expect("read input");

        assert_eq!(session.snapshot().query, "cats");
    }

    #[tokio::test(start_paused = true)]
    async fn run_commands_drives_search_and_load_more() {
        let source = ScriptedSource::new();
        source.respond("cats", 1, Ok(page(&["p1"], 1, 5, 100)));
        source.respond("cats", 2, Ok(page(&["p2"], 2, 5, 100)));
        let session = SearchSession::spawn(source.clone(), SessionOptions::default());

        run_commands(&session, &b"cats\n"[..]).await.expect("read input");
        let mut rx = session.subscribe();
        rx.wait_for(|s| !s.items.is_empty()).await.expect("session alive");

        run_commands(&session, &b":more\n"[..]).await.expect("read input");
        let state = rx
            .wait_for(|s| s.items.len() == 2)
            .await
            .expect("session alive")
            .clone();

        assert_eq!(state.items, vec![photo("p1"), photo("p2")]);
    }

    #[tokio::test(start_paused = true)]
    async fn run_commands_clear_resets_results() {
        let source = ScriptedSource::new();
        source.respond("cats", 1, Ok(page(&["p1"], 1, 5, 100)));
        let session = SearchSession::spawn(source.clone(), SessionOptions::default());
        let mut rx = session.subscribe();

        run_commands(&session, &b"cats\n"[..]).await.expect("read input");
        rx.wait_for(|s| !s.items.is_empty()).await.expect("session alive");
        run_commands(&session, &b":clear\n"[..]).await.expect("read input");
        rx.wait_for(|s| s.items.is_empty()).await.expect("session alive");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(source.call_count(), 1);
        assert_eq!(session.snapshot().query, "");
    }
}
