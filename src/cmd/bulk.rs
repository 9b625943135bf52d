//! Bulk actions over several campaigns — `adctl bulk`.

use anyhow::{Context, Result};
use console::style;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use adctl::bulk::BulkAction;
use adctl::campaign::CampaignFilter;
use adctl::config::Config;
use adctl::ui::icons::{CHECK, WARN};
use adctl::ui::{self, BulkProgressUI};

use super::{confirm, open_board, report_failure};

pub async fn cmd_bulk(config: &Config, action: &str, ids: &[String]) -> Result<()> {
    let action: BulkAction = action.parse()?;
    let mut ctl = open_board(config, false).await?;

    for id in ids {
        if !ctl.board_mut().select(id) && !ctl.board().selection().contains(id) {
            eprintln!("{}Campaign {} is not in the list, skipping", WARN, id);
        }
    }
    ctl.board_mut()
        .request_bulk(action)
        .context("Cannot start bulk action")?;

    let count = ctl.board().selection().len();
    let prompt = format!(
        "{} {} campaign(s)? Requests are sent one at a time.",
        capitalize(action.verb()),
        count
    );
    if !confirm(config, &prompt) {
        ctl.board_mut().cancel_bulk();
        println!("Bulk {} cancelled", action);
        return Ok(());
    }

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        let aborted = wait_for_abort(ctrl_c, || async {
            tokio::signal::ctrl_c().await.is_ok()
        })
        .await;
        if aborted {
            eprintln!("{}Aborted", WARN);
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    let progress = if console::Term::stderr().is_term() {
        BulkProgressUI::new()
    } else {
        BulkProgressUI::hidden()
    };
    let mut ctl = ctl
        .with_listener(Arc::new(progress))
        .with_cancellation(token);

    match ctl.run_bulk().await {
        Ok(done) => {
            println!(
                "{}{} {} campaign(s)",
                CHECK,
                style(past_tense(action)).green(),
                done
            );
            print!(
                "{}",
                ui::render_campaigns(
                    &ctl.board().filtered(&CampaignFilter::default()),
                    ctl.board().selection(),
                    ctl.board().currency(),
                )
            );
            Ok(())
        }
        Err(err) => Err(report_failure(&ctl, err, "Bulk action failed")),
    }
}

/// Exit status for a batch aborted by a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// First interrupt cancels the batch after the in-flight request; a second
/// one means the request itself is stuck. Returns `true` on the second
/// interrupt and `false` if the signal source goes away.
async fn wait_for_abort<F, Fut>(token: CancellationToken, mut interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    if !interrupt().await {
        return false;
    }
    token.cancel();
    eprintln!(
        "{}Stopping after the current request. Press Ctrl-C again to abort now.",
        WARN
    );
    interrupt().await
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn past_tense(action: BulkAction) -> &'static str {
    match action {
        BulkAction::Pause => "Paused",
        BulkAction::Activate => "Activated",
        BulkAction::Archive => "Archived",
        BulkAction::Duplicate => "Duplicated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    type Interrupt = std::pin::Pin<Box<dyn std::future::Future<Output = bool> + Send>>;

    /// Fake signal source: each `notify_one` is one Ctrl-C.
    fn interrupts(notify: &Arc<Notify>) -> impl FnMut() -> Interrupt + use<> {
        let notify = Arc::clone(notify);
        move || {
            let notify = Arc::clone(&notify);
            Box::pin(async move {
                notify.notified().await;
                true
            })
        }
    }

    #[tokio::test]
    async fn test_first_interrupt_cancels_second_aborts() {
        let notify = Arc::new(Notify::new());
        let token = CancellationToken::new();
        let watcher = tokio::spawn(wait_for_abort(token.clone(), interrupts(&notify)));

        notify.notify_one();
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .unwrap();
        assert!(!watcher.is_finished());

        notify.notify_one();
        let aborted = tokio::time::timeout(Duration::from_secs(1), watcher)
            .await
            .unwrap()
            .unwrap();
        assert!(aborted);
    }

    #[tokio::test]
    async fn test_no_signal_source_never_cancels() {
        let token = CancellationToken::new();
        let aborted = wait_for_abort(token.clone(), || async { false }).await;
        assert!(!aborted);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pause"), "Pause");
        assert_eq!(capitalize(""), "");
    }
}
