//! Command dispatch for the `signup` binary.

use std::io::{self, Write};
use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use super::{CliArgs, Command, SignupSettings, TerminalNavigator, TerminalNotifier};
use crate::domain::ports::{LedgerStore, Navigator, SubscriptionGateway};
use crate::domain::{
    LedgerCache, LedgerCacheError, LedgerWrite, NO_PUBLICATIONS, PaymentRecord, Publication,
    PublicationId, PublicationValidationError, SignupError, SignupFlow, SignupFlowPorts,
    SubscribeControl,
};
use crate::outbound::http::HttpSubscriptionGateway;
use crate::outbound::storage::FileLedgerStore;

/// Errors that stop a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The configured base URL is not a URL.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The ledger directory could not be opened.
    #[error("failed to open ledger directory: {0}")]
    LedgerDir(#[source] io::Error),
    /// The publication argument is not a valid identifier.
    #[error(transparent)]
    Publication(#[from] PublicationValidationError),
    /// The signup flow reported a failure.
    #[error(transparent)]
    Signup(#[from] SignupError),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<LedgerCacheError> for CommandError {
    fn from(value: LedgerCacheError) -> Self {
        Self::Signup(SignupError::Ledger(value))
    }
}

/// Build the production adapters from `settings` and run `args`.
///
/// Notifications go to standard error; command output goes to `out`.
///
/// # Errors
///
/// Returns [`CommandError`] when adapters cannot be built, the command
/// fails, or output cannot be written.
pub async fn run(
    args: CliArgs,
    settings: &SignupSettings,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let gateway = HttpSubscriptionGateway::new(
        settings.base_url()?,
        settings.request_timeout(),
        settings.token(),
    )?;
    let ledger_dir = settings.ledger_dir();
    let store = FileLedgerStore::open(&ledger_dir).map_err(CommandError::LedgerDir)?;
    let ledger = Arc::new(LedgerCache::new(Arc::new(store)));
    let navigator = Arc::new(TerminalNavigator::default());

    let flow = SignupFlow::new(SignupFlowPorts {
        gateway: Arc::new(gateway),
        ledger: Arc::clone(&ledger),
        clock: Arc::new(DefaultClock),
        notifier: Arc::new(TerminalNotifier::stderr()),
        navigator: Arc::clone(&navigator) as Arc<dyn Navigator>,
    });

    execute(args.command, &flow, &ledger, out).await?;
    if let Some(route) = navigator.current() {
        info!(route = %route, "command finished on view");
    }
    Ok(())
}

/// Run `command` against an assembled flow.
///
/// # Errors
///
/// Returns [`CommandError`] when the command fails or output cannot be
/// written.
pub async fn execute<G, S>(
    command: Command,
    flow: &SignupFlow<G, S>,
    ledger: &LedgerCache<S>,
    out: &mut impl Write,
) -> Result<(), CommandError>
where
    G: SubscriptionGateway,
    S: LedgerStore,
{
    match command {
        Command::Publications => {
            flow.activate().await;
            render_publications(out, &flow.publications())?;
        }
        Command::Subscriptions { name } => {
            flow.activate().await;
            flow.set_customer_name(&name).await;
            let controls: Vec<_> = flow
                .publications()
                .into_iter()
                .map(|publication| {
                    let control = flow.subscribe_control(publication.id());
                    (publication, control)
                })
                .collect();
            render_controls(out, &controls)?;
        }
        Command::Subscribe { publication, name } => {
            let id = PublicationId::new(publication)?;
            flow.activate().await;
            flow.set_customer_name(&name).await;
            flow.select_publication(&id)?;
            let receipt = flow.confirm_subscription().await?;
            let ledger_note = match receipt.ledger {
                LedgerWrite::Appended { ledger_len } => format!("ledger entries: {ledger_len}"),
                LedgerWrite::Failed(err) => format!("ledger not updated: {err}"),
            };
            writeln!(
                out,
                "{}\t{}\tdue {}\t{ledger_note}",
                receipt.record.subscription_name,
                receipt.record.amount,
                receipt.record.due_date.format("%Y-%m-%d"),
            )?;
        }
        Command::Payments => {
            render_ledger(out, &ledger.records()?)?;
        }
    }
    Ok(())
}

/// Write one line per publication, or the empty-state text.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn render_publications(out: &mut impl Write, publications: &[Publication]) -> io::Result<()> {
    if publications.is_empty() {
        return writeln!(out, "{NO_PUBLICATIONS}");
    }
    for publication in publications {
        writeln!(
            out,
            "{}\t{}\t{}\t{}/month",
            publication.id(),
            publication.name(),
            publication.language(),
            publication.monthly_price()
        )?;
    }
    Ok(())
}

/// Write each publication with its subscribe control label.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn render_controls(
    out: &mut impl Write,
    controls: &[(Publication, SubscribeControl)],
) -> io::Result<()> {
    if controls.is_empty() {
        return writeln!(out, "{NO_PUBLICATIONS}");
    }
    for (publication, control) in controls {
        writeln!(
            out,
            "{}\t{}\t{}",
            publication.id(),
            publication.name(),
            control.label
        )?;
    }
    Ok(())
}

/// Write one line per ledger entry.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn render_ledger(out: &mut impl Write, records: &[PaymentRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No payments recorded");
    }
    for record in records {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\tdue {}",
            record.id,
            record.subscription_name,
            record.amount,
            record.status,
            record.due_date.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Notifier;
    use crate::outbound::storage::MemoryLedgerStore;
    use crate::test_support::{FixedClock, RecordingNavigator, RecordingNotifier, ScriptedGateway};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    struct Fixture {
        flow: SignupFlow<ScriptedGateway, MemoryLedgerStore>,
        ledger: Arc<LedgerCache<MemoryLedgerStore>>,
    }

    fn daily() -> Publication {
        let id = PublicationId::new("p1").expect("valid id");
        Publication::try_new(id, "Daily Times", "en", Decimal::from(100)).expect("valid")
    }

    #[fixture]
    fn fixture() -> Fixture {
        let gateway = Arc::new(ScriptedGateway::with_publications(vec![daily()]));
        let ledger = Arc::new(LedgerCache::new(Arc::new(MemoryLedgerStore::default())));
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid instant");
        let flow = SignupFlow::new(SignupFlowPorts {
            gateway,
            ledger: Arc::clone(&ledger),
            clock: Arc::new(FixedClock::new(now)),
            notifier: Arc::new(RecordingNotifier::default()) as Arc<dyn Notifier>,
            navigator: Arc::new(RecordingNavigator::default()) as Arc<dyn Navigator>,
        });
        Fixture { flow, ledger }
    }

    async fn run_to_string(command: Command, fixture: &Fixture) -> String {
        let mut out = Vec::new();
        execute(command, &fixture.flow, &fixture.ledger, &mut out)
            .await
            .expect("command succeeds");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[rstest]
    #[tokio::test]
    async fn subscribe_then_list_shows_the_guard_and_the_ledger(fixture: Fixture) {
        let before = run_to_string(
            Command::Subscriptions {
                name: "Asha".to_owned(),
            },
            &fixture,
        )
        .await;
        assert_eq!(before, "p1\tDaily Times\tSubscribe\n");

        let receipt = run_to_string(
            Command::Subscribe {
                publication: "p1".to_owned(),
                name: "Asha".to_owned(),
            },
            &fixture,
        )
        .await;
        assert_eq!(receipt, "Daily Times\t100\tdue 2026-01-31\tledger entries: 1\n");

        let after = run_to_string(
            Command::Subscriptions {
                name: "Asha".to_owned(),
            },
            &fixture,
        )
        .await;
        assert_eq!(after, "p1\tDaily Times\tAlready Subscribed\n");

        let payments = run_to_string(Command::Payments, &fixture).await;
        assert!(payments.contains("Daily Times"), "{payments}");
        assert!(payments.contains("paid\tdue 2026-01-31"), "{payments}");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_publication_ids_fail_the_command(fixture: Fixture) {
        let mut out = Vec::new();
        let err = execute(
            Command::Subscribe {
                publication: "missing".to_owned(),
                name: "Asha".to_owned(),
            },
            &fixture.flow,
            &fixture.ledger,
            &mut out,
        )
        .await
        .expect_err("unknown publication must fail");

        assert!(matches!(err, CommandError::Signup(SignupError::Validation(_))));
    }

    #[rstest]
    fn empty_renderings_use_placeholder_text() {
        let mut out = Vec::new();
        render_publications(&mut out, &[]).expect("write");
        render_ledger(&mut out, &[]).expect("write");

        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            "No publications available\nNo payments recorded\n"
        );
    }
}
