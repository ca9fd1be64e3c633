//! Command-line arguments for the `signup` binary.

use clap::{Parser, Subcommand};

/// `signup` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "signup",
    about = "Browse publications, subscribe, and inspect the local payments ledger",
    version
)]
pub struct CliArgs {
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed by the `signup` binary.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List subscribable publications.
    Publications,
    /// List the subscriptions held by a customer.
    Subscriptions {
        /// Customer name exactly as registered.
        #[arg(long, value_name = "name")]
        name: String,
    },
    /// Subscribe a customer to a publication.
    Subscribe {
        /// Publication identifier.
        #[arg(long, value_name = "id")]
        publication: String,
        /// Customer name.
        #[arg(long, value_name = "name")]
        name: String,
    },
    /// Show the locally cached payments ledger.
    Payments,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::publications(&["signup", "publications"], Command::Publications)]
    #[case::payments(&["signup", "payments"], Command::Payments)]
    #[case::subscriptions(
        &["signup", "subscriptions", "--name", "Asha"],
        Command::Subscriptions { name: "Asha".to_owned() }
    )]
    #[case::subscribe(
        &["signup", "subscribe", "--publication", "p1", "--name", "Asha B"],
        Command::Subscribe { publication: "p1".to_owned(), name: "Asha B".to_owned() }
    )]
    fn parses_subcommands(#[case] argv: &[&str], #[case] expected: Command) {
        let args = CliArgs::try_parse_from(argv).expect("arguments should parse");
        assert_eq!(args.command, expected);
    }

    #[rstest]
    fn subscribe_requires_a_publication() {
        let result = CliArgs::try_parse_from(["signup", "subscribe", "--name", "Asha"]);
        assert!(result.is_err());
    }
}
