//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `diffable_core` linkage.
//! - Drive the roster through a console sink so edit batches can be eyeballed.
//!
use diffable_core::{
    ApplyProgress, BusyPolicy, Contact, DataSource, Edit, EditBatch, Friend, ReconcilerConfig,
    RenderSink, RosterResult, RosterService, UserId, UserRow, UserSection,
};
use clap::Parser;
use log::info;
use std::process::ExitCode;

const FRIENDS: [(&str, &str); 3] = [("Ada", "Lovelace"), ("Alan", "Kay"), ("Barbara", "Liskov")];
const CONTACTS: [(&str, &str, Option<&str>); 2] = [
    ("Grace", "Hopper", Some("555-0100")),
    ("Edsger", "Dijkstra", None),
];

/// Prints each batch and the headers it would display.
struct ConsoleSink;

impl RenderSink<UserSection, UserRow> for ConsoleSink {
    fn apply(
        &mut self,
        batch: &EditBatch<UserSection, UserId>,
        source: &dyn DataSource<UserSection, UserRow>,
    ) -> ApplyProgress {
        println!(
            "{} phase={:?} animation={:?}",
            batch.ticket, batch.phase, batch.animation
        );
        for edit in &batch.edits {
            println!("  {}", describe(edit, source));
        }
        ApplyProgress::Complete
    }
}

fn describe(edit: &Edit<UserSection, UserId>, source: &dyn DataSource<UserSection, UserRow>) -> String {
    let title = |id: UserId| {
        source
            .item(id)
            .map(UserRow::title)
            .unwrap_or_else(|| id.to_string())
    };
    match edit {
        Edit::ReloadSection { section } => format!("reload header \"{}\"", source.header_text(*section)),
        Edit::InsertBefore {
            item,
            anchor,
            section,
        } => match anchor {
            Some(anchor) => format!("insert {} before {} in {section:?}", title(*item), title(*anchor)),
            None => format!("append {} to {section:?}", title(*item)),
        },
        Edit::Delete { item } => format!("delete {item}"),
        Edit::Move {
            item,
            anchor,
            section,
        } => format!("move {} before {anchor:?} in {section:?}", title(*item)),
    }
}

#[derive(Parser)]
#[command(name = "diffable_cli")]
#[command(about = "Drive the friends/contacts roster through a console sink")]
struct CliArgs {
    /// Queue mutations that arrive while a batch is applying instead of dropping them.
    #[arg(long)]
    queue: bool,
    /// Absolute directory for rolling log files; logging stays off without it.
    #[arg(long)]
    log_dir: Option<String>,
}

impl CliArgs {
    fn busy_policy(&self) -> BusyPolicy {
        if self.queue {
            BusyPolicy::Queue
        } else {
            BusyPolicy::Drop
        }
    }
}

fn run(config: ReconcilerConfig) -> RosterResult<()> {
    let mut roster = RosterService::new(ConsoleSink, config);

    for (first, last) in FRIENDS {
        roster.append_friend(Friend::new(first, last))?;
    }
    for (first, last, phone) in CONTACTS {
        roster.append_contact(Contact::new(first, last, phone.map(str::to_string)))?;
    }
    if let Some(friend) = roster.remove_random_friend()? {
        println!("removed friend {}", friend.name.full_name());
    }
    if let Some(contact) = roster.remove_random_contact()? {
        println!("removed contact {}", contact.name.full_name());
    }

    println!("{}", roster.header_text(UserSection::Friends));
    println!("{}", roster.header_text(UserSection::Contacts));
    Ok(())
}

fn main() -> ExitCode {
    println!("diffable_core ping={}", diffable_core::ping());
    println!("diffable_core version={}", diffable_core::core_version());

    let args = CliArgs::parse();
    let busy_policy = args.busy_policy();

    if let Some(log_dir) = args.log_dir.as_deref() {
        if let Err(err) = diffable_core::init_logging(diffable_core::default_log_level(), log_dir) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }
    info!(
        "event=cli_start module=cli status=ok busy_policy={:?}",
        busy_policy
    );

    match run(ReconcilerConfig::with_busy_policy(busy_policy)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::{CommandFactory, Parser};
    use diffable_core::BusyPolicy;

    #[test]
    fn command_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn flags_select_policy_and_log_dir() {
        let defaults = CliArgs::try_parse_from(["diffable_cli"]).unwrap();
        assert_eq!(defaults.busy_policy(), BusyPolicy::Drop);
        assert!(defaults.log_dir.is_none());

        let args =
            CliArgs::try_parse_from(["diffable_cli", "--queue", "--log-dir", "/tmp/diffable"])
                .unwrap();
        assert_eq!(args.busy_policy(), BusyPolicy::Queue);
        assert_eq!(args.log_dir.as_deref(), Some("/tmp/diffable"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(CliArgs::try_parse_from(["diffable_cli", "--fast"]).is_err());
        assert!(CliArgs::try_parse_from(["diffable_cli", "--log-dir"]).is_err());
    }
}
