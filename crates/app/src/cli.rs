use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use engine::MoneyCents;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "settleup")]
#[command(about = "Track shared expenses and settle up with the fewest payments")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the ledger snapshot path.
    #[arg(long, env = "SETTLEUP_LEDGER")]
    pub ledger: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Participant(Participant),
    Group(Group),
    Expense(Expense),
    /// Record a direct repayment.
    Settle(SettleArgs),
    /// Non-zero balances and simplified debts of a group.
    Balances(GroupArg),
    /// Expenses and settlements of a group, newest first.
    History(GroupArg),
    /// Whether a group (or one participant in it) is settled.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct Participant {
    #[command(subcommand)]
    pub command: ParticipantCommand,
}

#[derive(Subcommand, Debug)]
pub enum ParticipantCommand {
    Add(ParticipantAddArgs),
}

#[derive(Args, Debug)]
pub struct ParticipantAddArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct Group {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    Create(GroupCreateArgs),
    Show(GroupArg),
    /// Groups a participant belongs to.
    List(UserArg),
    AddMember(MemberArgs),
    RemoveMember(RequesterMemberArgs),
    Delete(RequesterArgs),
}

#[derive(Args, Debug)]
pub struct GroupCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Username of the administrator.
    #[arg(long)]
    pub admin: String,
    #[arg(long, value_delimiter = ',')]
    pub members: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GroupArg {
    #[arg(long)]
    pub group: Uuid,
}

#[derive(Args, Debug)]
pub struct UserArg {
    #[arg(long)]
    pub username: String,
}

#[derive(Args, Debug)]
pub struct MemberArgs {
    #[arg(long)]
    pub group: Uuid,
    #[arg(long)]
    pub username: String,
}

#[derive(Args, Debug)]
pub struct RequesterMemberArgs {
    #[arg(long)]
    pub group: Uuid,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub requester: String,
}

#[derive(Args, Debug)]
pub struct RequesterArgs {
    #[arg(long)]
    pub group: Uuid,
    #[arg(long)]
    pub requester: String,
}

#[derive(Args, Debug)]
pub struct Expense {
    #[command(subcommand)]
    pub command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    Add(ExpenseAddArgs),
}

#[derive(Args, Debug)]
pub struct ExpenseAddArgs {
    #[arg(long)]
    pub group: Uuid,
    #[arg(long)]
    pub paid_by: String,
    #[arg(long)]
    pub description: String,
    /// Total amount, e.g. `100` or `12,50`.
    #[arg(long)]
    pub amount: MoneyCents,
    /// `equal` or `exact`.
    #[arg(long, default_value = "equal")]
    pub split: String,
    /// Participants of an EQUAL split, in order (the first absorbs rounding).
    #[arg(long, value_delimiter = ',')]
    pub with: Vec<String>,
    /// Shares of an EXACT split, as `username=amount`.
    #[arg(long = "share", value_parser = parse_share)]
    pub shares: Vec<(String, MoneyCents)>,
}

#[derive(Args, Debug)]
pub struct SettleArgs {
    #[arg(long)]
    pub group: Uuid,
    #[arg(long)]
    pub payer: String,
    #[arg(long)]
    pub payee: String,
    #[arg(long)]
    pub amount: MoneyCents,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub group: Uuid,
    /// Check a single participant instead of the whole group.
    #[arg(long)]
    pub participant: Option<String>,
}

fn parse_share(raw: &str) -> Result<(String, MoneyCents), String> {
    let (user, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected username=amount, got {raw:?}"))?;
    let user = user.trim();
    if user.is_empty() {
        return Err(format!("missing username in {raw:?}"));
    }
    let amount = amount.parse::<MoneyCents>().map_err(|err| err.to_string())?;
    Ok((user.to_string(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_parses_username_and_amount() {
        assert_eq!(
            parse_share("bob=12,50").unwrap(),
            ("bob".to_string(), MoneyCents::new(12_50))
        );
        assert!(parse_share("bob").is_err());
        assert!(parse_share("=1").is_err());
        assert!(parse_share("bob=1.234").is_err());
    }

    #[test]
    fn expense_add_accepts_exact_shares() {
        let group = Uuid::new_v4().to_string();
        let cli = Cli::try_parse_from([
            "settleup",
            "expense",
            "add",
            "--group",
            group.as_str(),
            "--paid-by",
            "alice",
            "--description",
            "Hotel",
            "--amount",
            "90",
            "--split",
            "exact",
            "--share",
            "alice=30",
            "--share",
            "bob=60",
        ])
        .unwrap();
        let Command::Expense(Expense {
            command: ExpenseCommand::Add(args),
        }) = cli.command
        else {
            panic!("expected expense add");
        };
        assert_eq!(args.amount, MoneyCents::new(90_00));
        assert_eq!(args.shares.len(), 2);
    }
}
