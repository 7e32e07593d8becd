//! Executes a parsed command against the ledger.

use std::collections::BTreeMap;

use api_types::{
    balance::SettledCheck,
    expense::{Created, ExpenseNew},
    group::GroupNew,
    participant::ParticipantNew,
    settlement::SettlementNew,
};
use chrono::Utc;
use engine::{Engine, EngineError, GroupId, ParticipantId, SettlementScope, SplitPolicy};
use serde::Serialize;
use serde_json::Value;

use crate::{
    cli::{
        CheckArgs, Command, ExpenseAddArgs, ExpenseCommand, GroupCommand, ParticipantCommand,
        SettleArgs,
    },
    convert,
    error::{AppError, Result},
};

/// Result of a command: what to print and whether the ledger must be saved.
#[derive(Debug)]
pub struct Outcome {
    pub output: Value,
    pub mutated: bool,
}

impl Outcome {
    fn read<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            output: serde_json::to_value(value)?,
            mutated: false,
        })
    }

    fn write<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            output: serde_json::to_value(value)?,
            mutated: true,
        })
    }
}

pub fn run(engine: &mut Engine, command: Command) -> Result<Outcome> {
    let result = match command {
        Command::Participant(participant) => match participant.command {
            ParticipantCommand::Add(args) => add_participant(
                engine,
                ParticipantNew {
                    username: args.username,
                    name: args.name,
                },
            ),
        },
        Command::Group(group) => run_group(engine, group.command),
        Command::Expense(expense) => match expense.command {
            ExpenseCommand::Add(args) => add_expense(engine, args),
        },
        Command::Settle(args) => settle(engine, args),
        Command::Balances(args) => {
            let sheet = engine.balance_sheet(GroupId::from(args.group))?;
            Outcome::read(convert::balance_sheet(sheet))
        }
        Command::History(args) => {
            let items: Vec<_> = engine
                .group_history(GroupId::from(args.group))?
                .into_iter()
                .map(convert::history_item)
                .collect();
            Outcome::read(items)
        }
        Command::Check(args) => check(engine, args),
    };

    if let Err(AppError::Engine(EngineError::PreconditionFailed(reason))) = &result {
        tracing::warn!("refused: {reason}");
    }
    result
}

fn add_participant(engine: &mut Engine, dto: ParticipantNew) -> Result<Outcome> {
    let id = ParticipantId::from(dto.username);
    engine.register_participant(id.clone(), &dto.name)?;
    tracing::info!("registered participant {id}");
    Outcome::write(engine.participant(&id)?)
}

fn run_group(engine: &mut Engine, command: GroupCommand) -> Result<Outcome> {
    match command {
        GroupCommand::Create(args) => create_group(
            engine,
            GroupNew {
                name: args.name,
                description: args.description,
                created_by: args.admin,
                members: args.members,
            },
        ),
        GroupCommand::Show(args) => {
            let group = engine.group(GroupId::from(args.group))?;
            Outcome::read(convert::group_response(engine, group))
        }
        GroupCommand::List(args) => {
            let view: &Engine = engine;
            let groups: Vec<_> = view
                .groups_of(&ParticipantId::from(args.username))?
                .into_iter()
                .map(|group| convert::group_response(view, group))
                .collect();
            Outcome::read(groups)
        }
        GroupCommand::AddMember(args) => {
            let group_id = GroupId::from(args.group);
            let participant = ParticipantId::from(args.username);
            engine.add_member(group_id, &participant)?;
            tracing::info!("added {participant} to group {group_id}");
            Outcome::write(convert::group_response(engine, engine.group(group_id)?))
        }
        GroupCommand::RemoveMember(args) => {
            let group_id = GroupId::from(args.group);
            let participant = ParticipantId::from(args.username);
            engine.remove_member(group_id, &participant, &ParticipantId::from(args.requester))?;
            tracing::info!("removed {participant} from group {group_id}");
            Outcome::write(convert::group_response(engine, engine.group(group_id)?))
        }
        GroupCommand::Delete(args) => {
            let group_id = GroupId::from(args.group);
            tracing::warn!("delete requested for group {group_id} by {}", args.requester);
            engine.delete_group(group_id, &ParticipantId::from(args.requester))?;
            tracing::info!("deleted group {group_id}");
            Outcome::write(Created {
                id: group_id.as_uuid(),
            })
        }
    }
}

fn create_group(engine: &mut Engine, dto: GroupNew) -> Result<Outcome> {
    let members: Vec<ParticipantId> = dto.members.into_iter().map(ParticipantId::from).collect();
    let group_id = engine.create_group(
        &dto.name,
        dto.description.as_deref(),
        &ParticipantId::from(dto.created_by),
        &members,
        Utc::now(),
    )?;
    tracing::info!("created group {group_id}");
    let group = engine.group(group_id)?;
    Outcome::write(convert::group_response(engine, group))
}

fn add_expense(engine: &mut Engine, args: ExpenseAddArgs) -> Result<Outcome> {
    let policy = SplitPolicy::try_from(args.split.as_str())?;
    let exact = policy == SplitPolicy::Exact;
    if exact && !args.with.is_empty() {
        return Err(AppError::Argument(
            "--with applies to equal splits; use --share for exact ones".to_string(),
        ));
    }
    if !exact && !args.shares.is_empty() {
        return Err(AppError::Argument(
            "--share applies to exact splits; use --with for equal ones".to_string(),
        ));
    }

    let mut exact_splits = BTreeMap::new();
    for (user, amount) in args.shares {
        if exact_splits.insert(user.clone(), amount.cents()).is_some() {
            return Err(AppError::Argument(format!("{user} has more than one share")));
        }
    }

    let dto = ExpenseNew {
        group_id: args.group,
        paid_by: args.paid_by,
        description: args.description,
        amount_minor: args.amount.cents(),
        split_type: policy.as_str().to_string(),
        involved_users: (!args.with.is_empty()).then_some(args.with),
        exact_splits: (!exact_splits.is_empty()).then_some(exact_splits),
    };

    let request = convert::expense_request(dto)?;
    let expense_id = engine.record_expense(request, Utc::now())?;
    tracing::info!("recorded {} expense {expense_id}", policy.as_str());
    Outcome::write(Created {
        id: expense_id.as_uuid(),
    })
}

fn settle(engine: &mut Engine, args: SettleArgs) -> Result<Outcome> {
    let request = convert::settlement_request(SettlementNew {
        group_id: args.group,
        payer: args.payer,
        payee: args.payee,
        amount_minor: args.amount.cents(),
    });
    let settlement_id = engine.record_settlement(request, Utc::now())?;
    tracing::info!("recorded settlement {settlement_id}");
    Outcome::write(Created {
        id: settlement_id.as_uuid(),
    })
}

fn check(engine: &Engine, args: CheckArgs) -> Result<Outcome> {
    let scope = match &args.participant {
        Some(username) => SettlementScope::Participant(ParticipantId::from(username.as_str())),
        None => SettlementScope::Group,
    };
    let settled = engine.check_settled(GroupId::from(args.group), &scope)?;
    Outcome::read(SettledCheck {
        group_id: args.group,
        username: args.participant,
        settled,
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn exec(engine: &mut Engine, args: &[&str]) -> Result<Outcome> {
        let cli = Cli::try_parse_from(std::iter::once("settleup").chain(args.iter().copied()))
            .map_err(|err| AppError::Argument(err.to_string()))?;
        run(engine, cli.command)
    }

    fn setup() -> (Engine, String) {
        let mut engine = Engine::builder().build().unwrap();
        for (username, name) in [("alice", "Alice"), ("bob", "Bob"), ("charlie", "Charlie")] {
            exec(
                &mut engine,
                &["participant", "add", "--username", username, "--name", name],
            )
            .unwrap();
        }
        let created = exec(
            &mut engine,
            &[
                "group", "create", "--name", "Trip", "--admin", "alice", "--members",
                "bob,charlie",
            ],
        )
        .unwrap();
        assert!(created.mutated);
        let group = created.output["id"].as_str().unwrap().to_string();
        (engine, group)
    }

    #[test]
    fn equal_expense_then_balances() {
        let (mut engine, group) = setup();
        exec(
            &mut engine,
            &[
                "expense", "add", "--group", &group, "--paid-by", "alice", "--description",
                "Dinner", "--amount", "100", "--with", "alice,bob,charlie",
            ],
        )
        .unwrap();

        let sheet = exec(&mut engine, &["balances", "--group", &group]).unwrap();
        assert!(!sheet.mutated);
        assert_eq!(
            sheet.output["balances"][0]["amount_minor"],
            serde_json::json!(66_66)
        );
        assert_eq!(
            sheet.output["simplified_debts"],
            serde_json::json!([
                {"from_user": "Bob", "to_user": "Alice", "amount_minor": 33_33},
                {"from_user": "Charlie", "to_user": "Alice", "amount_minor": 33_33},
            ])
        );
    }

    #[test]
    fn shares_are_rejected_for_equal_splits() {
        let (mut engine, group) = setup();
        let err = exec(
            &mut engine,
            &[
                "expense", "add", "--group", &group, "--paid-by", "alice", "--description",
                "Taxi", "--amount", "10", "--share", "bob=10",
            ],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Argument(_)));
    }

    #[test]
    fn unknown_split_type_is_reported_before_argument_mix_ups() {
        let (mut engine, group) = setup();
        let err = exec(
            &mut engine,
            &[
                "expense", "add", "--group", &group, "--paid-by", "alice", "--description",
                "Taxi", "--amount", "10", "--split", "percent", "--share", "bob=10",
            ],
        )
        .unwrap_err();
        let AppError::Engine(EngineError::InvalidInput(reason)) = &err else {
            panic!("expected an invalid split type, got {err:?}");
        };
        assert!(reason.contains("Use EQUAL or EXACT"));
        assert!(engine.snapshot().events.is_empty());
    }

    #[test]
    fn delete_is_refused_until_settled() {
        let (mut engine, group) = setup();
        exec(
            &mut engine,
            &[
                "expense", "add", "--group", &group, "--paid-by", "alice", "--description",
                "Hotel", "--amount", "60", "--split", "exact", "--share", "alice=30", "--share",
                "bob=30",
            ],
        )
        .unwrap();

        let err = exec(
            &mut engine,
            &["group", "delete", "--group", &group, "--requester", "alice"],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Engine(EngineError::PreconditionFailed(_))
        ));

        let check = exec(
            &mut engine,
            &["check", "--group", &group, "--participant", "bob"],
        )
        .unwrap();
        assert_eq!(check.output["settled"], serde_json::json!(false));

        exec(
            &mut engine,
            &[
                "settle", "--group", &group, "--payer", "bob", "--payee", "alice", "--amount",
                "30",
            ],
        )
        .unwrap();
        let deleted = exec(
            &mut engine,
            &["group", "delete", "--group", &group, "--requester", "alice"],
        )
        .unwrap();
        assert!(deleted.mutated);
        assert!(engine.snapshot().groups.is_empty());
    }

    #[test]
    fn history_describes_settlements() {
        let (mut engine, group) = setup();
        exec(
            &mut engine,
            &[
                "expense", "add", "--group", &group, "--paid-by", "alice", "--description",
                "Lunch", "--amount", "20", "--with", "alice,bob",
            ],
        )
        .unwrap();
        exec(
            &mut engine,
            &[
                "settle", "--group", &group, "--payer", "bob", "--payee", "alice", "--amount",
                "10",
            ],
        )
        .unwrap();

        let history = exec(&mut engine, &["history", "--group", &group]).unwrap();
        let items = history.output.as_array().unwrap();
        assert_eq!(items.len(), 2);
        let settlement = items
            .iter()
            .find(|item| item["type"] == serde_json::json!("SETTLEMENT"))
            .unwrap();
        assert_eq!(settlement["description"], serde_json::json!("Bob paid Alice"));
        assert!(settlement.get("splits").is_none());
        let expense = items
            .iter()
            .find(|item| item["type"] == serde_json::json!("EXPENSE"))
            .unwrap();
        assert_eq!(expense["splits"].as_array().unwrap().len(), 2);
    }
}
