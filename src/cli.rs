// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn group_arg() -> Arg {
    Arg::new("group")
        .long("group")
        .short('g')
        .help("Group id (defaults to the active group)")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("splitclip")
        .about("Group bill-splitting ledger: split strategies, payment tracking, balances")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("group")
                .about("Manage groups")
                .subcommand(
                    Command::new("create")
                        .about("Create a group")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("mode")
                                .long("mode")
                                .default_value("tracking")
                                .help("Payment tracking mode: accountant|tracking"),
                        )
                        .arg(Arg::new("id").long("id").help("Explicit group id")),
                )
                .subcommand(Command::new("list").about("List groups"))
                .subcommand(
                    Command::new("show")
                        .about("Show a group and its members")
                        .arg(group_arg()),
                )
                .subcommand(
                    Command::new("use")
                        .about("Select the active group")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a group (soft delete)")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("member")
                .about("Manage group members")
                .subcommand(
                    Command::new("add")
                        .about("Add a member")
                        .arg(Arg::new("name").required(true))
                        .arg(group_arg())
                        .arg(
                            Arg::new("bank")
                                .long("bank")
                                .help("Bank transfer info as BIN:ACCOUNT"),
                        )
                        .arg(
                            Arg::new("accountant")
                                .long("accountant")
                                .action(ArgAction::SetTrue)
                                .help("Designate as the group's accountant"),
                        ),
                )
                .subcommand(Command::new("list").about("List members").arg(group_arg()))
                .subcommand(
                    Command::new("set")
                        .about("Update a member")
                        .arg(Arg::new("name").required(true))
                        .arg(group_arg())
                        .arg(Arg::new("rename").long("rename").help("New display name"))
                        .arg(
                            Arg::new("bank")
                                .long("bank")
                                .help("Bank transfer info as BIN:ACCOUNT"),
                        )
                        .arg(
                            Arg::new("accountant")
                                .long("accountant")
                                .action(ArgAction::SetTrue)
                                .help("Designate as the group's accountant"),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a member (blocked while bills reference them)")
                        .arg(Arg::new("name").required(true))
                        .arg(group_arg()),
                ),
        )
        .subcommand(
            Command::new("bill")
                .about("Record and list bills")
                .subcommand(
                    Command::new("add")
                        .about("Record a bill")
                        .arg(Arg::new("name").required(true))
                        .arg(group_arg())
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Total amount"),
                        )
                        .arg(
                            Arg::new("split")
                                .long("split")
                                .default_value("equally")
                                .help("Split strategy: equally|exact|percentage|share"),
                        )
                        .arg(
                            Arg::new("paid-by")
                                .long("paid-by")
                                .required(true)
                                .help("Member who fronted the bill"),
                        )
                        .arg(
                            Arg::new("with")
                                .long("with")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("Participant as NAME or NAME=VALUE (amount, percent, or shares depending on --split)"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List bills").arg(group_arg()),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a bill and its payment entries")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("settle")
                .about("Track who has paid their share")
                .subcommand(
                    Command::new("mark")
                        .about("Mark a member paid on one or more bills")
                        .arg(
                            Arg::new("member")
                                .long("member")
                                .required(true)
                                .help("Member name or id"),
                        )
                        .arg(group_arg())
                        .arg(
                            Arg::new("bills")
                                .required(true)
                                .num_args(1..)
                                .help("Bill ids"),
                        )
                        .arg(
                            Arg::new("strict")
                                .long("strict")
                                .action(ArgAction::SetTrue)
                                .help("Fail instead of skipping an already-settled bill"),
                        ),
                )
                .subcommand(
                    Command::new("status")
                        .about("Per-member settlement state of a bill")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(json_flags(
            Command::new("balance")
                .about("Per-member paid/spent/balance report")
                .arg(group_arg()),
        ))
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("balances")
                        .about("Export the balance report")
                        .arg(group_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("backup")
                        .about("Write a JSON backup of the group and its bills")
                        .arg(group_arg())
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("backup")
                        .about("Restore a JSON backup into a new group")
                        .arg(Arg::new("path").required(true))
                        .arg(
                            Arg::new("name")
                                .long("name")
                                .help("Name for the restored group (defaults to the backed-up name)"),
                        )
                        .arg(Arg::new("id").long("id").help("Explicit id for the restored group")),
                ),
        )
        .subcommand(Command::new("doctor").about("Run ledger integrity checks"))
}
