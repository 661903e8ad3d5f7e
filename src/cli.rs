// File: ./src/cli.rs
//! Command-line parsing and help text for the `leadboard` binary.

use anyhow::{Result, anyhow, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    pub root: Option<PathBuf>,
    /// Paths or URLs tried in order; falls back to `default_source` from the config.
    pub sources: Vec<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub user: Option<String>,
    pub tag: Option<String>,
    pub period: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub group: Option<String>,
    pub origin: Option<String>,
    pub facets: bool,
    pub stats: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Convert(PathBuf),
    Query(QueryArgs),
}

fn value_for(flag: &str, iter: &mut std::slice::Iter<'_, String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

/// `args` excludes the binary name.
pub fn parse_args(args: &[String]) -> Result<Command> {
    match args.first().map(String::as_str) {
        Some("--help" | "-h" | "help") => return Ok(Command::Help),
        Some("convert") => {
            let Some(path) = args.get(1) else {
                bail!("convert needs a .csv or .json file");
            };
            return Ok(Command::Convert(PathBuf::from(path)));
        }
        _ => {}
    }

    let mut query = QueryArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-r" | "--root" => query.root = Some(PathBuf::from(value_for(arg, &mut iter)?)),
            "-s" | "--search" => query.search = Some(value_for(arg, &mut iter)?),
            "--status" => query.status = Some(value_for(arg, &mut iter)?),
            "-u" | "--user" => query.user = Some(value_for(arg, &mut iter)?),
            "-t" | "--tag" => query.tag = Some(value_for(arg, &mut iter)?),
            "-p" | "--period" => query.period = Some(value_for(arg, &mut iter)?),
            "--from" => query.from = Some(value_for(arg, &mut iter)?),
            "--to" => query.to = Some(value_for(arg, &mut iter)?),
            "-g" | "--group" => query.group = Some(value_for(arg, &mut iter)?),
            "-o" | "--origin" => query.origin = Some(value_for(arg, &mut iter)?),
            "--facets" => query.facets = true,
            "--stats" => query.stats = true,
            "-n" | "--limit" => {
                let raw = value_for(arg, &mut iter)?;
                let limit = raw
                    .parse()
                    .map_err(|_| anyhow!("Invalid --limit '{}'", raw))?;
                query.limit = Some(limit);
            }
            flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
            positional => query.sources.push(positional.to_string()),
        }
    }
    Ok(Command::Query(query))
}

pub fn print_help(binary_name: &str) {
    println!(
        "Leadboard v{} - Filter and summarize CRM lead exports",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [<file.csv | https://...>...]", binary_name);
    println!("    {} convert <file.csv | file.json>", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    <source>...           One or more candidates; the first that loads as CSV is used.");
    println!("    -r, --root <path>     Use a different directory for config.");
    println!("    -s, --search <text>   Case-insensitive match on name, email, phone, origin, group, status.");
    println!("        --status <s>      Exact status (e.g. Aberto, Ganho, Perdido).");
    println!("    -u, --user <name>     Exact owner.");
    println!("    -t, --tag <tag>       Records carrying this tag.");
    println!("    -p, --period <name>   today, yesterday, last7days, thisWeek, lastWeek,");
    println!("                          thisMonth, lastMonth, thisYear.");
    println!("        --from <date>     Start of a custom range (dd/mm/yyyy or ISO).");
    println!("        --to <date>       End of a custom range.");
    println!("    -g, --group <group>   Origin group.");
    println!("    -o, --origin <name>   Origin.");
    println!("    -n, --limit <n>       Print at most n records.");
    println!("        --facets          List users, statuses, tags, groups and origins.");
    println!("        --stats           Print open / won / lost counts and leads per day.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("CONVERT COMMAND:");
    println!(
        "    {} convert leads.csv     Writes leads.json next to the input",
        binary_name
    );
    println!(
        "    {} convert leads.json    Writes leads.csv next to the input",
        binary_name
    );
    println!();
    println!("EXAMPLES:");
    println!("    {} leads.csv --status Ganho --period lastMonth", binary_name);
    println!("    {} leads.csv --group Online --facets", binary_name);
    println!("    {} --from 01/03/2024 --to 15/03/2024 --stats", binary_name);
}
