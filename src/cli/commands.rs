use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{
    context::{CommandError, CommandResult, ShellContext},
    output,
    registry::{CommandEntry, CommandRegistry},
};
use crate::{
    currency::{format_money, CurrencyCode},
    points::{parse_date, PointsAccount},
    series::{CpiInflation, Inflation, MoneyAmount, YearMonth},
    storage::{self, StorageBackend},
    utils::build_info,
};

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "help",
        "List commands or show usage for one",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "new-account",
        "Start a new, empty points account",
        "new-account <name>",
        cmd_new_account,
    ));
    registry.register(CommandEntry::new(
        "add-points",
        "Credit points valid from one date until another",
        "add-points <from> <to> <points>",
        cmd_add_points,
    ));
    registry.register(CommandEntry::new(
        "use-points",
        "Redeem points, oldest credits first",
        "use-points <date> <points>",
        cmd_use_points,
    ));
    registry.register(CommandEntry::new(
        "balance",
        "Show the balance on a date",
        "balance <date>",
        cmd_balance,
    ));
    registry.register(CommandEntry::new(
        "movements",
        "List every credit and debit",
        "movements",
        cmd_movements,
    ));
    registry.register(CommandEntry::new(
        "available",
        "Show what is left of each credit on a date",
        "available <date>",
        cmd_available,
    ));
    registry.register(CommandEntry::new(
        "expiring",
        "Show when the points available on a date lapse",
        "expiring <date>",
        cmd_expiring,
    ));
    registry.register(CommandEntry::new(
        "save",
        "Save the account by name or to a JSON file",
        "save [name|path.json]",
        cmd_save,
    ));
    registry.register(CommandEntry::new(
        "load",
        "Load an account by name or from a JSON file",
        "load <name|path.json>",
        cmd_load,
    ));
    registry.register(CommandEntry::new(
        "accounts",
        "List saved accounts",
        "accounts",
        cmd_accounts,
    ));
    registry.register(CommandEntry::new(
        "adjust",
        "Adjust an amount for inflation using a CPI series file",
        "adjust <cpi.json> <amount> <YYYY-MM> <YYYY-MM>",
        cmd_adjust,
    ));
    registry.register(CommandEntry::new(
        "config",
        "Show settings or change one",
        "config [locale|date_format <value>]",
        cmd_config,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new(
        "exit",
        "Leave the shell",
        "exit",
        cmd_exit,
    ));
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context.registry.get(&name.to_lowercase()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("unknown command `{}`", name))
        })?;
        output::info(format!("{} - {}", entry.usage, entry.description));
        return Ok(());
    }
    output::section("Commands");
    for entry in context.registry.list() {
        output::line(format!("{:<12} {}", entry.name, entry.description));
    }
    Ok(())
}

fn cmd_new_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require(args, 0, "new-account <name>")?;
    context.account = PointsAccount::new(name);
    output::success(format!("New account `{}` created", name));
    Ok(())
}

fn cmd_add_points(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add-points <from> <to> <points>";
    let from = date_arg(require(args, 0, usage)?)?;
    let to = date_arg(require(args, 1, usage)?)?;
    let points = points_arg(require(args, 2, usage)?)?;
    let balance = context.account.add_points(from, to, points)?;
    output::success(format!(
        "Added {} points; balance on {}: {}",
        points,
        context.format_date(from),
        balance
    ));
    Ok(())
}

fn cmd_use_points(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "use-points <date> <points>";
    let moment = date_arg(require(args, 0, usage)?)?;
    let points = points_arg(require(args, 1, usage)?)?;
    let balance = context.account.use_points(moment, points)?;
    output::success(format!(
        "Used {} points; balance on {}: {}",
        points,
        context.format_date(moment),
        balance
    ));
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let moment = date_arg(require(args, 0, "balance <date>")?)?;
    output::info(format!(
        "Balance on {}: {}",
        context.format_date(moment),
        context.account.balance(moment)
    ));
    Ok(())
}

fn cmd_movements(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Movements of {}", context.account.name));
    if context.account.movements().is_empty() {
        output::info("No movements yet.");
        return Ok(());
    }
    for movement in context.account.movements() {
        let kind = if movement.is_credit() { "credit" } else { "debit" };
        output::line(format!(
            "{:<6} {:>8}  {} -> {}",
            kind,
            movement.amount(),
            context.format_date(movement.from()),
            context.format_date(movement.to())
        ));
    }
    Ok(())
}

fn cmd_available(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let moment = date_arg(require(args, 0, "available <date>")?)?;
    let credits = context.account.available_credits(moment)?;
    output::section(format!("Credits on {}", context.format_date(moment)));
    if credits.is_empty() {
        output::info("No current credits.");
    }
    for credit in credits {
        output::line(format!(
            "earned {}  expires {}  {}/{} left",
            context.format_date(credit.earned_on),
            context.format_date(credit.expires_on),
            credit.remaining,
            credit.original
        ));
    }
    Ok(())
}

fn cmd_expiring(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let moment = date_arg(require(args, 0, "expiring <date>")?)?;
    let schedule = context.account.expiry_schedule(moment)?;
    if schedule.is_empty() {
        output::info("Nothing left to expire.");
    }
    for (date, points) in schedule {
        output::line(format!("{}: {} points", context.format_date(date), points));
    }
    Ok(())
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(target) if looks_like_path(target) => {
            let path = PathBuf::from(target);
            storage::save_account_to_path(&context.account, &path)?;
            output::success(format!("Saved account to {}", path.display()));
        }
        other => {
            let name = other.map(|s| s.to_string()).unwrap_or_else(|| context.account.name.clone());
            context.storage.save(&context.account, &name)?;
            context.config.last_opened_account = Some(name.clone());
            context.save_config()?;
            output::success(format!("Saved account `{}`", name));
        }
    }
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = require(args, 0, "load <name|path.json>")?;
    if looks_like_path(target) {
        context.account = storage::load_account_from_path(Path::new(target))?;
    } else {
        context.account = context.storage.load(target)?;
        context.config.last_opened_account = Some(target.to_string());
        context.save_config()?;
    }
    output::success(format!(
        "Loaded account `{}` with {} movements",
        context.account.name,
        context.account.movements().len()
    ));
    Ok(())
}

fn cmd_accounts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let names = context.storage.list()?;
    if names.is_empty() {
        output::info("No saved accounts.");
    }
    for name in names {
        output::line(name);
    }
    Ok(())
}

fn cmd_adjust(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "adjust <cpi.json> <amount> <YYYY-MM> <YYYY-MM>";
    let file = require(args, 0, usage)?;
    let raw_amount = require(args, 1, usage)?;
    let amount: f64 = raw_amount.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a number", raw_amount))
    })?;
    let from = YearMonth::parse(require(args, 2, usage)?)?;
    let to = YearMonth::parse(require(args, 3, usage)?)?;

    let series = storage::json_backend::read_series_file(Path::new(file))?;
    let currency = CurrencyCode::new(series.currency.as_str());
    let inflation = CpiInflation::new(series.into_index_series()?, currency.clone());
    let adjusted = inflation.adjust(&MoneyAmount::new(amount, currency.clone()), from, to)?;

    let locale = context.config.locale.as_str();
    output::info(format!(
        "{} in {} is worth {} in {}",
        format_money(amount, &currency, locale),
        from,
        format_money(adjusted.amount, &currency, locale),
        to
    ));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            output::line(format!("locale       {}", context.config.locale));
            output::line(format!("date_format  {}", context.config.date_format));
        }
        [key, value] => {
            context.config.set(key, value)?;
            context.save_config()?;
            output::success(format!("Set {} to {}", key, value));
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: config [locale|date_format <value>]".into(),
            ))
        }
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(build_info::current().summary());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn require<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

fn date_arg(raw: &str) -> Result<NaiveDate, CommandError> {
    parse_date(raw).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use DD/MM/YYYY)", raw))
    })
}

fn points_arg(raw: &str) -> Result<i64, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a whole number", raw)))
}

fn looks_like_path(target: &str) -> bool {
    target.ends_with(".json") || target.contains(std::path::MAIN_SEPARATOR) || target.contains('/')
}
