use std::env;
use std::fs;
use std::io::{self as stdio, IsTerminal};

use chrono::Local;
use serde::Serialize;
use strsim::levenshtein;
use uuid::Uuid;

use crate::api::{InMemoryDirectory, Submitter};
use crate::config::{Config, ConfigManager, CONFIG_KEYS};
use crate::display::avatar::{avatar_colors, initials, AvatarKey};
use crate::display::import::import_products;
use crate::display::paging::{paginate, sort_by_key, SortDirection};
use crate::display::phone::format_phone;
use crate::display::status::{display_status, status_classes, AccountStatus};
use crate::forms::FormFlow;
use crate::portal::{ClinicOrderForm, CustomerForm, DoctorForm};
use crate::session::{FileTokenStore, Portal, Role, SessionContext, SessionUser};
use crate::ui::layout::{layout_for, ModalLayout};
use crate::utils::build_info;

use super::output::{self, CliNotifier, OutputPreferences};
use super::wizard::{run_wizard, use_scripted_input, DialoguerInteraction, FormResult, ScriptedInteraction};
use super::CliError;

const COLUMNS_ENV: &str = "PORTAL_CORE_COLUMNS";
const MAX_MODAL_WIDTH: u16 = 72;

struct CommandInfo {
    name: &'static str,
    usage: &'static str,
    summary: &'static str,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "add-customer",
        usage: "add-customer [--fail <message>]",
        summary: "Run the three-step Add Customer wizard",
    },
    CommandInfo {
        name: "add-doctor",
        usage: "add-doctor",
        summary: "Run the Add Doctor form",
    },
    CommandInfo {
        name: "add-order",
        usage: "add-order [--catalog <csv>]",
        summary: "Place a clinic order",
    },
    CommandInfo {
        name: "import-products",
        usage: "import-products <csv>",
        summary: "Validate a product CSV and report rejected rows",
    },
    CommandInfo {
        name: "products",
        usage: "products [page] [--sort name|price|stock] [--desc]",
        summary: "List the demo catalog one page at a time",
    },
    CommandInfo {
        name: "format-phone",
        usage: "format-phone <digits>",
        summary: "Format a US phone number",
    },
    CommandInfo {
        name: "avatar",
        usage: "avatar <id|name>",
        summary: "Show the avatar colours for an id or name",
    },
    CommandInfo {
        name: "status",
        usage: "status <pending|approved|rejected|suspended> <active:true|false>",
        summary: "Show the badge label and classes for an account",
    },
    CommandInfo {
        name: "login",
        usage: "login <email> <admin|doctor|customer|manager>",
        summary: "Store a session for the given user",
    },
    CommandInfo {
        name: "logout",
        usage: "logout",
        summary: "Clear the stored session",
    },
    CommandInfo {
        name: "whoami",
        usage: "whoami",
        summary: "Show the signed-in user",
    },
    CommandInfo {
        name: "portal",
        usage: "portal <admin|doctor|customer|manager>",
        summary: "Check access to a portal",
    },
    CommandInfo {
        name: "config",
        usage: "config <show|path|get <key>|set <key> <value>>",
        summary: "Inspect or change settings",
    },
    CommandInfo {
        name: "version",
        usage: "version",
        summary: "Print build metadata",
    },
    CommandInfo {
        name: "help",
        usage: "help",
        summary: "List commands",
    },
];

struct CliContext {
    manager: ConfigManager,
    config: Config,
}

impl CliContext {
    fn layout(&self) -> Box<dyn ModalLayout> {
        let columns = env::var(COLUMNS_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<u16>().ok())
            .or_else(|| crossterm::terminal::size().ok().map(|(width, _)| width))
            .unwrap_or(self.config.mobile_breakpoint);
        let class = self.config.viewport(columns);
        let width = usize::from(columns.min(MAX_MODAL_WIDTH).saturating_sub(4).max(24));
        layout_for(class, width, !output::preferences().plain)
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    run(&args)
}

pub fn run(args: &[String]) -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let plain = config.plain_output || !stdio::stdout().is_terminal();
    output::set_preferences(OutputPreferences { plain, quiet: false });
    if plain {
        colored::control::set_override(false);
    }
    let mut context = CliContext { manager, config };

    let Some((command, rest)) = args.split_first() else {
        print_help();
        return Ok(());
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    match command.to_ascii_lowercase().as_str() {
        "add-customer" => add_customer(&context, &rest),
        "add-doctor" => add_doctor(&context),
        "add-order" => add_order(&context, &rest),
        "import-products" => import_command(&rest),
        "products" => products_command(&context, &rest),
        "format-phone" => {
            let raw = require_arg(&rest, 0, "format-phone <digits>")?;
            println!("{}", format_phone(raw));
            Ok(())
        }
        "avatar" => avatar_command(&rest),
        "status" => status_command(&rest),
        "login" => login_command(&rest),
        "logout" => logout_command(),
        "whoami" => whoami_command(),
        "portal" => portal_command(&rest),
        "config" => config_command(&mut context, &rest),
        "version" | "--version" | "-V" => {
            output::lines(&build_info::current().lines());
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => Err(unknown_command(other)),
    }
}

fn print_help() {
    output::section("portal_core_cli");
    let width = COMMANDS.iter().map(|command| command.usage.len()).max().unwrap_or(0);
    for command in COMMANDS {
        println!("  {:width$}  {}", command.usage, command.summary, width = width);
    }
}

fn unknown_command(input: &str) -> CliError {
    let suggestion = COMMANDS
        .iter()
        .map(|command| (levenshtein(command.name, input), command.name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3);
    match suggestion {
        Some((_, best)) => CliError::Usage(format!(
            "Unknown command `{}`. Did you mean `{}`?",
            input, best
        )),
        None => CliError::Usage(format!(
            "Unknown command `{}`. Run `help` to list commands.",
            input
        )),
    }
}

fn require_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CliError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CliError::Usage(format!("Usage: {}", usage)))
}

/// Value following `flag`, if the flag is present.
fn flag_value<'a>(args: &[&'a str], flag: &str) -> Result<Option<&'a str>, CliError> {
    match args.iter().position(|arg| *arg == flag) {
        Some(index) => args
            .get(index + 1)
            .copied()
            .map(Some)
            .ok_or_else(|| CliError::Usage(format!("{} expects a value", flag))),
        None => Ok(None),
    }
}

fn drive<F, S>(context: &CliContext, flow: F, submitter: &mut S) -> Result<FormResult<S::Entity>, CliError>
where
    F: FormFlow,
    S: Submitter<F::Draft>,
{
    let layout = context.layout();
    let mut notifier = CliNotifier;
    if use_scripted_input() {
        let stdin = stdio::stdin();
        let mut interaction = ScriptedInteraction::new(stdin.lock());
        run_wizard(flow, submitter, &mut notifier, &mut interaction, layout.as_ref())
    } else {
        let mut interaction = DialoguerInteraction::new();
        run_wizard(flow, submitter, &mut notifier, &mut interaction, layout.as_ref())
    }
}

fn print_result<T: Serialize>(result: FormResult<T>) -> Result<(), CliError> {
    match result {
        FormResult::Completed(entity) => println!("{}", serde_json::to_string_pretty(&entity)?),
        FormResult::Cancelled => output::warning("Cancelled, nothing was saved."),
    }
    Ok(())
}

fn add_customer(context: &CliContext, args: &[&str]) -> Result<(), CliError> {
    let mut directory = InMemoryDirectory::demo();
    if let Some(message) = flag_value(args, "--fail")? {
        directory.fail_next(message);
    }
    let flow = CustomerForm::new(Local::now().date_naive());
    let result = drive(context, flow, &mut directory)?;
    print_result(result)
}

fn add_doctor(context: &CliContext) -> Result<(), CliError> {
    let mut directory = InMemoryDirectory::demo();
    let result = drive(context, DoctorForm, &mut directory)?;
    print_result(result)
}

fn add_order(context: &CliContext, args: &[&str]) -> Result<(), CliError> {
    let mut directory = InMemoryDirectory::demo();
    if let Some(path) = flag_value(args, "--catalog")? {
        let report = import_products(&fs::read_to_string(path)?);
        for line in report.error_lines() {
            output::warning(line);
        }
        let loaded = directory.load_products(&report);
        output::info(format!("Loaded {} products from {}", loaded, path));
    }
    let flow = ClinicOrderForm::new(
        directory.clinics().to_vec(),
        directory.catalog().to_vec(),
        Local::now().date_naive(),
    );
    let result = drive(context, flow, &mut directory)?;
    print_result(result)
}

fn import_command(args: &[&str]) -> Result<(), CliError> {
    let path = require_arg(args, 0, "import-products <csv>")?;
    let report = import_products(&fs::read_to_string(path)?);
    for line in report.error_lines() {
        output::warning(line);
    }
    if report.is_clean() {
        output::success(report.summary());
    } else {
        output::info(report.summary());
    }
    Ok(())
}

fn products_command(context: &CliContext, args: &[&str]) -> Result<(), CliError> {
    let page = match args.first().filter(|arg| !arg.starts_with("--")) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| CliError::Usage(format!("page must be a number, got `{}`", raw)))?,
        None => 1,
    };
    let direction = if args.contains(&"--desc") {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let mut products = InMemoryDirectory::demo().catalog().to_vec();
    match flag_value(args, "--sort")?.unwrap_or("name") {
        "name" => sort_by_key(&mut products, direction, |p| p.name.to_ascii_lowercase()),
        "price" => sort_by_key(&mut products, direction, |p| p.unit_price_cents),
        "stock" => sort_by_key(&mut products, direction, |p| p.stock),
        other => {
            return Err(CliError::Usage(format!(
                "cannot sort by `{}` (use name, price or stock)",
                other
            )))
        }
    }
    let (rows, info) = paginate(&products, page, context.config.page_size);
    for product in rows {
        println!(
            "{:<8} {:<20} {:>9} {:>5}",
            product.sku,
            product.name,
            product.price_label(),
            product.stock
        );
    }
    println!("{} (page {} of {})", info.summary(), info.page, info.total_pages);
    Ok(())
}

fn avatar_command(args: &[&str]) -> Result<(), CliError> {
    let raw = require_arg(args, 0, "avatar <id|name>")?;
    let key = AvatarKey::parse(raw);
    let colors = avatar_colors(key);
    if let AvatarKey::Name(name) = key {
        println!("initials: {}", initials(name));
    }
    println!("background: {}", colors.background);
    println!("foreground: {}", colors.foreground);
    Ok(())
}

fn status_command(args: &[&str]) -> Result<(), CliError> {
    let usage = "status <pending|approved|rejected|suspended> <true|false>";
    let status = require_arg(args, 0, usage)?
        .parse::<AccountStatus>()
        .map_err(CliError::Usage)?;
    let active = match require_arg(args, 1, usage)?.to_ascii_lowercase().as_str() {
        "true" | "yes" | "active" => true,
        "false" | "no" | "inactive" => false,
        other => return Err(CliError::Usage(format!("expected true or false, got `{}`", other))),
    };
    let label = display_status(status, active);
    let tone = status_classes(status, active);
    println!("{} [{}]", label, tone.classes());
    Ok(())
}

fn parse_role(raw: &str) -> Result<Role, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "doctor" => Ok(Role::Doctor),
        "customer" => Ok(Role::Customer),
        "manager" => Ok(Role::Manager),
        other => Err(CliError::Usage(format!(
            "unknown role `{}` (use admin, doctor, customer or manager)",
            other
        ))),
    }
}

fn session() -> Result<SessionContext<FileTokenStore>, CliError> {
    let mut session = SessionContext::new(FileTokenStore::new());
    session.initialize_auth()?;
    Ok(session)
}

fn login_command(args: &[&str]) -> Result<(), CliError> {
    let usage = "login <email> <admin|doctor|customer|manager>";
    let email = require_arg(args, 0, usage)?;
    let role = parse_role(require_arg(args, 1, usage)?)?;
    let name = email.split('@').next().unwrap_or(email).to_string();
    let user = SessionUser {
        id: Uuid::new_v4(),
        name,
        email: email.to_ascii_lowercase(),
        role,
    };
    let mut session = SessionContext::new(FileTokenStore::new());
    let token = Uuid::new_v4().simple().to_string();
    let user = session.login(&token, user)?;
    output::success(format!("Signed in as {} ({})", user.email, user.role));
    Ok(())
}

fn logout_command() -> Result<(), CliError> {
    let mut session = session()?;
    session.logout()?;
    output::success("Signed out");
    Ok(())
}

fn whoami_command() -> Result<(), CliError> {
    let session = session()?;
    match session.current_user() {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn portal_command(args: &[&str]) -> Result<(), CliError> {
    let usage = "portal <admin|doctor|customer|manager>";
    let portal = match parse_role(require_arg(args, 0, usage)?)? {
        Role::Admin => Portal::Admin,
        Role::Doctor => Portal::Doctor,
        Role::Customer => Portal::Customer,
        Role::Manager => Portal::Manager,
    };
    let session = session()?;
    let user = session.require_portal(portal)?;
    output::success(format!("{} can open the {} portal", user.email, portal));
    Ok(())
}

fn config_command(context: &mut CliContext, args: &[&str]) -> Result<(), CliError> {
    match args.first().copied().unwrap_or("show") {
        "show" => {
            println!("{}", serde_json::to_string_pretty(&context.config)?);
            Ok(())
        }
        "path" => {
            println!("{}", context.manager.path().display());
            Ok(())
        }
        "get" => {
            let key = require_arg(args, 1, "config get <key>")?;
            println!("{}", context.config.get(key)?);
            Ok(())
        }
        "set" => {
            let usage = "config set <key> <value>";
            let key = require_arg(args, 1, usage)?;
            let value = require_arg(args, 2, usage)?;
            context.config.set(key, value)?;
            context.manager.save(&context.config)?;
            output::success(format!("{} = {}", key, context.config.get(key)?));
            Ok(())
        }
        other => Err(CliError::Usage(format!(
            "unknown config action `{}` (use show, path, get or set; keys: {})",
            other,
            CONFIG_KEYS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_command_names() {
        let err = unknown_command("add-custmer");
        assert_eq!(
            err.to_string(),
            "Unknown command `add-custmer`. Did you mean `add-customer`?"
        );
        let err = unknown_command("zzzzzzzzzz");
        assert!(err.to_string().contains("Run `help`"));
    }

    #[test]
    fn flag_values_require_an_argument() {
        assert_eq!(flag_value(&["--fail", "boom"], "--fail").unwrap(), Some("boom"));
        assert_eq!(flag_value(&["x"], "--fail").unwrap(), None);
        assert!(flag_value(&["--fail"], "--fail").is_err());
    }
}
