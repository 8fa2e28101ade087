//! `cardportal` - command-line front end for the card portal backend.
//!
//! Every command prints JSON on stdout; logs go to stderr.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, BufReader};

use cardportal_auth::{Action, Module, RoleDraft};
use cardportal_client::api::ListResource;
use cardportal_client::types::{
    City, Company, Country, Department, Designation, Employee, PasswordResetConfirm, PortalUser,
    RoleSummary, State, CARD_UNSORTABLE_COLUMNS,
};
use cardportal_client::{
    ApiClient, ApiError, ClientConfig, ListController, ListEndpoint, Notice, PortalContext, Route,
};
use cardportal_core::{EmployeeId, ListQuery, Pager, RoleId, SortState, Sortable, TableView};

#[derive(Parser)]
#[command(name = "cardportal")]
#[command(about = "Manage digital business cards from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides CARDPORTAL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where the session token is kept (overrides CARDPORTAL_TOKEN_PATH)
    #[arg(long, global = true)]
    token_path: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and load permissions
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "CARDPORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the session and its permissions
    Whoami,

    /// Show the navigation menu the session is entitled to
    Nav,

    /// Card, download and scan totals
    Dashboard,

    /// Fetch one page of a list
    List {
        #[arg(value_enum)]
        resource: ResourceArg,

        /// Zero-based page index
        #[arg(long, default_value = "0")]
        page: u64,

        #[arg(long, default_value = "10")]
        limit: u64,

        /// Server-side search
        #[arg(long, default_value = "")]
        search: String,

        /// Sort the fetched page by this column
        #[arg(long, default_value = "name")]
        sort: String,

        #[arg(long)]
        desc: bool,

        /// Client-side name filter over the fetched page
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// Search interactively: each stdin line is a search, debounced
    Browse {
        #[arg(value_enum)]
        resource: ResourceArg,

        #[arg(long, default_value = "10")]
        limit: u64,
    },

    /// Roles and their module permissions
    Role {
        #[command(subcommand)]
        command: RoleCommand,
    },

    /// Resolve a portal path
    Route { path: String },

    /// Password reset by one-time code
    ResetPassword {
        #[command(subcommand)]
        step: ResetStep,
    },

    /// Card operations
    Card {
        #[command(subcommand)]
        command: CardCommand,
    },
}

#[derive(Subcommand)]
enum RoleCommand {
    /// Modules a role can be granted
    Modules,

    /// A role and its permission grid
    Show { id: RoleId },

    /// Create a role; grants look like `Card=create,update`
    Create {
        #[arg(long)]
        name: String,

        #[arg(long = "grant")]
        grants: Vec<String>,
    },

    /// Change a role's name or grants
    Update {
        id: RoleId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "grant")]
        grants: Vec<String>,

        #[arg(long = "revoke")]
        revokes: Vec<String>,
    },

    Delete { id: RoleId },
}

#[derive(Subcommand)]
enum ResetStep {
    /// Send a one-time code to the address
    Request {
        #[arg(short, long)]
        email: String,
    },

    Verify {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        otp: String,
    },

    Confirm {
        #[arg(short, long)]
        email: String,

        #[arg(long, env = "CARDPORTAL_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, env = "CARDPORTAL_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Scan history of a card
    Scans { id: EmployeeId },

    /// Record a QR code download
    QrDownloaded { id: EmployeeId },

    /// Text the QR code to a phone number
    SendSms { phone: String },

    /// Email the QR code
    SendEmail { email: String },

    /// Bulk-upload template link
    SampleFile,

    Delete { id: EmployeeId },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceArg {
    Cards,
    Companies,
    Departments,
    Designations,
    Countries,
    States,
    Cities,
    Users,
    Roles,
}

impl From<ResourceArg> for ListResource {
    fn from(arg: ResourceArg) -> Self {
        match arg {
            ResourceArg::Cards => ListResource::Cards,
            ResourceArg::Companies => ListResource::Companies,
            ResourceArg::Departments => ListResource::Departments,
            ResourceArg::Designations => ListResource::Designations,
            ResourceArg::Countries => ListResource::Countries,
            ResourceArg::States => ListResource::States,
            ResourceArg::Cities => ListResource::Cities,
            ResourceArg::Users => ListResource::Users,
            ResourceArg::Roles => ListResource::Roles,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        cardportal_observability::init_with_default("debug");
    } else {
        cardportal_observability::init_with_default("warn");
    }

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<ApiError>() {
            Some(api) => {
                tracing::error!(error = %api, "command failed");
                let _ = print(&Notice::from_error(api));
            }
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(path) = &cli.token_path {
        config.token_path = Some(path.clone());
    }
    config
}

async fn run(cli: Cli) -> Result<()> {
    let config = config(&cli);
    let ctx = PortalContext::from_config(&config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let request = cardportal_client::types::LoginRequest::new(email, password);
            let session = ctx.login(&request).await?;
            print(&serde_json::json!({
                "authenticated": session.is_authenticated(),
                "profile": session.profile.as_deref(),
                "navigation": session.navigation(),
            }))
        }
        Commands::Logout => {
            ctx.logout()?;
            print(&Notice::success("Logged out"))
        }
        Commands::Whoami => {
            ctx.require_token()?;
            let session = ctx.refresh().await;
            let entries = session
                .permissions
                .set()
                .map(|set| set.entries().to_vec())
                .unwrap_or_default();
            let offered: serde_json::Map<String, serde_json::Value> = Module::ORDER
                .into_iter()
                .map(|module| {
                    (
                        module.name().to_string(),
                        serde_json::json!(session.offered_actions(module)),
                    )
                })
                .collect();
            print(&serde_json::json!({
                "authenticated": session.is_authenticated(),
                "loading": session.permissions.is_loading(),
                "permissions": entries,
                "offered": offered,
            }))
        }
        Commands::Nav => {
            ctx.require_token()?;
            print(&ctx.refresh().await.navigation())
        }
        Commands::Dashboard => print(&ctx.client().dashboard_counts().await?),
        Commands::List {
            resource,
            page,
            limit,
            search,
            sort,
            desc,
            filter,
        } => {
            let query = ListQuery::for_page(page, limit, search);
            let view = ListView {
                query,
                sort,
                desc,
                filter,
            };
            list(ctx.client(), resource.into(), &view).await
        }
        Commands::Browse { resource, limit } => {
            browse(ctx.client(), resource.into(), limit, config.search_debounce).await
        }
        Commands::Role { command } => role(ctx.client(), command).await,
        Commands::Route { path } => {
            let route = Route::parse(&path);
            print(&serde_json::json!({
                "route": route,
                "path": route.path(),
                "public": route.is_public(),
                "module": route.module(),
            }))
        }
        Commands::ResetPassword { step } => reset_password(ctx.client(), step).await,
        Commands::Card { command } => card(ctx.client(), command).await,
    }
}

struct ListView {
    query: ListQuery,
    sort: String,
    desc: bool,
    filter: String,
}

async fn list(client: &ApiClient, resource: ListResource, view: &ListView) -> Result<()> {
    match resource {
        ListResource::Cards => {
            list_as::<Employee>(client, resource, view, &CARD_UNSORTABLE_COLUMNS).await
        }
        ListResource::Companies => list_as::<Company>(client, resource, view, &[]).await,
        ListResource::Departments => list_as::<Department>(client, resource, view, &[]).await,
        ListResource::Designations => list_as::<Designation>(client, resource, view, &[]).await,
        ListResource::Countries => list_as::<Country>(client, resource, view, &[]).await,
        ListResource::States => list_as::<State>(client, resource, view, &[]).await,
        ListResource::Cities => list_as::<City>(client, resource, view, &[]).await,
        ListResource::Users => list_as::<PortalUser>(client, resource, view, &[]).await,
        ListResource::Roles => list_as::<RoleSummary>(client, resource, view, &[]).await,
    }
}

async fn list_as<T>(
    client: &ApiClient,
    resource: ListResource,
    view: &ListView,
    unsortable: &[&str],
) -> Result<()>
where
    T: DeserializeOwned + Serialize + Sortable,
{
    let page = client.list_page::<T>(resource.path(), &view.query).await?;
    let count = page.count;

    let mut sort = SortState::new(view.sort.clone()).with_unsortable(unsortable.iter().copied());
    if view.desc {
        // A second request on the same column flips it to descending.
        sort.request(&view.sort);
    }
    let table = TableView::build(page.data, &sort, &view.filter);

    let pager = pager_for(&view.query);
    let shown = table.rows.len();
    print(&serde_json::json!({
        "resource": resource.as_str(),
        "page": pager.page(),
        "pages": pager.page_count(count),
        "count": count,
        "empty_rows": pager.empty_rows(shown),
        "not_found": table.not_found,
        "rows": table.rows,
    }))
}

fn pager_for(query: &ListQuery) -> Pager {
    let mut pager = Pager::new(query.limit);
    if query.limit > 0 {
        pager.set_page(query.start / query.limit);
    }
    pager
}

async fn browse(
    client: &ApiClient,
    resource: ListResource,
    limit: u64,
    quiet: Duration,
) -> Result<()> {
    let source = ListEndpoint::<serde_json::Value>::new(client.clone(), resource.path());
    let controller = ListController::new(source, limit, quiet);
    let mut updates = controller.subscribe();

    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.loading || state.pending.is_some() {
                continue;
            }
            let out = match &state.error {
                Some(message) => serde_json::json!({ "search": state.query.search, "error": message }),
                None => serde_json::json!({
                    "search": state.query.search,
                    "count": state.page.count,
                    "rows": state.page.data,
                }),
            };
            if print(&out).is_err() {
                break;
            }
        }
    });

    controller.refresh().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        controller.search(line.trim());
    }

    controller.settle().await;
    // Dropping the controller closes the channel; the printer drains and exits.
    drop(controller);
    printer.await.context("printer task")?;
    Ok(())
}

/// Apply `Module=action,action` grants to a draft.
fn apply_grants(draft: &mut RoleDraft, grants: &[String], value: bool) -> Result<()> {
    for grant in grants {
        let (module, actions) = grant
            .split_once('=')
            .ok_or_else(|| anyhow!("expected MODULE=ACTIONS, got '{grant}'"))?;
        let row = draft
            .position(module.trim())
            .ok_or_else(|| anyhow!("unknown module '{}'", module.trim()))?;
        for action in actions.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            let action: Action = action.parse().map_err(anyhow::Error::msg)?;
            draft.set(row, action, value)?;
        }
    }
    Ok(())
}

async fn role(client: &ApiClient, command: RoleCommand) -> Result<()> {
    match command {
        RoleCommand::Modules => print(&client.modules().await?),
        RoleCommand::Show { id } => {
            let draft = RoleDraft::from_role(client.role(id).await?);
            print(&draft)
        }
        RoleCommand::Create { name, grants } => {
            let mut draft = RoleDraft::for_modules(&client.modules().await?);
            draft.set_name(name);
            apply_grants(&mut draft, &grants, true)?;
            let resp = client.create_role(&draft.payload()?).await?;
            print(&Notice::from_response(&resp, "Role created"))
        }
        RoleCommand::Update {
            id,
            name,
            grants,
            revokes,
        } => {
            let mut draft = RoleDraft::from_role(client.role(id).await?);
            if let Some(name) = name {
                draft.set_name(name);
            }
            apply_grants(&mut draft, &grants, true)?;
            apply_grants(&mut draft, &revokes, false)?;
            let resp = client.update_role(id, &draft.payload()?).await?;
            print(&Notice::from_response(&resp, "Role updated"))
        }
        RoleCommand::Delete { id } => {
            let resp = client.delete_role(id).await?;
            print(&Notice::from_response(&resp, "Role deleted"))
        }
    }
}

async fn reset_password(client: &ApiClient, step: ResetStep) -> Result<()> {
    match step {
        ResetStep::Request { email } => {
            let resp = client.request_password_otp(&email).await?;
            // Any reset token is now in the token store for the next two steps.
            print(&serde_json::json!({
                "notice": Notice::success(resp.message.unwrap_or_else(|| "OTP sent".to_string())),
                "reset_token_stored": resp.token.is_some(),
            }))
        }
        ResetStep::Verify { email, otp } => {
            let resp = client.verify_password_otp(&email, &otp).await?;
            print(&Notice::from_response(&resp, "OTP verified"))
        }
        ResetStep::Confirm {
            email,
            password,
            confirm,
        } => {
            let resp = client
                .confirm_password_reset(&PasswordResetConfirm {
                    email,
                    password,
                    confirm_password: confirm,
                })
                .await?;
            print(&Notice::from_response(&resp, "Password updated"))
        }
    }
}

async fn card(client: &ApiClient, command: CardCommand) -> Result<()> {
    match command {
        CardCommand::Scans { id } => {
            let log = client.scan_log(id).await?;
            let entries: Vec<_> = log
                .device_info
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    serde_json::json!({
                        "sr": entry.sr.unwrap_or(i as u64 + 1),
                        "city": entry.address.city,
                        "ip_address": entry.ip_address,
                        "at": entry.timestamp().map(|t| t.to_rfc3339()),
                        "user_agent": entry.user_agent,
                    })
                })
                .collect();
            print(&serde_json::json!({
                "scan_count": log.scan_count,
                "download_count": log.download_count,
                "scans": entries,
            }))
        }
        CardCommand::QrDownloaded { id } => {
            client.record_qr_download(id).await?;
            print(&Notice::success("QR Code downloaded successfully"))
        }
        CardCommand::SendSms { phone } => {
            let resp = client.send_qr_sms(&phone).await?;
            print(&Notice::from_response(&resp, "QR code sent"))
        }
        CardCommand::SendEmail { email } => {
            let resp = client.send_qr_email(&email).await?;
            print(&Notice::from_response(&resp, "QR code sent"))
        }
        CardCommand::SampleFile => {
            let file = client.sample_file().await?;
            if file.url.trim().is_empty() {
                bail!("backend returned an empty sample file link");
            }
            print(&file)
        }
        CardCommand::Delete { id } => {
            let resp = client.delete_card(id).await?;
            print(&Notice::from_response(&resp, "Card deleted"))
        }
    }
}
