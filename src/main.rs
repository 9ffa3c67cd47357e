use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use filedeck::browser::{FileBrowser, LoadState, OpenAction, PreviewContent, SearchDebouncer};
use filedeck::files::format::{category_label, format_bytes, format_date, truncate_middle};
use filedeck::files::{CategoryFilter, FileId};
use filedeck::identity::{self, UserId, UserIdentity, UserStore};
use filedeck::{Config, FileApi, HttpFileApi};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Browse, search and clean up files stored for a user.
#[derive(Parser, Debug)]
#[command(name = "filedeck", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<String>,

    /// User whose files to manage
    #[arg(long, global = true)]
    user: Option<String>,

    /// Host launch parameters or init data carrying the user
    #[arg(long, global = true, conflicts_with = "user")]
    init_data: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List files page by page
    List {
        #[arg(long)]
        search: Option<String>,
        /// all, audio, media or files
        #[arg(long, default_value = "all")]
        category: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u64,
    },
    /// Delete one or more files
    Rm {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print a file's content as text
    Cat { id: String },
    /// Incremental search: each stdin line is the current search input
    Find,
    /// Print the URL that opens a file
    Open { id: String },
    /// Save a file's inline thumbnail
    Thumb { id: String, out: PathBuf },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "filedeck=debug" } else { "filedeck=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `--init-data` wins and is remembered; then `--user`, the configured user,
/// and finally the user remembered from an earlier run.
fn resolve_user(cli: &Cli, config: &Config, store: Option<&UserStore>) -> Result<UserIdentity> {
    if let Some(raw) = &cli.init_data {
        let init = identity::init_data_from_launch_params(raw).unwrap_or_else(|| raw.clone());
        let user = identity::parse_init_data(&init).context("Init data carries no user")?;
        if user.id.is_none() {
            bail!("Init data user has no id");
        }
        if let Some(store) = store {
            if let Err(err) = store.save(Some(&user)) {
                warn!("Could not remember user: {err:#}");
            }
        }
        return Ok(user);
    }
    if let Some(raw) = cli.user.as_deref().or(config.user_id.as_deref()) {
        let id = UserId::parse(raw).ok_or_else(|| anyhow!("Invalid user id: {raw:?}"))?;
        return Ok(UserIdentity::with_id(id));
    }
    store
        .and_then(UserStore::load)
        .filter(|user| user.id.is_some())
        .ok_or_else(|| {
            anyhow!(
                "No user given; pass --user or --init-data, or set {}",
                filedeck::config::ENV_USER_ID
            )
        })
}

/// File ids typed by the user: digits as numbers, anything else as text.
fn parse_file_id(raw: &str) -> FileId {
    raw.trim()
        .parse::<i64>()
        .map(FileId::Int)
        .unwrap_or_else(|_| FileId::from(raw.trim()))
}

fn ensure_loaded<A: FileApi>(browser: &FileBrowser<A>) -> Result<()> {
    match browser.state() {
        LoadState::Errored(message) => bail!("{message}"),
        _ => Ok(()),
    }
}

fn print_files<A: FileApi>(browser: &FileBrowser<A>) {
    for record in browser.files() {
        let id = record.id().map(|id| id.to_string()).unwrap_or_default();
        println!(
            "{:<32} {:<6} {:>9} {:>7} {:<6} {}",
            truncate_middle(&record.display_name(), 18, 10),
            category_label(record.category().as_deref()),
            format_bytes(record.size()),
            format_date(record.timestamp()),
            record.media_kind(),
            id
        );
    }
    let total = browser
        .total()
        .map_or_else(|| "?".to_string(), |t| t.to_string());
    println!(
        "{} shown, {} total{}",
        browser.files().len(),
        total,
        if browser.has_more() { ", more available" } else { "" }
    );
}

async fn find_record<A: FileApi>(
    browser: &mut FileBrowser<A>,
    id: &FileId,
) -> Result<filedeck::FileRecord> {
    browser.load_until(|files| files.contains(id)).await?;
    ensure_loaded(browser)?;
    browser
        .files()
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("No file with id {id}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let store = UserStore::at_default_path();
    let user = resolve_user(&cli, &config, store.as_ref())?;
    debug!(base_url = %config.api_base_url, user = %user.handle(), "starting");

    let api = HttpFileApi::new(&config.api_base_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let mut browser = FileBrowser::new(api, config.browser_settings());

    match cli.command {
        Command::List { search, category, pages } => {
            let category = CategoryFilter::parse(&category)
                .ok_or_else(|| anyhow!("Unknown category {category:?}"))?;
            browser.set_category(category).await;
            browser.apply_search(search.as_deref().unwrap_or_default()).await;
            browser.set_user(Some(user)).await;
            while browser.page() < pages && browser.load_more().await.is_some() {}
            ensure_loaded(&browser)?;

            print_files(&browser);
        }
        Command::Rm { ids } => {
            let ids: Vec<FileId> = ids.iter().map(|raw| parse_file_id(raw)).collect();
            browser.set_user(Some(user)).await;
            if let [id] = ids.as_slice() {
                browser.delete(id).await?;
                println!("Removed {id}");
            } else {
                browser
                    .load_until(|files| ids.iter().all(|id| files.contains(id)))
                    .await?;
                ensure_loaded(&browser)?;
                browser.select_only(&ids)?;
                let removed = browser.bulk_delete().await?;
                println!("Removed {removed} file(s)");
            }
        }
        Command::Find => {
            browser.set_user(Some(user)).await;
            ensure_loaded(&browser)?;
            print_files(&browser);
            let (mut debouncer, mut settled) = SearchDebouncer::new(config.search_debounce());
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => match line.context("Failed to read search input")? {
                        Some(term) => debouncer.submit(term.trim()),
                        None => {
                            let last = if debouncer.is_pending() {
                                settled.recv().await
                            } else {
                                settled.try_recv().ok()
                            };
                            if let Some(term) = last {
                                browser.apply_search(&term).await;
                                ensure_loaded(&browser)?;
                                print_files(&browser);
                            }
                            break;
                        }
                    },
                    Some(term) = settled.recv() => {
                        browser.apply_search(&term).await;
                        ensure_loaded(&browser)?;
                        print_files(&browser);
                    }
                }
            }
        }
        Command::Cat { id } => {
            let id = parse_file_id(&id);
            browser.set_user(Some(user)).await;
            let record = find_record(&mut browser, &id).await?;
            match browser.open(&record)? {
                OpenAction::Preview(Some(ticket)) => {
                    browser.load_preview_text(ticket).await?;
                    let preview = browser
                        .preview()
                        .ok_or_else(|| anyhow!("Preview closed"))?;
                    match &preview.content {
                        PreviewContent::Text(text) => print!("{text}"),
                        PreviewContent::Failed(message) => bail!("{message}"),
                        _ => bail!("Preview did not load"),
                    }
                }
                _ => bail!("{} is a {} file, not text", record.display_name(), record.media_kind()),
            }
        }
        Command::Open { id } => {
            let id = parse_file_id(&id);
            browser.set_user(Some(user)).await;
            let record = find_record(&mut browser, &id).await?;
            match browser.open(&record)? {
                OpenAction::Download(url) => println!("{url}"),
                OpenAction::Preview(_) => {
                    let preview = browser
                        .preview()
                        .ok_or_else(|| anyhow!("Preview closed"))?;
                    let action = preview.kind.primary_action().label();
                    println!("{} ({action}): {}", preview.name, preview.url);
                }
            }
        }
        Command::Thumb { id, out } => {
            let id = parse_file_id(&id);
            browser.set_user(Some(user)).await;
            let record = find_record(&mut browser, &id).await?;
            let thumbnail = record
                .thumbnail()
                .ok_or_else(|| anyhow!("{} has no thumbnail", record.display_name()))?;
            let bytes = thumbnail.decode()?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), out.display());
        }
    }
    Ok(())
}
