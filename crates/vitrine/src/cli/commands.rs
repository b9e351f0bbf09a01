use super::render;
use super::setup::{
    AttributeCommands, CategoryCommands, Cli, Commands, ProductArgs, SubcategoryCommands,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vitrineapp::api::CatalogApi;
use vitrineapp::config::VitrineConfig;
use vitrineapp::filter::{FilterAction, FilterState};
use vitrineapp::ids::parse_record_uuid;
use vitrineapp::store::fs::FileStore;

struct AppContext {
    api: CatalogApi<FileStore>,
    json: bool,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = VitrineConfig::load()?;
    init_logging(cli.verbose, &config);

    let data_file = match &cli.data_file {
        Some(path) => path.clone(),
        None => config.data_file()?,
    };
    debug!(path = %data_file.display(), "using catalog file");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start the async runtime")?;

    let ctx = init_context(data_file, &config, cli.json);
    runtime.block_on(dispatch(&ctx, cli.command))
}

/// `-v` wins over `RUST_LOG`, which wins over the configured filter.
fn init_logging(verbose: bool, config: &VitrineConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    // A second init (tests driving `run` twice) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(data_file: PathBuf, config: &VitrineConfig, json: bool) -> AppContext {
    let api = CatalogApi::new(FileStore::new(data_file), Arc::new(render::ConsoleNotifier))
        .with_refresh_interval(config.refresh_interval());
    AppContext { api, json }
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Tree => handle_tree(ctx).await,
        Commands::Category(cmd) => {
            load_tree(ctx).await?;
            let outcome = match cmd {
                CategoryCommands::Add { name, slug } => ctx.api.add_category(&name, &slug).await,
                CategoryCommands::Rm { id } => ctx.api.remove_category(&id).await,
            };
            Ok(exit_code(outcome))
        }
        Commands::Subcategory(cmd) => {
            load_tree(ctx).await?;
            let outcome = match cmd {
                SubcategoryCommands::Add {
                    category_id,
                    name,
                    kind,
                } => ctx.api.add_subcategory(&category_id, &name, &kind).await,
                SubcategoryCommands::Rm { category_id, id } => {
                    ctx.api.remove_subcategory(&category_id, &id).await
                }
            };
            Ok(exit_code(outcome))
        }
        Commands::Attribute(cmd) => {
            load_tree(ctx).await?;
            let outcome = match cmd {
                AttributeCommands::Add {
                    category_id,
                    subcategory_id,
                    name,
                } => {
                    ctx.api
                        .add_attribute(&category_id, &subcategory_id, &name)
                        .await
                }
                AttributeCommands::Rm {
                    category_id,
                    subcategory_id,
                    id,
                } => {
                    ctx.api
                        .remove_attribute(&category_id, &subcategory_id, &id)
                        .await
                }
                AttributeCommands::Rename {
                    subcategory_id,
                    id,
                    new_name,
                } => {
                    ctx.api
                        .rename_attribute(&subcategory_id, &id, &new_name)
                        .await
                }
            };
            Ok(exit_code(outcome))
        }
        Commands::Products(args) => handle_products(ctx, args).await,
    }
}

/// Mutations check ids and names against the loaded tree, so load it first.
async fn load_tree(ctx: &AppContext) -> Result<()> {
    ctx.api
        .refresh(false)
        .await
        .context("Failed to load the catalog")?;
    Ok(())
}

/// Failed mutations were already reported through the notifier.
fn exit_code(outcome: vitrineapp::error::Result<()>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(kind = e.kind(), "mutation failed");
            ExitCode::FAILURE
        }
    }
}

async fn handle_tree(ctx: &AppContext) -> Result<ExitCode> {
    let overview = ctx
        .api
        .overview()
        .await
        .context("Failed to load the catalog")?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        print!("{}", render::render_tree(&overview));
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_products(ctx: &AppContext, args: ProductArgs) -> Result<ExitCode> {
    let state = filter_state(&args)?;
    let page = if args.server {
        let mut view = ctx.api.server_view(state.clone());
        view.load().await?.clone()
    } else {
        ctx.api.list_products(&state).await?
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", render::render_products(&page, &state));
    }
    Ok(ExitCode::SUCCESS)
}

fn filter_state(args: &ProductArgs) -> Result<FilterState> {
    let mut state = FilterState::default();
    if let Some(search) = &args.search {
        state = state.apply(FilterAction::Search(search.clone()));
    }
    if let Some(category) = &args.category {
        let category = parse_record_uuid("category", category)?;
        state = state.apply(FilterAction::SelectCategory(Some(category)));
    }
    if !args.subcategories.is_empty() {
        state = state.apply(FilterAction::subcategories(args.subcategories.iter().cloned())?);
    }
    if !args.attributes.is_empty() {
        state = state.apply(FilterAction::attributes(args.attributes.iter().cloned())?);
    }
    if let Some(status) = args.status {
        state = state.apply(FilterAction::SetStatus(Some(status.into())));
    }
    state = state.apply(FilterAction::Sort(args.sort.into()));
    // Every other action resets the page, so this one goes last.
    Ok(state.apply(FilterAction::GoToPage(args.page)))
}
