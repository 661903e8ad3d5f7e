use anyhow::{Result, bail};
use leadboard::cli::{self, Command, QueryArgs};
use leadboard::config::Config;
use leadboard::context::{SharedContext, StandardContext};
use leadboard::converter;
use leadboard::loader::{Loader, ParseOptions, Source};
use leadboard::model::display::RecordDisplay;
use leadboard::source::{DefaultSource, HttpSource};
use leadboard::stats;
use leadboard::store::{LeadStore, SharedStore};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run 'leadboard --help' for usage.");
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => {
            cli::print_help("leadboard");
            Ok(())
        }
        Command::Convert(path) => {
            init_logging(log::LevelFilter::Info);
            convert(&path)
        }
        Command::Query(query) => run_query(query).await,
    }
}

fn init_logging(level: log::LevelFilter) {
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
}

fn convert(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let written = match extension.as_deref() {
        Some("csv") => converter::convert_csv_file_to_json(path)?,
        Some("json") => converter::convert_json_file_to_csv(path)?,
        _ => bail!("Expected a .csv or .json file, got '{}'", path.display()),
    };
    println!("{}", written.display());
    Ok(())
}

fn load_config(ctx: &SharedContext) -> Result<Config> {
    match Config::load(ctx.as_ref()) {
        Ok(config) => Ok(config),
        Err(e) if Config::is_missing_config_error(&e) => Ok(Config::default()),
        Err(e) => Err(e),
    }
}

async fn run_query(query: QueryArgs) -> Result<()> {
    let ctx: SharedContext = Arc::new(StandardContext::new(query.root.clone()));
    let config = load_config(&ctx)?;
    init_logging(config.log_level_filter());
    log::debug!("Config: {}", Config::get_path_string(ctx.as_ref())?);

    let source = match (query.sources.as_slice(), &config.default_source) {
        ([single], _) => Source::Locator(single.clone()),
        ([], Some(default)) => Source::Locator(default.clone()),
        ([], None) => bail!("No source given and no default_source in the config"),
        (many, _) => Source::Locators(many.to_vec()),
    };

    let http = HttpSource::new(Duration::from_secs(config.fetch_timeout_secs));
    let loader = Loader::new(
        Arc::new(DefaultSource::new(http)),
        ParseOptions::from_config(&config),
        config.columns.clone(),
    );

    let store: SharedStore = Arc::new(RwLock::new(LeadStore::with_columns(
        config.columns.clone(),
    )));

    // Fetch without holding the lock; only the swap takes it.
    let outcome = loader.load(&source).await?;
    let mut guard = store.write().await;
    guard.apply_outcome(outcome);
    apply_query_filters(&mut guard, &query, &config);
    guard.apply_filters();
    drop(guard);

    let store = store.read().await;
    print_view(&store, query.limit);
    if query.facets {
        print_facets(&store);
    }
    if query.stats {
        print_stats(&store);
    }
    Ok(())
}

fn apply_query_filters(store: &mut LeadStore, query: &QueryArgs, config: &Config) {
    if let Some(search) = &query.search {
        store.set_search_text(search);
    }
    if query.status.is_some() {
        store.set_filter("status", query.status.as_deref().into());
    }
    if query.user.is_some() {
        store.select_user(query.user.as_deref());
    }
    if query.tag.is_some() {
        store.select_tag(query.tag.as_deref());
    }
    if query.from.is_some() || query.to.is_some() {
        store.set_date_range(query.from.as_deref(), query.to.as_deref());
    } else if let Some(period) = &query.period {
        store.set_date_range_period(period);
    } else if let Some(period) = config.default_period {
        store.set_date_range_period(&period.to_string());
    }
    if query.group.is_some() {
        store.select_group(query.group.as_deref());
    }
    if query.origin.is_some() {
        store.select_origin(query.origin.as_deref());
    }
}

fn print_view(store: &LeadStore, limit: Option<usize>) {
    let view = store.filtered_view();
    let shown = limit.unwrap_or(view.len()).min(view.len());
    for record in view.iter().take(shown) {
        println!("{}", record.to_display_line(store.columns()));
    }
    println!(
        "-- {} of {} records match ({} shown)",
        view.len(),
        store.records().len(),
        shown
    );
}

fn print_list(label: &str, values: &[String]) {
    if values.is_empty() {
        println!("{:<9} -", label);
    } else {
        println!("{:<9} {}", label, values.join(", "));
    }
}

fn print_facets(store: &LeadStore) {
    let facets = store.facets();
    println!();
    print_list("Users:", &facets.users);
    print_list("Statuses:", &facets.statuses);
    print_list("Tags:", &facets.tags);
    print_list("Groups:", &facets.groups);
    print_list("Origins:", &facets.origins);
}

fn print_stats(store: &LeadStore) {
    let summary = store.status_summary();
    println!();
    println!(
        "Total: {}  Open: {}  Won: {}  Lost: {}",
        summary.total, summary.open, summary.won, summary.lost
    );
    for (day, count) in stats::group_by_day(store.filtered_view()) {
        println!("  {}  {}", leadboard::dates::format_date(day), count);
    }
}
