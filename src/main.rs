use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use tracing::error;

use springfield_catalogue::filter::{Facets, FilterChange, facet_values};
use springfield_catalogue::loader::PageFetcher;
use springfield_catalogue::progress;
use springfield_catalogue::stats::{CharacterStats, character_stats};
use springfield_catalogue::{
    CancelFlag, Character, Client, Config, Episode, Location, Resource, Section,
};

#[derive(Parser)]
struct Opts {
    /// Optional YAML configuration file.
    #[clap(short, long, env = "SPRINGFIELD_CATALOGUE_CONFIG")]
    config: Option<PathBuf>,
    /// Catalogue section to browse.
    #[clap(long, default_value_t = Resource::Characters)]
    resource: Resource,
    /// Case-insensitive search over names and free-text fields.
    #[clap(long)]
    search: Option<String>,
    /// Characters: exact gender match.
    #[clap(long)]
    gender: Option<String>,
    /// Characters: exact status match (Alive/Deceased).
    #[clap(long)]
    status: Option<String>,
    /// Characters: exact occupation match.
    #[clap(long)]
    occupation: Option<String>,
    /// Locations: exact town match.
    #[clap(long)]
    town: Option<String>,
    /// Episodes: season number.
    #[clap(long)]
    season: Option<i64>,
    /// Characters: minimum age, inclusive.
    #[clap(long)]
    min_age: Option<i64>,
    /// Characters: maximum age, inclusive.
    #[clap(long)]
    max_age: Option<i64>,
    /// Client-side page to display.
    #[clap(long, default_value_t = 1)]
    page: usize,
    /// Fetch one specific server page instead of starting from page 1.
    #[clap(long)]
    server_page: Option<u32>,
    /// Client-side page size (overrides the config).
    #[clap(long)]
    page_size: Option<NonZeroUsize>,
    /// Prefetch every remaining page before rendering (Ctrl-C cancels).
    #[clap(long)]
    all: bool,
    /// Print aggregate character statistics instead of a listing.
    #[clap(long)]
    stats: bool,
    /// List the distinct categorical values available for filtering.
    #[clap(long)]
    facets: bool,
    /// Emit the displayed page as JSON.
    #[clap(long)]
    json: bool,
}

async fn load<T, F>(
    section: &mut Section<T, F>,
    opts: &Opts,
    cancel: &CancelFlag,
) -> anyhow::Result<()>
where
    T: Facets + Clone,
    F: PageFetcher<T>,
{
    if let Some(page) = opts.server_page {
        section.fetch_page(page).await;
    } else if opts.all {
        section.load_all(cancel).await;
    } else {
        section.load_first().await;
    }
    if let Some(message) = section.error() {
        bail!("{message}");
    }
    Ok(())
}

fn character_changes(opts: &Opts) -> Vec<FilterChange> {
    let mut changes = Vec::new();
    if let Some(search) = &opts.search {
        changes.push(FilterChange::SearchTerm(search.clone()));
    }
    for (key, value) in [
        ("gender", &opts.gender),
        ("status", &opts.status),
        ("occupation", &opts.occupation),
    ] {
        if let Some(value) = value {
            changes.push(FilterChange::Category {
                key: key.to_owned(),
                value: Some(value.clone()),
            });
        }
    }
    if opts.min_age.is_some() {
        changes.push(FilterChange::MinBound(opts.min_age));
    }
    if opts.max_age.is_some() {
        changes.push(FilterChange::MaxBound(opts.max_age));
    }
    changes
}

fn episode_changes(opts: &Opts) -> Vec<FilterChange> {
    let mut changes = Vec::new();
    if let Some(search) = &opts.search {
        changes.push(FilterChange::SearchTerm(search.clone()));
    }
    if let Some(season) = opts.season {
        changes.push(FilterChange::Category {
            key: "season".to_owned(),
            value: Some(season.to_string()),
        });
    }
    changes
}

fn location_changes(opts: &Opts) -> Vec<FilterChange> {
    let mut changes = Vec::new();
    if let Some(search) = &opts.search {
        changes.push(FilterChange::SearchTerm(search.clone()));
    }
    if let Some(town) = &opts.town {
        changes.push(FilterChange::Category {
            key: "town".to_owned(),
            value: Some(town.clone()),
        });
    }
    changes
}

fn render<T, F>(
    section: &mut Section<T, F>,
    opts: &Opts,
    summary: impl Fn(&T) -> String,
) -> anyhow::Result<()>
where
    T: Facets + Clone + serde::Serialize,
    F: PageFetcher<T>,
{
    section.jump_to(opts.page);
    let loaded = section.loader().items().len();
    let total_count = section.loader().collection().total_count();
    if opts.json {
        let page = section.page();
        println!("{}", serde_json::to_string_pretty(page.slice)?);
        return Ok(());
    }
    let matching = section.filtered().len();
    let page = section.page();
    if page.slice.is_empty() {
        println!("No items matched.");
    } else {
        for item in page.slice {
            println!("{}", summary(item));
        }
    }
    println!();
    println!(
        "page {}/{} ({matching} matching, {loaded} of {total_count} loaded)",
        page.page_index, page.total_pages
    );
    Ok(())
}

fn print_facets<T: Facets>(items: &[T], keys: &[&str]) {
    for key in keys.iter().copied() {
        let values = facet_values(items, |item| item.category(key));
        println!("{key}: {}", values.join(", "));
    }
}

fn print_stats(stats: &CharacterStats) {
    println!("characters: {}", stats.total);
    println!("  alive: {}", stats.alive);
    println!("  deceased: {}", stats.deceased);
    println!("  male: {}", stats.male);
    println!("  female: {}", stats.female);
    match stats.average_age {
        Some(average) => println!("  average age: {average:.1}"),
        None => println!("  average age: n/a"),
    }
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let mut config = match &opts.config {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| "read config")?;
            serde_yaml::from_str::<Config>(&raw)
                .with_context(|| format!("parse config from {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(page_size) = opts.page_size {
        config.page_size = page_size;
    }
    config.validate().map_err(|msg| anyhow!("{msg}"))?;

    let client = Client::new(&config)?;
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }
    let reporter = progress::create_reporter();

    match opts.resource {
        Resource::Characters => {
            let mut section = Section::new(
                client.collection::<Character>(Resource::Characters),
                config.page_size,
            )
            .with_reporter(reporter.clone());
            load(&mut section, &opts, &cancel).await?;
            reporter.finish();
            for change in character_changes(&opts) {
                section.set_filter(change);
            }
            if opts.facets {
                print_facets(section.filtered(), &["gender", "status", "occupation"]);
                return Ok(());
            }
            if opts.stats {
                print_stats(&character_stats(section.filtered()));
                return Ok(());
            }
            render(&mut section, &opts, Character::summary)
        }
        Resource::Episodes => {
            let mut section = Section::new(
                client.collection::<Episode>(Resource::Episodes),
                config.page_size,
            )
            .with_reporter(reporter.clone());
            load(&mut section, &opts, &cancel).await?;
            reporter.finish();
            for change in episode_changes(&opts) {
                section.set_filter(change);
            }
            if opts.facets {
                print_facets(section.filtered(), &["season"]);
                return Ok(());
            }
            render(&mut section, &opts, Episode::summary)
        }
        Resource::Locations => {
            let mut section = Section::new(
                client.collection::<Location>(Resource::Locations),
                config.page_size,
            )
            .with_reporter(reporter.clone());
            load(&mut section, &opts, &cancel).await?;
            reporter.finish();
            for change in location_changes(&opts) {
                section.set_filter(change);
            }
            if opts.facets {
                print_facets(section.filtered(), &["town", "use"]);
                return Ok(());
            }
            render(&mut section, &opts, Location::summary)
        }
    }
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    if let Err(e) = run(opts).await {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
