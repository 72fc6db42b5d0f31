mod config;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    admin::{AdminTab, RecordFilter},
    media::GeneratedAsset,
    search::SearchFilters,
    studio::GenerationStudio,
    ClientEvent, GenerationOutcome, HttpBackend, MediaKind, MemorySurface, StudioShell,
};
use shared::domain::{
    AspectRatio, ContentType, ImageModel, ImageQuality, ImageSize, ImageStyle, PersonGeneration,
    SearchImageId, VideoModel,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PRINTER_DRAIN: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "studio", about = "Terminal front end for the AI generation studio")]
struct Cli {
    /// Settings file; `studio.toml` in the working directory when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    download_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate images from a prompt.
    Image(ImageArgs),
    /// Generate a video from a prompt.
    Video(VideoArgs),
    /// List the six optimized rewrites of a prompt.
    Optimize {
        prompt: String,
        #[arg(long, default_value = "image")]
        content: ContentType,
    },
    /// Search the web for images.
    Search(SearchArgs),
    /// Show generation statistics or recent records.
    Admin {
        #[arg(long)]
        records: bool,
        #[arg(long, default_value = "all")]
        filter: RecordFilter,
    },
    /// Print the prompt tip catalog.
    Tips {
        #[arg(default_value = "image")]
        content: ContentType,
    },
}

#[derive(Args, Debug)]
struct ImageArgs {
    prompt: String,
    #[arg(long)]
    model: Option<ImageModel>,
    #[arg(long)]
    count: Option<u8>,
    #[arg(long)]
    quality: Option<ImageQuality>,
    #[arg(long)]
    size: Option<ImageSize>,
    #[arg(long)]
    style: Option<ImageStyle>,
    /// Replace the prompt with optimized candidate N (1-6) before generating.
    #[arg(long)]
    optimize: Option<usize>,
    #[arg(long)]
    download: bool,
}

#[derive(Args, Debug)]
struct VideoArgs {
    prompt: String,
    #[arg(long)]
    model: Option<VideoModel>,
    #[arg(long)]
    aspect_ratio: Option<AspectRatio>,
    #[arg(long)]
    duration: Option<u8>,
    #[arg(long)]
    person_generation: Option<PersonGeneration>,
    #[arg(long)]
    optimize: Option<usize>,
    #[arg(long)]
    download: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    query: String,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    per_page: Option<u32>,
    #[arg(long)]
    orientation: Option<String>,
    #[arg(long)]
    size: Option<String>,
    #[arg(long = "type")]
    image_type: Option<String>,
    /// Result ids to download after searching.
    #[arg(long = "download")]
    download: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        settings.backend_url = url;
    }
    if let Some(dir) = cli.download_dir {
        settings.download_dir = dir;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!(backend = %settings.backend_url, "starting studio");

    let backend = HttpBackend::new(&settings.backend_url)
        .with_context(|| format!("invalid backend url '{}'", settings.backend_url))?;
    let mut shell = StudioShell::new(
        Arc::new(backend),
        Box::new(MemorySurface::default()),
        &settings.download_dir,
        settings.notification_duration(),
    );
    let printer = tokio::spawn(print_events(shell.subscribe_events()));

    let result = match cli.command {
        Command::Image(args) => run_image(&mut shell, args).await,
        Command::Video(args) => run_video(&mut shell, args).await,
        Command::Optimize { prompt, content } => run_optimize(&mut shell, content, prompt).await,
        Command::Search(args) => run_search(&mut shell, args).await,
        Command::Admin { records, filter } => run_admin(&mut shell, records, filter).await,
        Command::Tips { content } => {
            print_tips(&mut shell, content);
            Ok(())
        }
    };

    shell.shutdown().await;
    drop(shell);
    // Pending dismiss timers keep the channel open.
    let _ = tokio::time::timeout(PRINTER_DRAIN, printer).await;
    result
}

/// Renders core events as terminal lines until the session closes.
async fn print_events(mut events: broadcast::Receiver<ClientEvent>) {
    loop {
        match events.recv().await {
            Ok(ClientEvent::NotificationPosted(notification)) => {
                eprintln!("[{}] {}", notification.kind, notification.message);
            }
            Ok(ClientEvent::LoadingStarted { message, .. }) => eprintln!("{message}"),
            Ok(ClientEvent::Progress { content, percent }) => {
                eprintln!("{} progress: {percent}%", content.label());
            }
            Ok(ClientEvent::DiagnosticRendered { panel, .. }) => eprintln!("{}", panel.render()),
            Ok(other) => debug!(event = ?other, "event"),
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "event printer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn run_image(shell: &mut StudioShell, args: ImageArgs) -> Result<()> {
    let studio = &mut shell.image;
    let params = studio.params_mut();
    if let Some(model) = args.model {
        params.switch_model(model);
    }
    if let Some(count) = args.count {
        params.count = count;
    }
    if let Some(quality) = args.quality {
        params.quality = quality;
    }
    if let Some(size) = args.size {
        params.size = size;
    }
    if let Some(style) = args.style {
        params.style = style;
    }
    generate(studio, args.prompt, args.optimize, args.download).await
}

async fn run_video(shell: &mut StudioShell, args: VideoArgs) -> Result<()> {
    let studio = &mut shell.video;
    let params = studio.params_mut();
    if let Some(model) = args.model {
        params.switch_model(model);
    }
    if let Some(ratio) = args.aspect_ratio {
        params.aspect_ratio = ratio;
    }
    if let Some(duration) = args.duration {
        params.duration = duration;
    }
    if let Some(person_generation) = args.person_generation {
        params.person_generation = person_generation;
    }
    generate(studio, args.prompt, args.optimize, args.download).await
}

async fn generate<K: MediaKind>(
    studio: &mut GenerationStudio<K>,
    prompt: String,
    optimize: Option<usize>,
    download: bool,
) -> Result<()> {
    studio.set_prompt(prompt);
    if let Some(choice) = optimize {
        if !studio.optimize_and_select(choice).await {
            bail!("could not apply optimized candidate {choice}");
        }
    }

    match studio.submit().await {
        GenerationOutcome::Rendered { count } => {
            info!(count, "generation finished");
            for asset in studio.assets() {
                println!("{}", asset.caption());
                println!("  {}", asset.url());
            }
        }
        GenerationOutcome::Failed(panel) => bail!("generation failed: {}", panel.error),
        GenerationOutcome::Rejected(err) => bail!("request rejected: {err}"),
    }

    if download {
        let tally = studio.download_all().await;
        println!(
            "downloaded {} file(s), {} failed",
            tally.succeeded, tally.failed
        );
    }
    Ok(())
}

async fn run_optimize(shell: &mut StudioShell, content: ContentType, prompt: String) -> Result<()> {
    match content {
        ContentType::Image => list_candidates(&mut shell.image, prompt).await,
        ContentType::Video => list_candidates(&mut shell.video, prompt).await,
    }
}

async fn list_candidates<K: MediaKind>(
    studio: &mut GenerationStudio<K>,
    prompt: String,
) -> Result<()> {
    studio.set_prompt(prompt);
    if !studio.optimize().await {
        bail!("prompt optimization failed");
    }
    let selector = studio.selector();
    for button in selector.buttons() {
        let style = selector.style_name(button.index).unwrap_or("Variant");
        println!("{}. [{style}] {}", button.index, selector.candidate(button.index));
    }
    Ok(())
}

async fn run_search(shell: &mut StudioShell, args: SearchArgs) -> Result<()> {
    let search = &mut shell.search;
    let defaults = SearchFilters::default();
    search.filters = SearchFilters {
        orientation: args.orientation.unwrap_or(defaults.orientation),
        size: args.size.unwrap_or(defaults.size),
        image_type: args.image_type.unwrap_or(defaults.image_type),
        per_page: args.per_page.unwrap_or(defaults.per_page),
    };
    search.load_options().await;
    search.set_input(args.query);
    search.search(args.page).await?;

    for result in search.results() {
        println!("{}  {}", result.id, result.display_title());
        println!("  {}", result.url);
    }
    println!("{}", search.pagination().label);

    if !args.download.is_empty() {
        for id in &args.download {
            search.toggle_selection(&SearchImageId::new(id.as_str()));
        }
        println!("{}", search.selection_label());
        let tally = search.download_selected().await;
        println!(
            "downloaded {} image(s), {} failed",
            tally.succeeded, tally.failed
        );
    }
    Ok(())
}

async fn run_admin(shell: &mut StudioShell, records: bool, filter: RecordFilter) -> Result<()> {
    let admin = &mut shell.admin;
    if records {
        admin.show_tab(AdminTab::Records).await?;
        let rows = admin.rows(filter);
        if rows.is_empty() {
            println!("no generation records");
        }
        for row in rows {
            println!(
                "{} | {} | {} | {} | {} | {}",
                row.kind, row.model, row.prompt, row.status, row.duration, row.created_at
            );
        }
    } else {
        admin.show_tab(AdminTab::Statistics).await?;
        for card in admin.stat_cards() {
            println!("{card}");
        }
    }
    Ok(())
}

fn print_tips(shell: &mut StudioShell, content: ContentType) {
    let catalog = match content {
        ContentType::Image => shell.image.show_tips(&mut shell.modals),
        ContentType::Video => shell.video.show_tips(&mut shell.modals),
    };
    for category in catalog {
        println!("{}", category.title);
        for tip in category.tips {
            println!("  - {tip}");
        }
    }
}
