use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use folio_cli::config_loader::{load_config_for_site, resolve_site_dir};
use folio_cli::preview::{PreviewOpts, run_preview};
use folio_cli::snapshot::{self, Outcome};
use folio_core::lang::Lang;
use folio_core::view::Route;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "folio_cli")]
struct Cli {
    #[arg(long = "site-dir", short = 's', global = true)]
    site_dir: Option<PathBuf>,
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Print the post list page.")]
    List {
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    #[command(about = "Print the page of one post.")]
    Show {
        id: String,
        #[arg(long)]
        lang: Option<String>,
    },
    #[command(about = "Print the page a URL fragment such as #post/<id> resolves to.")]
    Route {
        fragment: String,
        #[arg(long)]
        lang: Option<String>,
    },
    #[command(about = "List every tag in the post index.")]
    Tags,
    #[command(about = "Serve the site with rendered blog pages.")]
    Preview {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long)]
        no_open: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Command::List { lang, tag } => run_page(&cli, "", lang.as_deref(), tag.as_deref()),
        Command::Show { id, lang } => {
            let fragment = Route::Post(id.clone()).fragment();
            run_page(&cli, &fragment, lang.as_deref(), None)
        }
        Command::Route { fragment, lang } => run_page(&cli, fragment, lang.as_deref(), None),
        Command::Tags => run_tags(&cli),
        Command::Preview {
            host,
            port,
            no_open,
        } => run_preview(PreviewOpts {
            site_dir: cli.site_dir.clone(),
            host: host.clone(),
            port: *port,
            no_open: *no_open,
        }),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_page(cli: &Cli, fragment: &str, lang: Option<&str>, tag: Option<&str>) -> Result<()> {
    let root = resolve_site_dir(cli.site_dir.as_deref())?;
    let config = load_config_for_site(&root)?;
    let lang = Lang::from_code(lang.unwrap_or(&config.site.default_language));
    let ctl = snapshot::controller(&root, &config, lang);
    let runtime = snapshot::runtime()?;
    let outcome = runtime.block_on(snapshot::render_route(&ctl, fragment, tag))?;
    println!("{}", ctl.render_document(None, false)?);
    match outcome {
        Outcome::Rendered => Ok(()),
        Outcome::NotFound => bail!("post not found: {fragment}"),
        Outcome::Failed => bail!("failed to render {fragment}"),
    }
}

fn run_tags(cli: &Cli) -> Result<()> {
    let root = resolve_site_dir(cli.site_dir.as_deref())?;
    let config = load_config_for_site(&root)?;
    let runtime = snapshot::runtime()?;
    for tag in runtime.block_on(snapshot::site_tags(&root, &config))? {
        println!("{tag}");
    }
    Ok(())
}
