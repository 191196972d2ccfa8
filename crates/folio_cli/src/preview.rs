use std::fs::File;
use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use folio_core::lang::Lang;
use folio_core::model::SiteConfig;
use folio_core::source::clean_relative_path;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{info, warn};

use crate::config_loader::{load_config_for_site, resolve_site_dir};
use crate::snapshot::{self, Outcome};

pub struct PreviewOpts {
    pub site_dir: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub no_open: bool,
}

pub struct PreviewHandle {
    pub url: String,
    shutdown: Arc<AtomicBool>,
    join: JoinHandle<Result<()>>,
}

impl PreviewHandle {
    pub fn stop(self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        match self.join.join() {
            Ok(result) => result,
            Err(_) => anyhow::bail!("preview thread panicked"),
        }
    }
}

pub fn run_preview(opts: PreviewOpts) -> Result<()> {
    let site_dir = resolve_site_dir(opts.site_dir.as_deref())?;
    let config = load_config_for_site(&site_dir)?;

    let (server, addr) = bind_server(&opts.host, opts.port)?;
    let url = preview_url(&opts.host, addr);

    println!("Preview: {url}");
    println!("Serving: {}", site_dir.display());

    if !opts.no_open {
        if let Err(err) = webbrowser::open(&url) {
            warn!(error = %err, "failed to open browser");
        }
    }

    serve_loop(server, site_dir, config, None)
}

pub fn spawn_preview(opts: PreviewOpts) -> Result<PreviewHandle> {
    let site_dir = resolve_site_dir(opts.site_dir.as_deref())?;
    let config = load_config_for_site(&site_dir)?;

    let (server, addr) = bind_server(&opts.host, opts.port)?;
    let url = preview_url(&opts.host, addr);
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_thread = shutdown.clone();
    let join = thread::spawn(move || serve_loop(server, site_dir, config, Some(shutdown_thread)));

    Ok(PreviewHandle { url, shutdown, join })
}

fn bind_server(host: &str, port: u16) -> Result<(Server, SocketAddr)> {
    let addr = format!("{host}:{port}");
    let server = Server::http(&addr)
        .map_err(|err| anyhow::anyhow!("failed to bind to {addr}: {err}"))?;
    let actual = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| anyhow::anyhow!("failed to resolve socket address"))?;
    Ok((server, actual))
}

fn preview_url(host: &str, addr: SocketAddr) -> String {
    format!("http://{host}:{}/", addr.port())
}

fn serve_loop(
    server: Server,
    site_dir: PathBuf,
    config: SiteConfig,
    shutdown: Option<Arc<AtomicBool>>,
) -> Result<()> {
    let runtime = snapshot::runtime()?;
    loop {
        if let Some(flag) = &shutdown {
            if flag.load(Ordering::SeqCst) {
                break;
            }
        }

        let request = match server.recv_timeout(Duration::from_millis(200)) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(err) => return Err(err.into()),
        };

        let response = match handle_request(&runtime, &request, &site_dir, &config) {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %format_args!("{err:#}"), url = request.url(), "request failed");
                Response::from_string("Internal Server Error")
                    .with_status_code(StatusCode(500))
                    .boxed()
            }
        };

        if let Err(err) = request.respond(response) {
            warn!(error = %err, "failed to send response");
        }
    }
    Ok(())
}

/// What a request path asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRoute {
    List,
    Post(String),
    File(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewQuery {
    pub lang: Option<String>,
    pub tag: Option<String>,
}

/// `/` is the list, `/post/<id>` a post, anything else a file under the site
/// root. `None` for paths that try to leave the root.
pub fn resolve_route(url: &str) -> Option<PreviewRoute> {
    let path = url.split('?').next().unwrap_or(url);
    let decoded = urlencoding::decode(path).ok()?;
    let trimmed = decoded.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(PreviewRoute::List);
    }
    if let Some(id) = trimmed.strip_prefix("post/") {
        let id = id.trim_end_matches('/');
        if id.is_empty() || id.contains('/') {
            return None;
        }
        return Some(PreviewRoute::Post(id.to_string()));
    }
    clean_relative_path(trimmed).map(PreviewRoute::File)
}

pub fn parse_query(url: &str) -> PreviewQuery {
    let mut query = PreviewQuery::default();
    let Some((_, raw)) = url.split_once('?') else {
        return query;
    };
    for pair in raw.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let Ok(value) = urlencoding::decode(&value.replace('+', " ")).map(|v| v.into_owned()) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match key {
            "lang" => query.lang = Some(value),
            "tag" => query.tag = Some(value),
            _ => {}
        }
    }
    query
}

fn handle_request(
    runtime: &tokio::runtime::Runtime,
    request: &tiny_http::Request,
    site_dir: &Path,
    config: &SiteConfig,
) -> Result<Response<Box<dyn Read + Send>>> {
    if request.method() != &Method::Get && request.method() != &Method::Head {
        return Ok(Response::from_string("Method Not Allowed")
            .with_status_code(StatusCode(405))
            .boxed());
    }

    let Some(route) = resolve_route(request.url()) else {
        return Ok(not_found());
    };
    let fragment = match route {
        PreviewRoute::File(rel_path) => return serve_file(request, &site_dir.join(rel_path)),
        PreviewRoute::List => String::new(),
        PreviewRoute::Post(id) => format!("#post/{id}"),
    };

    let query = parse_query(request.url());
    let lang = query
        .lang
        .as_deref()
        .map(Lang::from_code)
        .unwrap_or_else(|| Lang::from_code(&config.site.default_language));
    let ctl = snapshot::controller(site_dir, config, lang);
    let outcome = runtime.block_on(snapshot::render_route(&ctl, &fragment, query.tag.as_deref()))?;
    info!(url = request.url(), outcome = ?outcome, "rendered page");
    let html = ctl.render_document(Some("/"), true)?;
    let status = match outcome {
        Outcome::NotFound => 404,
        Outcome::Rendered | Outcome::Failed => 200,
    };
    Ok(Response::from_string(html)
        .with_status_code(StatusCode(status))
        .with_header(content_type_header(Path::new("page.html")))
        .boxed())
}

fn serve_file(request: &tiny_http::Request, full_path: &Path) -> Result<Response<Box<dyn Read + Send>>> {
    if !full_path.exists() || full_path.is_dir() {
        return Ok(not_found());
    }

    let mut file = File::open(full_path)
        .with_context(|| format!("failed to open {}", full_path.display()))?;

    if request.method() == &Method::Head {
        let _ = file.read(&mut [0; 0]);
        return Ok(Response::empty(200)
            .with_header(content_type_header(full_path))
            .boxed());
    }

    Ok(Response::from_file(file)
        .with_header(content_type_header(full_path))
        .boxed())
}

fn not_found() -> Response<Box<dyn Read + Send>> {
    Response::from_string("Not Found")
        .with_status_code(StatusCode(404))
        .boxed()
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "md" => "text/markdown; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

fn content_type_header(path: &Path) -> Header {
    Header::from_bytes("Content-Type", content_type_for(path)).expect("valid header")
}
