use clap::{Parser, Subcommand, ValueEnum};
use figml_client::{ClientConfig, DesignClient, ImageFormat, DEFAULT_API_BASE};
use figml_codegen::{
    compile, to_html_page, AssetKind, AssetRef, CompilerOutput, ConvertOptions, CoordinateSpace,
    StyleMode,
};
use figml_model::SourceResponse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "figml")]
#[command(about = "Convert design documents to HTML")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a saved design API response to HTML
    Build {
        /// Input .json file (file or nodes response)
        path: String,

        #[command(flatten)]
        convert: ConvertArgs,

        /// JSON object mapping node ids to image URLs
        #[arg(long)]
        asset_urls: Option<String>,
    },

    /// Fetch a document from the design API and convert it
    Fetch {
        /// Document key (from the file URL)
        #[arg(long, env = "FIGMA_FILE_KEY")]
        file_key: String,

        /// API access token
        #[arg(long, env = "FIGMA_API_KEY", hide_env_values = true)]
        token: String,

        #[arg(long, default_value = DEFAULT_API_BASE)]
        api_base: String,

        #[command(flatten)]
        convert: ConvertArgs,

        /// What to do with image and icon references
        #[arg(long, value_enum, default_value_t = AssetMode::Paths)]
        assets: AssetMode,
    },

    /// Check that a saved response converts without errors
    Check {
        /// Input .json file
        path: String,

        /// Sub-tree id to render (`1:2` or `1-2`)
        #[arg(long)]
        node: Option<String>,
    },
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Sub-tree id to render (`1:2` or `1-2`); defaults to the first page
    #[arg(long)]
    node: Option<String>,

    /// Emit classes and a stylesheet instead of inline styles
    #[arg(long)]
    stylesheet: bool,

    /// Position children relative to their parent instead of the document
    #[arg(long)]
    relative: bool,

    /// Output .html path
    #[arg(short, long)]
    output: Option<String>,

    /// Page title
    #[arg(long)]
    title: Option<String>,
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            style_mode: if self.stylesheet {
                StyleMode::Stylesheet
            } else {
                StyleMode::Inline
            },
            coordinates: if self.relative {
                CoordinateSpace::Relative
            } else {
                CoordinateSpace::Document
            },
            asset_urls: HashMap::new(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AssetMode {
    /// Keep relative ./images and ./icons paths
    Paths,
    /// Point `src` at the API's rendered URLs
    Remote,
    /// Download rendered assets next to the output file
    Download,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build {
            path,
            convert,
            asset_urls,
        } => cmd_build(&path, &convert, asset_urls.as_deref()),
        Command::Fetch {
            file_key,
            token,
            api_base,
            convert,
            assets,
        } => {
            let config = ClientConfig::new(token).with_api_base(api_base);
            cmd_fetch(&file_key, config, &convert, assets);
        }
        Command::Check { path, node } => cmd_check(&path, node.as_deref()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        fail(format!("file not found: {path}"));
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => fail(format!("reading {path}: {e}")),
    }
}

fn read_response(path: &str) -> SourceResponse {
    let source = read_source(path);
    match figml_model::parse_response(&source) {
        Ok(response) => response,
        Err(e) => fail(format!("{path}: {e}")),
    }
}

fn convert(
    response: &SourceResponse,
    node: Option<&str>,
    options: &ConvertOptions,
) -> CompilerOutput {
    match compile(response, node, options) {
        Ok(output) => output,
        Err(e) => fail(e),
    }
}

fn cmd_build(path: &str, args: &ConvertArgs, asset_urls: Option<&str>) {
    let response = read_response(path);

    let mut options = args.options();
    if let Some(map_path) = asset_urls {
        options.asset_urls = match serde_json::from_str(&read_source(map_path)) {
            Ok(map) => map,
            Err(e) => fail(format!("{map_path}: {e}")),
        };
    }

    let output = convert(&response, args.node.as_deref(), &options);

    // Write output next to the source unless told otherwise
    let source = Path::new(path);
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("design");
    let html_path = match &args.output {
        Some(out) => PathBuf::from(out),
        None => source
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("{stem}.html")),
    };
    let title = page_title(args, &response, stem);

    write_output(&html_path, &output, &title);
}

fn cmd_fetch(
    file_key: &str,
    config: ClientConfig,
    args: &ConvertArgs,
    assets: AssetMode,
) {
    let client = match DesignClient::new(config) {
        Ok(client) => client,
        Err(e) => fail(e),
    };
    let response = match client.fetch(file_key, args.node.as_deref()) {
        Ok(response) => response,
        Err(e) => fail(e),
    };

    let mut options = args.options();
    let mut output = convert(&response, args.node.as_deref(), &options);

    let html_path = match &args.output {
        Some(out) => PathBuf::from(out),
        None => PathBuf::from(format!("{file_key}.html")),
    };

    match assets {
        AssetMode::Paths => {}
        AssetMode::Remote => {
            options.asset_urls = resolve_assets(&client, file_key, &output.assets);
            output = convert(&response, args.node.as_deref(), &options);
        }
        AssetMode::Download => {
            let urls = resolve_assets(&client, file_key, &output.assets);
            let base = html_path.parent().unwrap_or(Path::new("."));
            download_assets(&client, &output.assets, &urls, base);
        }
    }

    let title = page_title(args, &response, file_key);
    write_output(&html_path, &output, &title);
}

fn cmd_check(path: &str, node: Option<&str>) {
    let response = read_response(path);
    let output = convert(&response, node, &ConvertOptions::default());
    eprintln!(
        "OK: {path} ({} bytes of HTML, {} asset(s))",
        output.html.len(),
        output.assets.len()
    );
}

/// Resolve rendered URLs for every referenced asset, grouped by format.
fn resolve_assets(
    client: &DesignClient,
    file_key: &str,
    assets: &[AssetRef],
) -> HashMap<String, String> {
    let mut urls = HashMap::new();
    for (kind, format) in [
        (AssetKind::Image, ImageFormat::Png),
        (AssetKind::Icon, ImageFormat::Svg),
    ] {
        let mut ids: Vec<&str> = assets
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.node_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        match client.resolve_images(file_key, &ids, format) {
            Ok(resolved) => urls.extend(resolved),
            Err(e) => fail(e),
        }
    }
    urls
}

fn download_assets(
    client: &DesignClient,
    assets: &[AssetRef],
    urls: &HashMap<String, String>,
    base: &Path,
) {
    for asset in assets {
        let Some(url) = urls.get(&asset.node_id) else {
            log::warn!("no rendered URL for {} ({})", asset.node_id, asset.name);
            continue;
        };
        let target = base.join(asset.path.trim_start_matches("./"));
        if let Err(e) = client.download(url, &target) {
            fail(e);
        }
    }
    eprintln!("Downloaded {} asset(s)", assets.len());
}

fn page_title(args: &ConvertArgs, response: &SourceResponse, fallback: &str) -> String {
    args.title
        .clone()
        .or_else(|| response.name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn write_output(html_path: &Path, output: &CompilerOutput, title: &str) {
    let page = to_html_page(output, title);
    if let Err(e) = std::fs::write(html_path, &page) {
        fail(format!("writing {}: {e}", html_path.display()));
    }

    // Also write the standalone stylesheet if non-empty
    if !output.css.is_empty() {
        let css_path = html_path.with_extension("css");
        if let Err(e) = std::fs::write(&css_path, &output.css) {
            fail(format!("writing {}: {e}", css_path.display()));
        }
    }

    eprintln!("Built: {}", html_path.display());
}
