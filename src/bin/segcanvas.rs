use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use segcanvas::{
    AssetId, AssetInfo, CanvasOpts, FsMetadataStore, FsPartitionSource, PointerEvent,
    SegmentCanvas, SelectionMode, Tag, TagRegistry,
    export::{
        raster::{RasterOpts, parse_hex_color, rasterize_overlay, write_png},
        records::{polygon_records, strict_records},
    },
    surface::svg_out::{SvgExportMode, export_file_name},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Canvas = SegmentCanvas<FsMetadataStore, FsPartitionSource>;

#[derive(Parser, Debug)]
#[command(name = "segcanvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load an asset, rescan its painted partition and print the segments as JSON.
    Segments(AssetArgs),
    /// Replay recorded gestures on an asset and save the resulting metadata.
    Paint(PaintArgs),
    /// Write segment export records.
    Export(ExportArgs),
    /// Rasterize the painted overlay to PNG.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct AssetArgs {
    /// Directory holding `<assetId>.metadata.json` files.
    #[arg(long)]
    metadata_root: PathBuf,

    /// Asset id.
    #[arg(long)]
    asset: String,

    /// Asset display name (defaults to the id).
    #[arg(long)]
    asset_name: Option<String>,

    /// Partition SVG. When omitted the partition named by the metadata is read from
    /// `--partition-root`.
    #[arg(long)]
    partition: Option<PathBuf>,

    /// Directory partitions are resolved against (defaults to the metadata root).
    #[arg(long)]
    partition_root: Option<PathBuf>,

    /// Canvas options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project tags JSON (`[{"name": .., "color": ..}]`).
    #[arg(long)]
    tags: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PaintArgs {
    #[command(flatten)]
    asset: AssetArgs,

    /// Gesture script JSON.
    #[arg(long)]
    gestures: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    asset: AssetArgs,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Emit strict records (shape ids, no polygons).
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    asset: AssetArgs,

    /// Output PNG path, or a directory to place `<asset stem>.png` in.
    #[arg(long)]
    out: PathBuf,

    /// Draw the grid over the overlay.
    #[arg(long)]
    grid: bool,

    /// Background color as `#rrggbb` or `#rrggbbaa`.
    #[arg(long, default_value = "#000000")]
    background: String,

    /// Output pixels per image unit.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Also write the overlay SVG next to the PNG.
    #[arg(long)]
    svg: bool,
}

/// One step of a gesture script.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum Gesture {
    Mode(SelectionMode),
    Tag(Tag),
    Pointer(PointerEvent),
    ClearAll,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("SEGCANVAS_LOG")
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Segments(args) => cmd_segments(args),
        Command::Paint(args) => cmd_paint(args),
        Command::Export(args) => cmd_export(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn open_canvas(args: &AssetArgs) -> anyhow::Result<Canvas> {
    let opts = match &args.config {
        Some(path) => CanvasOpts::from_path(path)?,
        None => CanvasOpts::default(),
    };
    let tags = match &args.tags {
        Some(path) => TagRegistry::new(read_json::<Vec<Tag>>(path, "tags")?),
        None => TagRegistry::default(),
    };
    let store = FsMetadataStore::new(&args.metadata_root);
    let partitions = FsPartitionSource::new(
        args.partition_root
            .clone()
            .unwrap_or_else(|| args.metadata_root.clone()),
    );
    let mut canvas = SegmentCanvas::new(opts, store, partitions).with_tags(tags);

    let asset = AssetInfo {
        id: AssetId::new(&args.asset),
        name: args.asset_name.clone().unwrap_or_else(|| args.asset.clone()),
        path: String::new(),
    };
    match &args.partition {
        Some(path) => {
            let req = canvas.begin_load(asset);
            let bytes = std::fs::read(path)
                .with_context(|| format!("read partition '{}'", path.display()))?;
            let shapes = segcanvas::decode_partition(&bytes, &canvas.opts().paint);
            canvas.complete_load(req.ticket, shapes);
        }
        None => canvas.load_asset(asset),
    }

    if !canvas.state().is_ready() {
        anyhow::bail!("partition for asset '{}' is not available", args.asset);
    }
    Ok(canvas)
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

fn cmd_segments(args: AssetArgs) -> anyhow::Result<()> {
    let mut canvas = open_canvas(&args)?;
    canvas.rescan();
    println!("{}", serde_json::to_string_pretty(canvas.segments())?);
    Ok(())
}

fn cmd_paint(args: PaintArgs) -> anyhow::Result<()> {
    let script: Vec<Gesture> = read_json(&args.gestures, "gesture script")?;
    let mut canvas = open_canvas(&args.asset)?;

    for step in script {
        match step {
            Gesture::Mode(mode) => canvas.set_selection_mode(mode),
            Gesture::Tag(tag) => canvas.apply_tag(&tag),
            Gesture::Pointer(ev) => {
                canvas.handle_pointer(ev);
            }
            Gesture::ClearAll => canvas.remove_all_segments(),
        }
    }
    canvas.teardown();

    let store = canvas.store();
    let saved = store.metadata_path(&AssetId::new(&args.asset.asset))?;
    eprintln!("saved {}", saved.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut canvas = open_canvas(&args.asset)?;
    canvas.rescan();
    let Some(meta) = canvas.metadata() else {
        anyhow::bail!("no metadata loaded for asset '{}'", args.asset.asset);
    };
    if args.strict {
        write_json(&args.out, &strict_records(meta))?;
    } else {
        write_json(&args.out, &polygon_records(&meta.segments, canvas.index()))?;
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut canvas = open_canvas(&args.asset)?;
    canvas.set_grid_on(args.grid);
    let svg = canvas.overlay_svg(SvgExportMode::Opaque);

    let asset_name = canvas
        .metadata()
        .map(|m| m.asset.name.clone())
        .unwrap_or_else(|| args.asset.asset.clone());
    let out = if args.out.is_dir() {
        args.out.join(export_file_name(&asset_name, "png"))
    } else {
        args.out.clone()
    };

    let opts = RasterOpts {
        scale: args.scale,
        background: parse_hex_color(&args.background)?,
    };
    let img = rasterize_overlay(&svg, &opts)?;
    write_png(&img, &out)?;
    eprintln!("wrote {}", out.display());

    if args.svg {
        let svg_out = out.with_file_name(export_file_name(&asset_name, "svg"));
        std::fs::write(&svg_out, &svg)
            .with_context(|| format!("write svg '{}'", svg_out.display()))?;
        eprintln!("wrote {}", svg_out.display());
    }
    Ok(())
}
