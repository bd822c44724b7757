use anyhow::{anyhow, bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zoomtree_core::error::RenderError;
use zoomtree_core::frame::{Frame, Transition};
use zoomtree_core::label::LabelRule;
use zoomtree_core::{search, ClickOutcome, ClickTarget, Collaborators, Renderer, Treemap, TreemapConfig};

#[derive(Parser, Debug)]
#[command(name = "zoomtree", about = "Zoomable treemap layout driver")]
struct Args {
    /// Flat hierarchy: a JSON array of records, or a .csv file
    input: PathBuf,
    /// Settings file (JSON) with width, height, drilldown, label_rule
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Estimate label fit from character counts
    #[arg(long)]
    char_count_labels: bool,
    /// Zoom steps in order: a node path (fuzzy), or ".." for the breadcrumb
    #[arg(short, long = "zoom")]
    zoom: Vec<String>,
    /// After zooming, drill down on the leaf tile with this name
    #[arg(long)]
    drill: Option<String>,
    /// Output path; .csv writes one row per tile, anything else JSON
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Write the aggregated tree instead of the displayed frame
    #[arg(long)]
    tree: bool,
}

/// Completes each transition as soon as it is handed over.
#[derive(Default)]
struct Headless {
    transitions: usize,
}

impl Renderer for Headless {
    fn paint(&mut self, frame: &Frame) -> Result<(), RenderError> {
        tracing::info!(node = %frame.breadcrumb, tiles = frame.tiles.len(), "painted");
        Ok(())
    }

    fn transition(&mut self, transition: Transition) -> Result<(), RenderError> {
        self.transitions += 1;
        tracing::info!(
            from = %transition.exiting.breadcrumb,
            to = %transition.entering.breadcrumb,
            "transition"
        );
        transition.handle.finish();
        Ok(())
    }
}

fn load_config(args: &Args) -> anyhow::Result<TreemapConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TreemapConfig::default(),
    };
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    if args.char_count_labels {
        config.label_rule = LabelRule::CharCount;
    }
    if args.drill.is_some() {
        config.drilldown = true;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let records = zoomtree_core::ingest::from_path(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let parts = Collaborators::new(Headless::default()).with_rows(|index: usize| -> Result<(), RenderError> {
        println!("activated row {index}");
        Ok(())
    });
    let Some(mut map) = Treemap::new(records, config, parts)? else {
        tracing::warn!("input has no root records, nothing to display");
        return Ok(());
    };
    for step in &args.zoom {
        let moved = if step == ".." {
            map.zoom_out()?
        } else {
            let target = search::find_group(map.tree(), step)
                .ok_or_else(|| anyhow!("no group matches {step:?}"))?;
            map.zoom_to(Some(target))?
        };
        if !moved {
            tracing::warn!(step = %step, "zoom step had no effect");
        }
        map.poll()?;
    }

    if let Some(name) = &args.drill {
        let found = map.frame().tiles.iter().find(|t| &t.name == name).map(|t| t.id);
        let Some(id) = found else {
            bail!("no tile named {name:?} at {}", map.frame().breadcrumb);
        };
        match map.click(id, ClickTarget::Label)? {
            ClickOutcome::Activated(_) => {}
            ClickOutcome::Zoomed => {
                map.poll()?;
            }
            ClickOutcome::Ignored => tracing::warn!(name = %name, "tile has no row to activate"),
        }
    }

    let json = if args.tree {
        zoomtree_core::export::tree_to_json(map.tree())
    } else {
        zoomtree_core::export::frame_to_json(map.frame())
    };
    match &args.out {
        Some(path) if path.extension().is_some_and(|e| e == "csv") && !args.tree => {
            let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
            zoomtree_core::export::frame_to_csv(map.frame(), file)?;
        }
        Some(path) => std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    tracing::info!(transitions = map.renderer().transitions, "done");
    Ok(())
}
