/// Diagnostic tool to verify the source → tree → layout → hit-test pipeline
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use squaremap_rs::layout::{compute_layout, LayoutConfig, Rect};
use squaremap_rs::memory::{self, MemoryAdapter, MemoryGraph};
use squaremap_rs::profile::{self, ProfileAdapter, ProfileTree, ProfileView};
use squaremap_rs::{scanner, tree, HotMap, TreeAdapter};

const USAGE: &str = "usage: debug-layout <fs DIR | memory DUMP.jsonl | profile STATS.json> \
[--size WxH] [--depth N] [--files] [--percent]";

struct Options {
    source: String,
    path: PathBuf,
    width: f64,
    height: f64,
    depth: Option<u16>,
    files_view: bool,
    percent: bool,
}

fn parse_args() -> Result<Options> {
    let mut args = std::env::args().skip(1);
    let (Some(source), Some(path)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let mut opts = Options {
        source,
        path: PathBuf::from(path),
        width: 1920.0,
        height: 1080.0,
        depth: None,
        files_view: false,
        percent: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--size" => {
                let value = args.next().context("--size needs WxH")?;
                let (w, h) = value.split_once('x').context("--size needs WxH")?;
                opts.width = w.parse().with_context(|| format!("bad width '{}'", w))?;
                opts.height = h.parse().with_context(|| format!("bad height '{}'", h))?;
            }
            "--depth" => {
                let value = args.next().context("--depth needs a number")?;
                opts.depth = Some(value.parse().with_context(|| format!("bad depth '{}'", value))?);
            }
            "--files" => opts.files_view = true,
            "--percent" => opts.percent = true,
            other => bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }
    Ok(opts)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("squaremap_rs=info".parse()?),
        )
        .init();

    let opts = parse_args()?;
    let mut config = LayoutConfig::default();
    if let Some(depth) = opts.depth {
        config.max_depth = depth;
    }
    let bounds = Rect::new(0.0, 0.0, opts.width, opts.height);

    println!("=== DIAGNOSTIC: {} → Layout Pipeline ===", opts.source);
    println!("Input: {}", opts.path.display());

    match opts.source.as_str() {
        "fs" => {
            let entries = scanner::scan_walkdir(&opts.path, None)?;
            println!("\n[1] Scan completed: {} entries", entries.len());
            let tree = tree::build_tree(&opts.path, &entries);
            println!("[2] Tree built: {} nodes", tree.len());
            let adapter = tree::FileTreeAdapter::new(&tree);
            report(&adapter, tree.root, bounds, &config)
        }
        "memory" => {
            let records = memory::load_dump(&opts.path)?;
            println!("\n[1] Dump loaded: {} objects", records.len());
            let graph = MemoryGraph::build(&records)?;
            println!("[2] Graph built: {} nodes, {} roots", graph.len(), graph.roots().len());
            let adapter = MemoryAdapter::new(&graph);
            report(&adapter, graph.root(), bounds, &config)
        }
        "profile" => {
            let text = std::fs::read_to_string(&opts.path)
                .with_context(|| format!("failed to read {}", opts.path.display()))?;
            let records = profile::parse_stats(&text)?;
            println!("\n[1] Stats loaded: {} records", records.len());
            let tree = ProfileTree::build(&records)?;
            println!("[2] Profile built: {} nodes, {:.3}s total", tree.len(), tree.total_time());
            let view = if opts.files_view {
                ProfileView::Files
            } else {
                ProfileView::Calls
            };
            let adapter = ProfileAdapter::new(&tree, view).with_percentage(opts.percent);
            report(&adapter, adapter.root(), bounds, &config)
        }
        other => bail!("unknown source '{}'\n{}", other, USAGE),
    }
}

fn report<A: TreeAdapter>(adapter: &A, root: A::Node, bounds: Rect, config: &LayoutConfig) -> Result<()> {
    let map = compute_layout(adapter, root, bounds, config)?;
    println!("\n[3] Layout computed: {} boxes", map.len());
    if let Some(depth) = map.truncated_depth() {
        println!("    Truncated at depth {} (limit {})", depth, map.max_depth());
    }

    print_largest(adapter, &map);
    print_coverage(&map, bounds);

    let (cx, cy) = bounds.center();
    println!("\n[6] Hit test at ({:.1}, {:.1}):", cx, cy);
    match map.hit_test(cx, cy) {
        Some(hit) => {
            for (depth, node) in hit.ancestors.iter().enumerate() {
                println!("    {}{}", "  ".repeat(depth), adapter.label(*node));
            }
            println!(
                "    {}→ {} at depth {} ({:.1}x{:.1})",
                "  ".repeat(hit.ancestors.len()),
                adapter.label(hit.node),
                hit.depth,
                hit.rect.w,
                hit.rect.h
            );
        }
        None => println!("    (nothing)"),
    }
    Ok(())
}

fn print_largest<A: TreeAdapter>(adapter: &A, map: &HotMap<A::Node>) {
    println!("\n[4] Top 10 leaf boxes by area:");
    let mut leaves: Vec<_> = map.iter().filter(|e| e.is_leaf()).collect();
    leaves.sort_by(|a, b| b.rect.area().total_cmp(&a.rect.area()));
    for (i, entry) in leaves.iter().take(10).enumerate() {
        println!(
            "    [{}] '{}' - {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1}) depth {}",
            i,
            adapter.label(entry.node),
            entry.rect.w,
            entry.rect.h,
            entry.rect.area(),
            entry.rect.x,
            entry.rect.y,
            entry.depth
        );
    }
}

fn print_coverage<N: Copy + PartialEq>(map: &HotMap<N>, bounds: Rect) {
    let leaf_area: f64 = map.iter().filter(|e| e.is_leaf()).map(|e| e.rect.area()).sum();
    println!("\n[5] Coverage:");
    println!("    Leaf area:     {:.0}px²", leaf_area);
    println!("    Viewport area: {:.0}px²", bounds.area());
    println!("    Coverage: {:.1}%", leaf_area / bounds.area() * 100.0);
}
