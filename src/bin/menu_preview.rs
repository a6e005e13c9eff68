//! Replay a scripted session against a menu described in JSON.
//!
//! ```text
//! menu-preview menu.json open entry:Shop back close
//! ```

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use offcanvas_menu::machine::CLOSE_KEY;
use offcanvas_menu::prelude::*;

/// Preview an off-canvas menu without a browser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of menu items (`title`, optional `href`, `children`)
    menu: PathBuf,

    /// Events to replay: open, entry:<title>, back, close, backdrop, escape
    events: Vec<Step>,

    /// JSON file with menu options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Title shown at the top level
    #[arg(long)]
    title: Option<String>,

    /// Keep the menu open on backdrop clicks
    #[arg(long)]
    no_backdrop_close: bool,

    /// Print the final page markup
    #[arg(long)]
    html: bool,
}

#[derive(Debug, Clone)]
enum Step {
    Open,
    Entry(String),
    Back,
    Close,
    Backdrop,
    Escape,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(title) = s.strip_prefix("entry:") {
            return Ok(Step::Entry(title.to_string()));
        }
        match s {
            "open" => Ok(Step::Open),
            "back" => Ok(Step::Back),
            "close" => Ok(Step::Close),
            "backdrop" => Ok(Step::Backdrop),
            "escape" => Ok(Step::Escape),
            other => Err(format!("unknown event '{other}'")),
        }
    }
}

fn load_config(args: &Args) -> Result<MenuConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MenuConfig::from_json(&json).context("parsing menu options")?
        }
        None => MenuConfig::default(),
    };
    if let Some(title) = &args.title {
        config = config.with_title(title);
    }
    if args.no_backdrop_close {
        config = config.with_backdrop_close(false);
    }
    Ok(config)
}

fn replay(menu: &mut MarkupMenu, step: &Step) -> bool {
    match step {
        Step::Open => menu.dispatch(MenuEvent::Open),
        Step::Entry(title) => menu.click_entry(title),
        Step::Back => menu.dispatch(MenuEvent::Back),
        Step::Close => menu.dispatch(MenuEvent::Close),
        Step::Backdrop => menu.click_backdrop(),
        Step::Escape => menu.dispatch(MenuEvent::KeyDown(CLOSE_KEY.to_string())),
    }
}

fn print_state(menu: &MarkupMenu) {
    let machine = menu.machine();
    let Some(panel) = machine.visible_panel() else {
        println!("  closed");
        return;
    };
    println!(
        "  open  depth={} title={:?} back={}",
        machine.tree().depth(panel),
        machine.title(),
        if machine.back_visible() { "shown" } else { "hidden" },
    );
    for item in machine.visible_items() {
        let marker = if item.has_children {
            format!(" [{}]", item.children_count)
        } else {
            String::new()
        };
        println!("    - {}{}", strip_tags(&item.title), marker);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let json = fs::read_to_string(&args.menu)
        .with_context(|| format!("reading {}", args.menu.display()))?;
    let items: Vec<MenuItem> = serde_json::from_str(&json).context("parsing menu items")?;
    if items.is_empty() {
        bail!("{} has no menu items", args.menu.display());
    }

    let config = load_config(&args)?;
    let mut menu = MarkupMenu::from_items(&items, config)?;
    info!(
        "menu ready: {} panels, {} entries",
        menu.machine().tree().panel_count(),
        menu.machine().tree().entry_count()
    );

    println!("init");
    print_state(&menu);
    for step in &args.events {
        let changed = replay(&mut menu, step);
        println!("{:?}{}", step, if changed { "" } else { " (ignored)" });
        print_state(&menu);
    }

    if args.html {
        println!("{}", menu.to_html());
    }
    Ok(())
}
