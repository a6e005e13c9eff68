//! Benchmarks for menu setup and navigation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use offcanvas_menu::prelude::*;
use offcanvas_menu::render::render_document;

fn create_menu_items(levels: usize, width: usize) -> Vec<MenuItem> {
    (0..width)
        .map(|i| {
            let item = MenuItem::new(&format!("Item {}.{}", levels, i)).with_href("#");
            if levels > 1 {
                item.with_children(create_menu_items(levels - 1, width))
            } else {
                item
            }
        })
        .collect()
}

fn create_page(levels: usize, width: usize) -> String {
    let tree = MenuTree::from_items(&create_menu_items(levels, width)).unwrap();
    render_document(&tree, &CssClasses::default())
}

fn benchmark_parse(c: &mut Criterion) {
    let page = create_page(3, 6);
    c.bench_function("parse_3level_6wide", |b| {
        b.iter(|| {
            let markup = Markup::parse(black_box(&page)).unwrap();
            black_box(&markup);
        })
    });
}

fn benchmark_setup(c: &mut Criterion) {
    let page = create_page(3, 6);
    c.bench_function("setup_3level_6wide", |b| {
        b.iter(|| {
            let menu = MarkupMenu::from_markup(black_box(&page), MenuConfig::default()).unwrap();
            black_box(&menu);
        })
    });
}

fn benchmark_drill_cycle(c: &mut Criterion) {
    let page = create_page(4, 5);
    let mut menu = MarkupMenu::from_markup(&page, MenuConfig::default()).unwrap();
    c.bench_function("open_drill3_back3_close", |b| {
        b.iter(|| {
            menu.dispatch(MenuEvent::Open);
            menu.click_entry("Item 4.0");
            menu.click_entry("Item 3.0");
            menu.click_entry("Item 2.0");
            for _ in 0..3 {
                menu.dispatch(MenuEvent::Back);
            }
            menu.dispatch(MenuEvent::Close);
            black_box(menu.machine().state());
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_setup,
    benchmark_drill_cycle,
);

criterion_main!(benches);
