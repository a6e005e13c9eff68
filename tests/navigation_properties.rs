use offcanvas_menu::machine::CLOSE_KEY;
use offcanvas_menu::prelude::*;
use proptest::prelude::*;

/// A chain `depth` levels deep, `width` entries per level. Entry `L{d}` on
/// level `d` opens level `d + 1`.
fn chain(depth: usize, width: usize) -> Vec<MenuItem> {
    fn level(d: usize, depth: usize, width: usize) -> Vec<MenuItem> {
        (0..width)
            .map(|i| {
                if i == 0 && d < depth {
                    MenuItem::new(&format!("L{d}")).with_children(level(d + 1, depth, width))
                } else {
                    MenuItem::new(&format!("Leaf{d}_{i}")).with_href(&format!("/{d}/{i}"))
                }
            })
            .collect()
    }
    level(0, depth, width)
}

fn tree_menu() -> MarkupMenu {
    let items = vec![
        MenuItem::new("A").with_href("/a"),
        MenuItem::new("B").with_children(vec![
            MenuItem::new("C1").with_children(vec![MenuItem::new("D1"), MenuItem::new("D2")]),
            MenuItem::new("C2"),
        ]),
        MenuItem::new("E").with_children(vec![MenuItem::new("F")]),
    ];
    MarkupMenu::from_items(&items, MenuConfig::default()).unwrap()
}

#[derive(Debug, Clone)]
enum Action {
    Open,
    Entry(&'static str),
    Back,
    Close,
    Backdrop,
    Escape,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Open),
        prop::sample::select(vec!["A", "B", "C1", "C2", "D1", "E", "F"]).prop_map(Action::Entry),
        Just(Action::Back),
        Just(Action::Close),
        Just(Action::Backdrop),
        Just(Action::Escape),
    ]
}

fn apply(menu: &mut MarkupMenu, action: &Action) -> bool {
    match action {
        Action::Open => menu.dispatch(MenuEvent::Open),
        Action::Entry(title) => menu.click_entry(title),
        Action::Back => menu.dispatch(MenuEvent::Back),
        Action::Close => menu.dispatch(MenuEvent::Close),
        Action::Backdrop => menu.click_backdrop(),
        Action::Escape => menu.dispatch(MenuEvent::KeyDown(CLOSE_KEY.to_string())),
    }
}

/// Open trigger, close, backdrop, back and keyboard
const SESSION_LISTENERS: usize = 5;

fn check_invariants(menu: &MarkupMenu) -> Result<(), TestCaseError> {
    let machine = menu.machine();
    let surface = menu.surface();

    match machine.visible_panel() {
        Some(panel) => {
            prop_assert_eq!(surface.visible_panel_count(), 1);
            prop_assert!(surface.is_panel_visible(panel));
            prop_assert_eq!(machine.back_visible(), panel != PanelId::ROOT);
            prop_assert_eq!(surface.is_back_visible(), panel != PanelId::ROOT);
            let title_text = surface.title_text();
            prop_assert_eq!(title_text.as_deref(), Some(machine.title()));
            prop_assert_eq!(
                surface.listeners().len(),
                SESSION_LISTENERS + machine.bound_entries().len()
            );
        }
        None => {
            prop_assert_eq!(surface.visible_panel_count(), 0);
            prop_assert_eq!(surface.listeners().len(), 1);
            prop_assert!(!surface.has_backdrop());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn drill_then_back_returns_to_root(depth in 1usize..6, width in 1usize..4) {
        let mut menu = MarkupMenu::from_items(&chain(depth, width), MenuConfig::default()).unwrap();
        prop_assert!(menu.dispatch(MenuEvent::Open));

        for d in 0..depth {
            let clicked = menu.click_entry(&format!("L{d}"));
            prop_assert!(clicked);
            prop_assert_eq!(menu.machine().title(), format!("L{d}"));
        }
        let deepest = menu.machine().visible_panel().unwrap();
        prop_assert_eq!(menu.machine().tree().depth(deepest) as usize, depth + 1);

        for _ in 0..depth {
            prop_assert!(menu.dispatch(MenuEvent::Back));
        }
        prop_assert_eq!(menu.machine().visible_panel(), Some(PanelId::ROOT));
        prop_assert_eq!(menu.machine().title(), "Menu");
        prop_assert!(!menu.dispatch(MenuEvent::Back));
    }

    #[test]
    fn invariants_hold_for_any_session(actions in prop::collection::vec(action(), 0..40)) {
        let mut menu = tree_menu();
        check_invariants(&menu)?;
        for action in &actions {
            apply(&mut menu, action);
            check_invariants(&menu)?;
        }
    }

    #[test]
    fn reopen_starts_at_root(actions in prop::collection::vec(action(), 0..20)) {
        let mut menu = tree_menu();
        for action in &actions {
            apply(&mut menu, action);
        }
        menu.dispatch(MenuEvent::Close);
        prop_assert!(menu.dispatch(MenuEvent::Open));
        prop_assert_eq!(menu.machine().visible_panel(), Some(PanelId::ROOT));
        prop_assert_eq!(menu.machine().title(), "Menu");
        prop_assert!(!menu.surface().is_back_visible());
    }

    #[test]
    fn escape_matches_close(actions in prop::collection::vec(action(), 0..20)) {
        let mut closed = tree_menu();
        let mut escaped = tree_menu();
        for action in &actions {
            apply(&mut closed, action);
            apply(&mut escaped, action);
        }

        let was_open = closed.machine().is_open();
        prop_assert_eq!(closed.dispatch(MenuEvent::Close), was_open);
        prop_assert_eq!(
            escaped.dispatch(MenuEvent::KeyDown(CLOSE_KEY.to_string())),
            was_open
        );
        prop_assert_eq!(closed.machine().state(), escaped.machine().state());
        prop_assert_eq!(closed.to_html(), escaped.to_html());
    }

    #[test]
    fn entry_click_is_one_transition_after_cycles(cycles in 0usize..8) {
        let mut menu = tree_menu();
        for _ in 0..cycles {
            menu.dispatch(MenuEvent::Open);
            menu.click_entry("B");
            menu.dispatch(MenuEvent::Close);
        }

        menu.dispatch(MenuEvent::Open);
        let b = menu.machine().tree().find_entry("B").unwrap();
        let handlers = menu
            .surface()
            .listeners()
            .bindings()
            .filter(|binding| *binding == Binding::Entry(b))
            .count();
        prop_assert_eq!(handlers, 1);

        prop_assert!(menu.click_entry("B"));
        let depth = menu.machine().tree().depth(menu.machine().visible_panel().unwrap());
        prop_assert_eq!(depth, 2);
    }
}

#[test]
fn escape_while_closed_is_ignored() {
    let mut menu = tree_menu();
    let before = menu.to_html();
    assert!(!menu.dispatch(MenuEvent::KeyDown(CLOSE_KEY.to_string())));
    assert_eq!(menu.to_html(), before);
}
