// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menus for table rows with custom data.
//!
//! Two tables each own a menu keyed by the table id. Clicking a row's action button
//! shows the table's menu next to the button with the selected rows as custom data.
//! A scroll signal dismisses whatever is open.
//!
//! Run:
//! - `cargo run -p understory_demos --example menu_context_rows`

use kurbo::Rect;
use understory_menu::anchor::{Anchor, anchor_point};
use understory_menu::{DismissTriggers, MenuData, MenuPatch, MenuProvider, RegistryOptions};

/// Custom data shared by every row menu.
#[derive(Clone, Debug, Default, PartialEq)]
struct RowMenu {
    user_id: Option<String>,
    selected: Vec<u32>,
}

/// Partial update of [`RowMenu`].
#[derive(Clone, Debug, Default)]
struct RowMenuPatch {
    user_id: Option<Option<String>>,
    selected: Option<Vec<u32>>,
}

impl MenuData for RowMenu {
    type Patch = RowMenuPatch;

    fn merge(&mut self, patch: RowMenuPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(selected) = patch.selected {
            self.selected = selected;
        }
    }
}

fn render(provider: &MenuProvider<RowMenu>, table: &str) {
    let menu = provider.menu(table);
    match menu.config() {
        Some(config) if menu.is_active() => {
            let mut items = vec![format!("Act on rows {:?}", config.data.selected)];
            if config.data.user_id.is_some() {
                items.push("Logout".to_string());
            }
            println!(
                "  [{table}] open at ({}, {}) z={} items={items:?}",
                config.position.x,
                config.position.y,
                provider.z_index(),
            );
        }
        _ => println!("  [{table}] closed"),
    }
}

fn main() {
    let provider: MenuProvider<RowMenu> = MenuProvider::with_options(
        RegistryOptions::default()
            .with_dismiss(DismissTriggers::SCROLL | DismissTriggers::ESCAPE)
            .with_z_index(200),
    );
    let tables = ["my-table", "my-table-2"];

    // Signed-in user applies to every table menu.
    for table in tables {
        provider.update_config(
            table,
            MenuPatch::new().data(RowMenuPatch {
                user_id: Some(Some("u-42".to_string())),
                ..RowMenuPatch::default()
            }),
        );
    }

    // Rows 1 and 3 selected in the first table; its "..." button sits here.
    let button = Rect::new(300.0, 40.0, 320.0, 60.0);
    provider.show_with(
        "my-table",
        MenuPatch::new()
            .position(anchor_point(button, Anchor::Bottom))
            .data(RowMenuPatch {
                selected: Some(vec![1, 3]),
                ..RowMenuPatch::default()
            }),
    );
    println!("== open first table menu ==");
    tables.iter().for_each(|t| render(&provider, t));

    let button2 = Rect::new(300.0, 400.0, 320.0, 420.0);
    provider.menu("my-table-2").show_with(
        MenuPatch::new()
            .position(anchor_point(button2, Anchor::Right))
            .data(RowMenuPatch {
                selected: Some(vec![7]),
                ..RowMenuPatch::default()
            }),
    );
    println!("== open second table menu ==");
    tables.iter().for_each(|t| render(&provider, t));
    assert!(!provider.is_active("my-table"));

    println!("== window scrolled ==");
    assert!(provider.dismiss(DismissTriggers::SCROLL));
    tables.iter().for_each(|t| render(&provider, t));
    assert_eq!(provider.active_id(), None);

    // Data survives hiding.
    assert_eq!(
        provider.menu("my-table").data().map(|d| d.selected),
        Some(vec![1, 3])
    );
    provider.run_pending();
}
