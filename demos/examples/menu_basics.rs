// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-active menus: show, switch, clear, and deferred callbacks.
//!
//! Two menus are configured with logging callbacks. Showing the second while the
//! first is open hides the first; the callbacks only run when the queue is drained.
//!
//! Run:
//! - `cargo run -p understory_demos --example menu_basics`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use understory_menu::{Lifecycle, MenuConfig, MenuPatch, MenuProvider};

fn main() {
    let provider: MenuProvider<()> = MenuProvider::new();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    for id in ["m1", "m2"] {
        let (shown, hidden, cleared) = (log.clone(), log.clone(), log.clone());
        provider.set_config(
            id,
            MenuConfig::default().with_lifecycle(
                Lifecycle::new()
                    .on_show(move |_| shown.borrow_mut().push(format!("{id}.onShow")))
                    .on_hide(move |_| hidden.borrow_mut().push(format!("{id}.onHide")))
                    .on_clear(move |_| cleared.borrow_mut().push(format!("{id}.onClear"))),
            ),
        );
    }

    let m1 = provider.menu("m1");
    let m2 = provider.menu("m2");

    m1.show_with(MenuPatch::new().position((10.0, 20.0)));
    println!("== show m1 ==\n  active: {:?}", provider.active_id());
    assert!(m1.is_active());
    assert_eq!(m1.position(), Some(Point::new(10.0, 20.0)));

    m2.show();
    println!("== show m2 ==\n  active: {:?}", provider.active_id());
    assert!(!m1.is_active());
    assert!(m2.is_active());
    println!("  log before drain: {:?}", log.borrow());
    assert!(log.borrow().is_empty());

    let ran = provider.run_pending();
    println!("  drained {ran} tasks: {:?}", log.borrow());

    m2.clear();
    provider.run_pending();
    println!("== clear m2 ==\n  config: {:?}", m2.config().map(|c| c.position));
    assert!(!m2.is_active());
    assert!(m2.config().is_none());

    let hid = provider.hide_active();
    println!("== hide active (nothing open) ==\n  hid: {hid}");
    assert!(!hid);

    assert_eq!(
        *log.borrow(),
        ["m1.onShow", "m1.onHide", "m2.onShow", "m2.onClear"]
    );
}
