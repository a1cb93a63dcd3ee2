// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-menu event subscriptions.
//!
//! Subscribers listen to one event of one menu without observing other menus.
//! A `once` subscription fires a single time, and handlers may drive the registry.
//!
//! Run:
//! - `cargo run -p understory_demos --example menu_events`

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use understory_channel::{SubscribeOptions, handler};
use understory_menu::{MenuEvent, MenuPatch, MenuProvider, MenuTopic};

type Data = BTreeMap<String, String>;

fn main() {
    let provider: MenuProvider<Data> = MenuProvider::new();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    let l = log.clone();
    let _first_show = provider.menu("tooltip").subscribe(
        MenuEvent::Show,
        handler(move |d: Option<&Data>| l.borrow_mut().push(format!("tooltip shown with {d:?}"))),
        SubscribeOptions::ONCE,
    );

    // Opening the details panel whenever the tooltip closes.
    let details = provider.menu("details");
    let _chain = provider.menu("tooltip").subscribe(
        MenuEvent::Hide,
        handler(move |_: Option<&Data>| details.show()),
        SubscribeOptions::default(),
    );

    let l = log.clone();
    let _updates = provider
        .subscribe_named(
            "details",
            "onShow",
            handler(move |_: Option<&Data>| l.borrow_mut().push("details shown".to_string())),
            SubscribeOptions::default(),
        )
        .unwrap_or_else(|e| panic!("valid event name: {e}"));

    match provider.subscribe_named(
        "details",
        "on Show",
        handler(|_: Option<&Data>| {}),
        SubscribeOptions::default(),
    ) {
        Ok(_) => unreachable!("separator in event name"),
        Err(e) => println!("== rejected topic ==\n  {e}"),
    }

    println!(
        "== topic text ==\n  {:?}",
        MenuTopic::new("tooltip", MenuEvent::Hide).to_text()
    );

    for round in 0..2 {
        provider.show_with(
            "tooltip",
            MenuPatch::new().data(BTreeMap::from([("round".to_string(), round.to_string())])),
        );
        provider.hide("tooltip");
        provider.run_pending();
    }

    println!("== log ==");
    for line in log.borrow().iter() {
        println!("  {line}");
    }
    assert!(provider.is_active("details"));
    assert_eq!(log.borrow().len(), 3);
}
