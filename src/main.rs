#![allow(warnings)]
//! Admin Dashboard Frontend Entry Point

mod api;
mod app;
mod blob;
mod components;
mod config;
mod context;
mod error;
mod hooks;
mod list_controller;
mod modal;
mod models;
mod notify;
mod pages;
mod paging;
mod refresh;
mod search;
mod session;
mod store;

use app::App;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    let level = config::AppConfig::from_env().log_level;
    if rolling_logger::init(level, rolling_logger::DEFAULT_CAPACITY).is_err() {
        web_sys::console::warn_1(&"logger already installed".into());
    }
    expose_log_dump();
    mount_to_body(App);
}

/// `adminLogs()` in the devtools console prints the buffered log lines
fn expose_log_dump() {
    let Some(window) = web_sys::window() else { return };
    let dump = Closure::<dyn Fn() -> String>::new(|| rolling_logger::recent_lines().join("\n"));
    if js_sys::Reflect::set(&window, &"adminLogs".into(), dump.as_ref().unchecked_ref()).is_err() {
        log::warn!("[Main] could not register adminLogs()");
    }
    dump.forget();
}
