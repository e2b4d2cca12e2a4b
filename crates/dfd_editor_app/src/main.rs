// SPDX-License-Identifier: MIT OR Apache-2.0
//! DFD Editor - a data-flow diagram editor.
//!
//! A thin editing application on top of egui/eframe:
//! - Diagram canvas with storage, function, and input/output nodes
//! - Tool palette (create node, create edge, select/move, delete)
//! - Label-type editor and help overlay
//! - Save/load of diagrams to JSON files

mod app;
mod canvas;
mod commands;
mod panels;
mod state;
mod tools;

use app::EditorApp;

fn main() -> eframe::Result {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("dfd_editor_app=debug".parse().unwrap());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Starting DFD Editor v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("DFD Editor")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "dfd-editor",
        options,
        Box::new(|cc| Ok(Box::new(EditorApp::new(cc)))),
    )
}
