#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use dirpane::app::{self, events::UserEvent, Controller};
use dirpane::config::AppConfig;
use dirpane::core::{DirectoryEnumerator, FsEnumerator};
use dirpane::web_assets;
use std::path::PathBuf;
use std::sync::Arc;
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use tracing_subscriber::EnvFilter;
use wry::WebViewBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Could not load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    let start_dir = config.resolve_start_directory(std::env::args_os().nth(1).map(PathBuf::from));
    tracing::info!("Starting in {:?}", start_dir);

    // Create the event loop and window
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let (width, height) = config.window_size;

    let window = WindowBuilder::new()
        .with_title(format!("dirpane - {}", start_dir.display()))
        .with_inner_size(tao::dpi::LogicalSize::new(width, height))
        .with_min_inner_size(tao::dpi::LogicalSize::new(480, 320))
        .build(&event_loop)
        .context("Failed to build window")?;

    // The enumerator is the only filesystem service; everything that lists
    // directories receives this one instance.
    let proxy = event_loop.create_proxy();
    let enumerator: Arc<dyn DirectoryEnumerator> =
        Arc::new(FsEnumerator::new(config.show_hidden_files));
    let mut controller = Controller::new(
        config,
        &start_dir,
        enumerator,
        proxy.clone(),
        tokio::runtime::Handle::current(),
    );

    let ipc_proxy = proxy.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(&message, &ipc_proxy);
    };

    let webview = WebViewBuilder::new(&window)
        .with_custom_protocol(web_assets::PROTOCOL.to_string(), move |request| {
            web_assets::respond(request.uri().path())
        })
        .with_url(&web_assets::entry_url())
        .with_ipc_handler(ipc_handler)
        .with_devtools(cfg!(debug_assertions))
        .build()
        .context("Failed to build WebView")?;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Application initialized.");
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                tracing::info!("Close requested. Exiting.");
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(user_event) => {
                if let Some(ui_state) = controller.handle_user_event(user_event) {
                    app::render_ui_state(&webview, &ui_state);
                }
            }
            _ => (),
        }
    });
}
