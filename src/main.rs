mod app;
mod config;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;


use crate::app::App;
use crate::platform::desktop::paths::default_webview_data_dir;
use crate::platform::logging::init_logging;

fn main() {
    init_logging();

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new().with_title("Delivery Prices"),
                )
                .with_data_directory(webview_data_dir),
        )
        .launch(App);
}
