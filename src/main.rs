use dioxus::prelude::*;

mod camera;
mod components;
mod config;
mod error;
mod models;
mod services;

use components::{HomeScreen, NewReportScreen};
use config::AppConfig;

fn main() {
    init_logging();
    dioxus::launch(App);
}

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("civic-report"),
    );
}

#[cfg(not(target_os = "android"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Screen navigation for the app
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Home,
    NewReport,
}

#[component]
fn App() -> Element {
    use_context_provider(AppConfig::load);
    let mut current_screen = use_signal(|| Screen::Home);

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",
            div { style: "flex: 1; overflow-y: auto;",
                match current_screen() {
                    Screen::Home => rsx! {
                        HomeScreen { on_navigate: move |s| current_screen.set(s) }
                    },
                    Screen::NewReport => rsx! {
                        NewReportScreen { on_navigate: move |s| current_screen.set(s) }
                    },
                }
            }
        }
    }
}
