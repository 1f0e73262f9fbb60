use crate::config::AppConfig;
use crate::Screen;
use dioxus::prelude::*;

#[component]
pub fn HomeScreen(on_navigate: EventHandler<Screen>) -> Element {
    let config = use_context::<AppConfig>();

    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",
            h1 { style: "color: #0066cc; text-align: center; margin-bottom: 24px; margin-top: 48px; font-size: 28px; font-weight: 700;",
                "📍 Civic Report"
            }
            // Quick Actions
            div { class: "card", style: "margin-bottom: 16px;",
                h2 { style: "margin: 0 0 16px 0; font-size: 18px; color: #333;", "Report an issue" }
                button {
                    class: "btn-primary",
                    style: "width: 100%; padding: 16px; font-size: 16px; display: flex; align-items: center; justify-content: center;",
                    onclick: move |_| on_navigate.call(Screen::NewReport),
                    "📝 New report"
                }
            }

            // Info Card
            div { style: "background: #f8f9fa; padding: 16px; margin: 16px 0; border-radius: 8px; border: 1px solid #e0e0e0;",
                h3 { style: "margin: 0 0 12px 0; font-size: 14px; color: #666; font-weight: 600;",
                    "ℹ️ System-Info"
                }
                p { style: "font-size: 12px; color: #666; margin: 4px 0;",
                    "OS: {std::env::consts::OS}"
                }
                p { style: "font-size: 12px; color: #666; margin: 4px 0;",
                    "Arch: {std::env::consts::ARCH}"
                }
                p { style: "font-size: 11px; color: #888; margin: 4px 0; word-break: break-all;",
                    "Server: {config.server_url}"
                }
            }
        }
    }
}
