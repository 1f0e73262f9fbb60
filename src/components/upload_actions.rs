use dioxus::prelude::*;
use media_capture::{ItemView, MAX_ITEMS};

/// "Add photos" trigger with the current count
#[component]
pub fn AddPhotosButton(count: usize, uploading: bool, on_open: EventHandler<()>) -> Element {
    rsx! {
        button {
            r#type: "button",
            style: "width: 100%; height: 128px; border: 2px dashed #ccc; border-radius: 8px; background: #fafafa; display: flex; flex-direction: column; align-items: center; justify-content: center; color: #666;",
            disabled: uploading || count >= MAX_ITEMS,
            onclick: move |_| on_open.call(()),
            if uploading {
                span { style: "font-size: 28px;", "⏳" }
                span { style: "font-size: 14px; margin-top: 8px;", "Uploading..." }
            } else {
                span { style: "font-size: 28px;", "📤" }
                span { style: "font-size: 14px; margin-top: 8px;", "Add photos" }
                span { style: "font-size: 12px; color: #999; margin-top: 4px;",
                    "{count}/{MAX_ITEMS} photos"
                }
            }
        }
    }
}

/// Preview grid with a remove button per photo
#[component]
pub fn PhotoGrid(items: Vec<ItemView>, on_remove: EventHandler<usize>) -> Element {
    if items.is_empty() {
        return rsx! {};
    }

    // Pending photos are dimmed until their upload lands
    let tiles: Vec<(usize, ItemView, &str)> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let opacity = if item.uploaded { "1" } else { "0.5" };
            (index, item, opacity)
        })
        .collect();

    rsx! {
        div { style: "display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; margin-top: 16px;",
            for (index, item, opacity) in tiles {
                div { key: "{item.id}", style: "position: relative;",
                    img {
                        src: "{item.preview_src}",
                        alt: "preview",
                        style: "width: 100%; height: 96px; object-fit: cover; border-radius: 8px; opacity: {opacity};",
                    }
                    button {
                        r#type: "button",
                        style: "position: absolute; top: 4px; right: 4px; background: #c33; color: white; border: none; border-radius: 50%; width: 24px; height: 24px; font-size: 12px;",
                        onclick: move |_| on_remove.call(index),
                        "✕"
                    }
                }
            }
        }
    }
}

/// Bottom sheet offering camera or gallery
#[component]
pub fn ActionSheet(
    on_camera: EventHandler<()>,
    on_gallery: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.5); display: flex; align-items: flex-end; justify-content: center; z-index: 50;",
            onclick: move |_| on_cancel.call(()),
            div {
                style: "background: white; width: 100%; max-width: 480px; border-radius: 16px 16px 0 0; padding: 24px; display: flex; flex-direction: column; gap: 12px;",
                onclick: move |e| e.stop_propagation(),
                h3 { style: "margin: 0 0 8px 0; font-size: 18px; color: #333;", "Upload Photo" }
                button {
                    class: "btn-primary",
                    style: "padding: 14px; font-size: 16px;",
                    onclick: move |_| on_camera.call(()),
                    "📷 Take Photo"
                }
                button {
                    class: "btn-secondary",
                    style: "padding: 14px; font-size: 16px;",
                    onclick: move |_| on_gallery.call(()),
                    "🖼️ Choose from Gallery"
                }
                button {
                    class: "btn-secondary",
                    style: "padding: 14px; font-size: 16px;",
                    onclick: move |_| on_cancel.call(()),
                    "❌ Cancel"
                }
            }
        }
    }
}

/// Full-screen modal shown while the camera is held
#[component]
pub fn CameraModal(
    uploading: bool,
    on_capture: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { style: "position: fixed; inset: 0; background: rgba(0,0,0,0.95); display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 16px; z-index: 50; padding: 16px;",
            p { style: "color: #eee; font-size: 14px;", "Camera ready" }
            div { style: "display: flex; gap: 12px;",
                button {
                    class: "btn-primary",
                    style: "padding: 16px 32px; border-radius: 999px; font-size: 16px;",
                    disabled: uploading,
                    onclick: move |_| on_capture.call(()),
                    if uploading {
                        "⏳ Uploading..."
                    } else {
                        "📷 Capture Photo"
                    }
                }
                button {
                    class: "btn-secondary",
                    style: "padding: 16px 24px; border-radius: 999px; font-size: 16px;",
                    disabled: uploading,
                    onclick: move |_| on_cancel.call(()),
                    "✕ Cancel"
                }
            }
        }
    }
}
