use crate::camera::{new_capture, pick_gallery_files, AppCapture};
use crate::components::upload_actions::{ActionSheet, AddPhotosButton, CameraModal, PhotoGrid};
use crate::config::AppConfig;
use crate::models::ReportForm;
use crate::services::HttpReportSubmitter;
use crate::Screen;
use dioxus::prelude::*;
use media_capture::{HttpMediaUploader, Notice, UploadCoordinator, MAX_ITEMS};
use std::rc::Rc;
use tokio::sync::Mutex;

/// Everything one open report form needs
#[derive(Clone)]
struct FormSession {
    capture: Rc<Mutex<AppCapture>>,
    coordinator: UploadCoordinator<HttpMediaUploader>,
    submitter: Rc<HttpReportSubmitter>,
}

fn open_session(
    config: &AppConfig,
    mut notice: Signal<Option<Notice>>,
    mut revision: Signal<u64>,
) -> Result<FormSession, String> {
    let (capture, mut notices) = new_capture(config).map_err(|e| e.user_message())?;
    let submitter = HttpReportSubmitter::new(config).map_err(|e| e.user_message())?;
    let coordinator = capture.coordinator().clone();

    spawn(async move {
        while let Some(n) = notices.recv().await {
            notice.set(Some(n));
        }
    });

    let mut changes = coordinator.subscribe();
    spawn(async move {
        while changes.changed().await.is_ok() {
            let current = *changes.borrow_and_update();
            revision.set(current);
        }
    });

    Ok(FormSession {
        capture: Rc::new(Mutex::new(capture)),
        coordinator,
        submitter: Rc::new(submitter),
    })
}

#[component]
pub fn NewReportScreen(on_navigate: EventHandler<Screen>) -> Element {
    let config = use_context::<AppConfig>();
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut tags = use_signal(String::new);
    let mut lat = use_signal(String::new);
    let mut lng = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let notice = use_signal(|| None::<Notice>);
    let revision = use_signal(|| 0u64);
    let mut show_actions = use_signal(|| false);
    let mut camera_open = use_signal(|| false);

    let session = use_hook(|| open_session(&config, notice, revision));

    // Leaving the screen ends the session without submitting
    let on_leave = session.clone();
    use_drop(move || {
        if let Ok(s) = &on_leave {
            s.coordinator.abandon();
        }
    });

    let session = match session {
        Ok(session) => session,
        Err(msg) => {
            return rsx! {
                div { style: "padding: 16px; max-width: 600px; margin: 0 auto;",
                    div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; border-radius: 8px; font-size: 14px;",
                        "⚠️ {msg}"
                    }
                }
            };
        }
    };

    // Re-render on every coordinator change
    let _ = revision();
    let coordinator = session.coordinator.clone();
    let uploading = coordinator.is_uploading();
    let submitting = coordinator.is_submitting();
    let items = coordinator.views();
    let count = items.len();

    let open_menu = {
        let capture = session.capture.clone();
        move |_: ()| {
            let capture = capture.clone();
            spawn(async move {
                let opened = capture.lock().await.open_menu();
                show_actions.set(opened);
            });
        }
    };

    let take_photo = {
        let capture = session.capture.clone();
        move |_: ()| {
            show_actions.set(false);
            let capture = capture.clone();
            spawn(async move {
                let started = capture.lock().await.take_photo().await;
                camera_open.set(started.is_ok());
            });
        }
    };

    let choose_from_gallery = {
        let capture = session.capture.clone();
        move |_: ()| {
            show_actions.set(false);
            let capture = capture.clone();
            spawn(async move {
                capture.lock().await.close_menu();
                match pick_gallery_files().await {
                    Ok(files) if files.is_empty() => {}
                    Ok(files) => {
                        if let Err(e) = capture.lock().await.choose_from_gallery(files).await {
                            log::debug!("Gallery batch not added: {}", e);
                        }
                    }
                    Err(e) => {
                        log::warn!("Gallery picker failed: {}", e);
                        error.set(Some(e.user_message()));
                    }
                }
            });
        }
    };

    let close_menu = {
        let capture = session.capture.clone();
        move |_: ()| {
            show_actions.set(false);
            let capture = capture.clone();
            spawn(async move {
                capture.lock().await.close_menu();
            });
        }
    };

    let capture_photo = {
        let capture = session.capture.clone();
        move |_: ()| {
            let capture = capture.clone();
            spawn(async move {
                if let Err(e) = capture.lock().await.capture().await {
                    log::debug!("Captured photo not added: {}", e);
                }
                camera_open.set(false);
            });
        }
    };

    let cancel_camera = {
        let capture = session.capture.clone();
        move |_: ()| {
            let capture = capture.clone();
            spawn(async move {
                capture.lock().await.cancel_camera();
                camera_open.set(false);
            });
        }
    };

    let remove_photo = {
        let coordinator = coordinator.clone();
        move |index: usize| {
            coordinator.remove(index);
        }
    };

    let handle_submit = {
        let coordinator = coordinator.clone();
        let submitter = session.submitter.clone();
        move |_: MouseEvent| {
            error.set(None);
            let form = ReportForm {
                title: title(),
                description: description(),
                tags: tags(),
                lat: lat(),
                lng: lng(),
            };
            if let Err(e) = form.validate() {
                error.set(Some(e.user_message()));
                return;
            }

            let coordinator = coordinator.clone();
            let submitter = submitter.clone();
            spawn(async move {
                match coordinator.submit(form.to_fields(), submitter.as_ref()).await {
                    Ok(count) => {
                        log::info!("Report created with {} photo(s)", count);
                        title.set(String::new());
                        description.set(String::new());
                        tags.set(String::new());
                        lat.set(String::new());
                        lng.set(String::new());
                    }
                    Err(e) => log::warn!("Report not created: {}", e),
                }
            });
        }
    };

    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",

            div { style: "display: flex; align-items: center; margin-bottom: 24px;",
                button {
                    class: "btn-secondary",
                    style: "margin-right: 12px; padding: 8px 16px;",
                    disabled: submitting,
                    onclick: move |_| on_navigate.call(Screen::Home),
                    "← Back"
                }
                h1 { style: "color: #0066cc; font-size: 24px; font-weight: 700; margin: 0;",
                    "New Report"
                }
            }

            if let Some(err) = error() {
                div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                    "⚠️ {err}"
                }
            }

            if let Some(n) = notice() {
                if n.is_error() {
                    div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                        "⚠️ {n.message()}"
                    }
                } else {
                    div { style: "background: #efe; border: 1px solid #cfc; color: #3a3; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                        "✅ {n.message()}"
                    }
                }
            }

            div { class: "card",

                div { style: "margin-bottom: 20px;",
                    label { style: "display: block; margin-bottom: 6px; font-weight: 600; color: #333; font-size: 14px;",
                        "Title *"
                    }
                    input {
                        r#type: "text",
                        class: "input",
                        placeholder: "Enter report title",
                        value: "{title}",
                        oninput: move |e| title.set(e.value()),
                    }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: "display: block; margin-bottom: 6px; font-weight: 600; color: #333; font-size: 14px;",
                        "Description *"
                    }
                    textarea {
                        class: "input",
                        rows: "3",
                        placeholder: "Describe the report",
                        value: "{description}",
                        oninput: move |e| description.set(e.value()),
                    }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: "display: block; margin-bottom: 6px; font-weight: 600; color: #333; font-size: 14px;",
                        "Gallery Photos (max {MAX_ITEMS})"
                    }
                    AddPhotosButton { count, uploading, on_open: open_menu }
                    PhotoGrid { items, on_remove: remove_photo }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: "display: block; margin-bottom: 6px; font-weight: 600; color: #333; font-size: 14px;",
                        "Tags (comma separated)"
                    }
                    input {
                        r#type: "text",
                        class: "input",
                        placeholder: "e.g. burglary, theft",
                        value: "{tags}",
                        oninput: move |e| tags.set(e.value()),
                    }
                }

                div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 12px; margin-bottom: 20px;",
                    input {
                        r#type: "text",
                        class: "input",
                        placeholder: "Latitude",
                        value: "{lat}",
                        oninput: move |e| lat.set(e.value()),
                    }
                    input {
                        r#type: "text",
                        class: "input",
                        placeholder: "Longitude",
                        value: "{lng}",
                        oninput: move |e| lng.set(e.value()),
                    }
                }

                button {
                    class: "btn-primary",
                    style: "width: 100%; padding: 14px;",
                    disabled: uploading || submitting,
                    onclick: handle_submit,
                    if submitting {
                        "⏳ Creating Report..."
                    } else {
                        "Create Report"
                    }
                }
            }

            if camera_open() {
                CameraModal { uploading, on_capture: capture_photo, on_cancel: cancel_camera }
            } else if show_actions() {
                ActionSheet {
                    on_camera: take_photo,
                    on_gallery: choose_from_gallery,
                    on_cancel: close_menu,
                }
            }
        }
    }
}
