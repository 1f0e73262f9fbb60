// JNI bridge to the host activity.
//
// The activity exposes `launchImagePickerMulti()` and `launchCamera()` plus
// static result slots (`getLastPhotoPaths`, `getLastPhotoPath`,
// `getLastError`, `clearLastError`) that are polled until the user finishes.

use image::DynamicImage;
use jni::objects::{JClass, JObject, JString, JValue};
use jni::JNIEnv;
use ndk_context::android_context;
use std::path::PathBuf;
use std::time::Duration;

use super::{poll_attempts, CancelFlag, PickerError, TempFrameFile};
use crate::camera::{CameraDevice, CameraStream};
use crate::error::CameraError;
use crate::models::CaptureConfig;

const DEFAULT_MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const POLL_ATTEMPTS: u32 = 600;

/// Fully qualified activity class in slash format
#[derive(Debug, Clone)]
pub struct AndroidPickerConfig {
    pub main_activity_class: String,
}

impl Default for AndroidPickerConfig {
    fn default() -> Self {
        Self {
            main_activity_class: DEFAULT_MAIN_ACTIVITY_CLASS.to_string(),
        }
    }
}

fn jni_err(context: &str) -> impl Fn(jni::errors::Error) -> PickerError + '_ {
    move |e| PickerError::PermissionDenied(format!("{} failed: {}", context, e))
}

fn app_class_loader<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>, PickerError> {
    let at_cls = env
        .find_class("android/app/ActivityThread")
        .map_err(jni_err("ActivityThread lookup"))?;
    let at = env
        .call_static_method(
            &at_cls,
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .and_then(|v| v.l())
        .map_err(jni_err("currentActivityThread"))?;
    let app = env
        .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
        .and_then(|v| v.l())
        .map_err(jni_err("getApplication"))?;

    let context = if app.is_null() {
        env.call_method(&at, "getSystemContext", "()Landroid/app/ContextImpl;", &[])
            .and_then(|v| v.l())
            .map_err(jni_err("getSystemContext"))?
    } else {
        app
    };

    env.call_method(&context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
        .map_err(jni_err("getClassLoader"))
}

fn activity_instance<'a>(
    env: &mut JNIEnv<'a>,
    config: &AndroidPickerConfig,
) -> Result<(JObject<'a>, JClass<'a>), PickerError> {
    let loader = app_class_loader(env)?;
    let name: JString = env
        .new_string(config.main_activity_class.replace('/', "."))
        .map_err(jni_err("new_string"))?;
    let cls = JClass::from(
        env.call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&JObject::from(name))],
        )
        .and_then(|v| v.l())
        .map_err(jni_err("ClassLoader.loadClass"))?,
    );

    let signature = format!("()L{};", config.main_activity_class);
    let instance = match env
        .call_static_method(&cls, "getInstance", &signature, &[])
        .and_then(|v| v.l())
    {
        Ok(instance) => instance,
        Err(_) => {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            let companion_sig = format!("L{}$Companion;", config.main_activity_class);
            let companion = env
                .get_static_field(&cls, "Companion", &companion_sig)
                .and_then(|v| v.l())
                .map_err(jni_err("Companion field"))?;
            if companion.is_null() {
                return Err(PickerError::PermissionDenied(
                    "MainActivity.Companion is null, activity not initialized?".to_string(),
                ));
            }
            env.call_method(&companion, "getInstance", &signature, &[])
                .and_then(|v| v.l())
                .map_err(jni_err("Companion.getInstance"))?
        }
    };

    if instance.is_null() {
        return Err(PickerError::PermissionDenied(
            "MainActivity instance is null, activity not initialized?".to_string(),
        ));
    }
    Ok((instance, cls))
}

fn read_static_string(
    env: &mut JNIEnv<'_>,
    cls: &JClass<'_>,
    getter: &str,
) -> Result<Option<String>, PickerError> {
    let Ok(value) = env.call_static_method(cls, getter, "()Ljava/lang/String;", &[]) else {
        return Ok(None);
    };
    let Ok(obj) = value.l() else {
        return Ok(None);
    };
    if obj.is_null() {
        return Ok(None);
    }
    let text: String = env
        .get_string(&JString::from(obj))
        .map_err(jni_err("String conversion"))?
        .into();
    Ok(Some(text))
}

/// Launches `launcher` on the activity and polls `result_getter` until the
/// user is done, an error is reported, `cancel` fires or `attempts` rounds pass
fn run_activity(
    config: &AndroidPickerConfig,
    launcher: &str,
    result_getter: &str,
    attempts: u32,
    cancel: &CancelFlag,
) -> Result<String, PickerError> {
    let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
    let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }.map_err(jni_err("JavaVM"))?;
    let mut env = vm.attach_current_thread().map_err(jni_err("JNI attach"))?;

    let (activity, cls) = activity_instance(&mut env, config)?;
    env.call_static_method(&cls, "clearLastError", "()V", &[])
        .map_err(jni_err("clearLastError"))?;
    env.call_method(&activity, launcher, "()V", &[])
        .map_err(jni_err(launcher))?;

    for _ in 0..attempts {
        std::thread::sleep(POLL_INTERVAL);
        if cancel.is_cancelled() {
            return Err(PickerError::Cancelled(format!("{}: caller gave up", launcher)));
        }
        if let Some(result) = read_static_string(&mut env, &cls, result_getter)? {
            if !result.trim().is_empty() {
                return Ok(result);
            }
        }
        if let Some(err) = read_static_string(&mut env, &cls, "getLastError")? {
            return Err(PickerError::PermissionDenied(err));
        }
    }

    Err(PickerError::Timeout(format!("{}: no result", launcher)))
}

pub fn pick_images(config: &AndroidPickerConfig) -> Result<Vec<PathBuf>, PickerError> {
    let combined = run_activity(
        config,
        "launchImagePickerMulti",
        "getLastPhotoPaths",
        POLL_ATTEMPTS,
        &CancelFlag::default(),
    )?;
    Ok(combined
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Runs the system camera, polling for at most `window`
pub fn capture_photo(
    config: &AndroidPickerConfig,
    window: Duration,
    cancel: &CancelFlag,
) -> Result<PathBuf, PickerError> {
    let attempts = poll_attempts(window, POLL_INTERVAL);
    run_activity(config, "launchCamera", "getLastPhotoPath", attempts, cancel)
        .map(PathBuf::from)
}

/// System camera activity used as the capture device
///
/// Acquisition runs the camera activity; the stream then serves the frame the
/// user took. Stopping deletes the temporary file the activity wrote, and so
/// does dropping the stream.
///
/// The activity picks the sensor itself, so `CaptureConfig::facing` is only
/// logged and never forwarded.
#[derive(Debug, Default, Clone)]
pub struct AndroidCamera {
    pub picker: AndroidPickerConfig,
}

pub struct AndroidFrameStream {
    file: TempFrameFile,
    frame: DynamicImage,
}

impl CameraStream for AndroidFrameStream {
    async fn grab_frame(&mut self) -> Result<DynamicImage, CameraError> {
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.file.remove();
    }
}

impl Drop for AndroidFrameStream {
    fn drop(&mut self) {
        self.stop();
    }
}

impl CameraDevice for AndroidCamera {
    type Stream = AndroidFrameStream;

    async fn acquire(&self, config: &CaptureConfig) -> Result<AndroidFrameStream, CameraError> {
        log::debug!(
            "Launching system camera, requested {:?} sensor is left to the activity",
            config.facing
        );
        let picker = self.picker.clone();
        let window = config.acquire_timeout();
        let cancel = CancelFlag::default();
        let poller = cancel.clone();
        // Dropped when the session's timeout abandons this future
        let _waiting = cancel.guard();

        tokio::task::spawn_blocking(move || -> Result<AndroidFrameStream, CameraError> {
            let path = capture_photo(&picker, window, &poller)?;
            let file = TempFrameFile::new(path.clone());
            if poller.is_cancelled() {
                // `file` drops here and takes the photo with it
                let late = PickerError::Cancelled("camera result arrived late".to_string());
                return Err(late.into());
            }
            let frame = image::open(&path)
                .map_err(|e| CameraError::Frame(format!("Failed to load frame: {}", e)))?;
            Ok(AndroidFrameStream { file, frame })
        })
        .await
        .map_err(|e| CameraError::Unavailable(format!("Task join error: {}", e)))?
    }
}
