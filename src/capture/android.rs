//! Android audio capture using MediaRecorder
//!
//! Drives `android.media.MediaRecorder` over JNI. The application context and
//! the JavaVM come from `ndk-context`, which Tauri's Android runtime populates.

use super::platform::{select_constructor, RecorderConstructor};
use super::traits::{
    AudioEncoder, AudioSource, CaptureConfig, CaptureError, CaptureProvider, CaptureResource,
    OutputFormat,
};
use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};
use std::path::Path;
use std::sync::Arc;

const MEDIA_RECORDER_CLASS: &str = "android/media/MediaRecorder";

// MediaRecorder.AudioSource
fn audio_source_code(source: AudioSource) -> i32 {
    match source {
        AudioSource::Mic => 1,
        AudioSource::Camcorder => 5,
        AudioSource::VoiceRecognition => 6,
        AudioSource::VoiceCommunication => 7,
    }
}

// MediaRecorder.OutputFormat
fn output_format_code(format: OutputFormat) -> i32 {
    match format {
        OutputFormat::ThreeGpp => 1,
        OutputFormat::Mpeg4 => 2,
        OutputFormat::AacAdts => 6,
        OutputFormat::Ogg => 11,
    }
}

// MediaRecorder.AudioEncoder
fn audio_encoder_code(encoder: AudioEncoder) -> i32 {
    match encoder {
        AudioEncoder::AmrNb => 1,
        AudioEncoder::Aac => 3,
        AudioEncoder::HeAac => 4,
        AudioEncoder::Opus => 7,
    }
}

/// Run `f` on an attached JNI environment, mapping failures to capture errors
fn with_env<T, F>(vm: &JavaVM, f: F) -> Result<T, CaptureError>
where
    F: FnOnce(&mut JNIEnv) -> Result<T, JniError>,
{
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| CaptureError::Platform(format!("Failed to attach to JVM: {}", e)))?;

    match env.with_local_frame(16, f) {
        Ok(value) => Ok(value),
        Err(error) => Err(classify(&mut env, error)),
    }
}

/// Clear a pending Java exception and turn it into a capture error
fn classify(env: &mut JNIEnv, error: JniError) -> CaptureError {
    if !matches!(error, JniError::JavaException) {
        return CaptureError::Platform(error.to_string());
    }

    let throwable = match env.exception_occurred() {
        Ok(throwable) => throwable,
        Err(e) => return CaptureError::Platform(e.to_string()),
    };
    if let Err(e) = env.exception_clear() {
        return CaptureError::Platform(e.to_string());
    }

    let message = describe_throwable(env, &throwable);
    let is_a = |env: &mut JNIEnv, class: &str| env.is_instance_of(&throwable, class).unwrap_or(false);

    if is_a(env, "java/lang/IllegalStateException") {
        CaptureError::IllegalState(message)
    } else if is_a(env, "java/io/IOException") {
        CaptureError::DeviceUnavailable(message)
    } else {
        CaptureError::Platform(message)
    }
}

fn describe_throwable(env: &mut JNIEnv, throwable: &JObject) -> String {
    let description = match env
        .call_method(throwable, "toString", "()Ljava/lang/String;", &[])
        .and_then(|value| value.l())
    {
        Ok(description) => JString::from(description),
        Err(_) => return "unknown Java exception".to_string(),
    };

    match env.get_string(&description) {
        Ok(text) => text.into(),
        Err(_) => "unknown Java exception".to_string(),
    }
}

/// Capture provider backed by `android.media.MediaRecorder`
pub struct MediaRecorderProvider {
    vm: Arc<JavaVM>,
    context: GlobalRef,
    constructor: RecorderConstructor,
}

impl MediaRecorderProvider {
    /// Create a provider from the process-wide Android context
    pub fn from_android_context() -> Result<Self, CaptureError> {
        let ctx = ndk_context::android_context();
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
            .map_err(|e| CaptureError::Platform(format!("Failed to get JavaVM: {}", e)))?;

        let (context, api_level) = {
            let mut env = vm
                .attach_current_thread()
                .map_err(|e| CaptureError::Platform(format!("Failed to attach to JVM: {}", e)))?;

            let context = unsafe { JObject::from_raw(ctx.context().cast()) };
            let context = env
                .new_global_ref(context)
                .map_err(|e| CaptureError::Platform(format!("Failed to reference context: {}", e)))?;

            let api_level = env
                .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .and_then(|value| value.i())
                .map_err(|e| CaptureError::Platform(format!("Failed to read SDK_INT: {}", e)))?;

            (context, api_level)
        };

        let constructor = select_constructor(api_level);
        tracing::info!(
            "MediaRecorder provider ready (API level {}, {:?} constructor)",
            api_level,
            constructor
        );

        Ok(Self {
            vm: Arc::new(vm),
            context,
            constructor,
        })
    }
}

impl CaptureProvider for MediaRecorderProvider {
    fn name(&self) -> &str {
        "android-media-recorder"
    }

    fn acquire(&self) -> Result<Box<dyn CaptureResource>, CaptureError> {
        let recorder = with_env(&self.vm, |env| {
            let object = match self.constructor {
                RecorderConstructor::WithContext => env.new_object(
                    MEDIA_RECORDER_CLASS,
                    "(Landroid/content/Context;)V",
                    &[JValue::Object(self.context.as_obj())],
                )?,
                RecorderConstructor::Legacy => env.new_object(MEDIA_RECORDER_CLASS, "()V", &[])?,
            };
            env.new_global_ref(object)
        })?;

        tracing::debug!("MediaRecorder created ({:?})", self.constructor);

        Ok(Box::new(MediaRecorderResource {
            vm: Arc::clone(&self.vm),
            recorder: Some(recorder),
        }))
    }
}

/// One `MediaRecorder` instance
struct MediaRecorderResource {
    vm: Arc<JavaVM>,
    recorder: Option<GlobalRef>,
}

impl MediaRecorderResource {
    fn call(&self, method: &str, signature: &str, args: &[JValue]) -> Result<(), CaptureError> {
        let recorder = self
            .recorder
            .as_ref()
            .ok_or_else(|| CaptureError::IllegalState(format!("{} after release", method)))?;

        with_env(&self.vm, |env| {
            env.call_method(recorder, method, signature, args)?;
            Ok(())
        })
    }

    fn set_int(&self, method: &str, value: u32) -> Result<(), CaptureError> {
        let value = i32::try_from(value)
            .map_err(|_| CaptureError::Unsupported(format!("{} value {} is too large", method, value)))?;
        self.call(method, "(I)V", &[JValue::Int(value)])
    }
}

impl CaptureResource for MediaRecorderResource {
    fn configure(&mut self, config: &CaptureConfig, output: &Path) -> Result<(), CaptureError> {
        let output = output.to_str().ok_or_else(|| {
            CaptureError::Unsupported(format!("output path is not valid UTF-8: {}", output.display()))
        })?;

        self.call("setAudioSource", "(I)V", &[JValue::Int(audio_source_code(config.audio_source))])?;
        self.call("setOutputFormat", "(I)V", &[JValue::Int(output_format_code(config.output_format))])?;
        self.call("setAudioEncoder", "(I)V", &[JValue::Int(audio_encoder_code(config.audio_encoder))])?;
        self.set_int("setAudioEncodingBitRate", config.bit_rate)?;
        self.set_int("setAudioSamplingRate", config.sample_rate)?;

        let recorder = self
            .recorder
            .as_ref()
            .ok_or_else(|| CaptureError::IllegalState("configure after release".to_string()))?;

        with_env(&self.vm, |env| {
            let path = env.new_string(output)?;
            env.call_method(
                recorder,
                "setOutputFile",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&path)],
            )?;
            Ok(())
        })
    }

    fn prepare(&mut self) -> Result<(), CaptureError> {
        self.call("prepare", "()V", &[])
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        self.call("start", "()V", &[])
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.call("stop", "()V", &[])
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        let Some(recorder) = self.recorder.take() else {
            return Ok(());
        };

        with_env(&self.vm, |env| {
            env.call_method(&recorder, "release", "()V", &[])?;
            Ok(())
        })
    }
}

impl Drop for MediaRecorderResource {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("Failed to release MediaRecorder on drop: {}", e);
        }
    }
}
