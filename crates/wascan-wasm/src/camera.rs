//! Camera capture through `getUserMedia` and an offscreen canvas
//!
//! Frames are sampled once per animation frame: the video is drawn onto a
//! hidden canvas, read back as RGBA and converted to luma.

use crate::utils;
use futures::future::LocalBoxFuture;
use js_sys::{Object, Promise, Reflect};
use wascan_core::{CameraSource, ErrorCode, FrameStream, LumaFrame};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, Window,
};

/// Rear-facing camera bound to a `<video>` element by id
#[derive(Debug, Clone, Copy, Default)]
pub struct WebCameraSource;

impl CameraSource for WebCameraSource {
    fn prepare(&self) -> Result<(), ErrorCode> {
        let window = utils::window()?;
        window.document().ok_or(ErrorCode::DocumentNotFound)?;
        window
            .navigator()
            .media_devices()
            .map_err(|_| ErrorCode::NoMedia)?;
        Ok(())
    }

    fn open<'a>(
        &'a self,
        target: &'a str,
    ) -> LocalBoxFuture<'a, Result<Box<dyn FrameStream>, ErrorCode>> {
        Box::pin(async move {
            let window = utils::window()?;
            let document = window.document().ok_or(ErrorCode::DocumentNotFound)?;
            let video = document
                .get_element_by_id(target)
                .and_then(|element| element.dyn_into::<HtmlVideoElement>().ok())
                .ok_or(ErrorCode::InvalidVideoElementId)?;

            let stream = request_camera(&window).await?;
            let frames = WebFrameStream::attach(window, &document, video, stream)?;
            tracing::debug!(surface = target, "camera attached");
            Ok(Box::new(frames) as Box<dyn FrameStream>)
        })
    }
}

async fn request_camera(window: &Window) -> Result<MediaStream, ErrorCode> {
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| ErrorCode::NoMedia)?;

    let video = Object::new();
    Reflect::set(
        &video,
        &JsValue::from_str("facingMode"),
        &JsValue::from_str("environment"),
    )
    .map_err(|_| ErrorCode::Internal)?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video.into());

    let request = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|_| ErrorCode::NoMedia)?;
    let stream = JsFuture::from(request).await.map_err(|error| {
        let code = media_error(&error);
        tracing::debug!(%code, error = %utils::describe_js_error(&error), "getUserMedia rejected");
        code
    })?;
    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| ErrorCode::NoMedia)
}

/// Map a `getUserMedia` rejection to a catalog code
fn media_error(error: &JsValue) -> ErrorCode {
    let name = Reflect::get(error, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string());
    match name.as_deref() {
        Some("NotAllowedError" | "PermissionDeniedError") => ErrorCode::NoPermission,
        _ => ErrorCode::NoMedia,
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Some(track) = track.dyn_ref::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Live camera feed sampled through a hidden canvas
#[derive(Debug)]
pub struct WebFrameStream {
    window: Window,
    video: HtmlVideoElement,
    stream: MediaStream,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    closed: bool,
}

impl WebFrameStream {
    fn attach(
        window: Window,
        document: &Document,
        video: HtmlVideoElement,
        stream: MediaStream,
    ) -> Result<Self, ErrorCode> {
        let surface = match Self::canvas(document) {
            Ok(surface) => surface,
            Err(code) => {
                stop_tracks(&stream);
                return Err(code);
            }
        };
        let (canvas, context) = surface;

        video.set_src_object(Some(&stream));
        video.set_muted(true);
        if let Err(error) = video.play() {
            tracing::debug!(error = %utils::describe_js_error(&error), "video.play() failed");
        }

        Ok(Self {
            window,
            video,
            stream,
            canvas,
            context,
            closed: false,
        })
    }

    fn canvas(
        document: &Document,
    ) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), ErrorCode> {
        let canvas = document
            .create_element("canvas")
            .ok()
            .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(ErrorCode::Internal)?;

        let options = Object::new();
        Reflect::set(
            &options,
            &JsValue::from_str("willReadFrequently"),
            &JsValue::TRUE,
        )
        .map_err(|_| ErrorCode::Internal)?;

        let context = canvas
            .get_context_with_context_options("2d", &options)
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(ErrorCode::Internal)?;
        Ok((canvas, context))
    }

    /// Draw the current video frame and read it back. `None` skips the frame.
    fn grab(&self, width: u32, height: u32, captured_at_ms: u64) -> Option<LumaFrame> {
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }

        if let Err(error) = self
            .context
            .draw_image_with_html_video_element(&self.video, 0.0, 0.0)
        {
            tracing::debug!(error = %utils::describe_js_error(&error), "drawImage failed");
            return None;
        }
        let data = self
            .context
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .ok()?;

        LumaFrame::from_rgba(width, height, &data.data(), captured_at_ms)
            .map_err(|error| tracing::debug!(%error, "dropping malformed frame"))
            .ok()
    }
}

impl FrameStream for WebFrameStream {
    fn next_frame(&mut self) -> LocalBoxFuture<'_, Option<Result<LumaFrame, ErrorCode>>> {
        Box::pin(async move {
            loop {
                if self.closed || !self.stream.active() {
                    return None;
                }

                let timestamp = match next_animation_frame(&self.window).await {
                    Ok(timestamp) => timestamp,
                    Err(code) => return Some(Err(code)),
                };

                let (width, height) = (self.video.video_width(), self.video.video_height());
                if width == 0 || height == 0 {
                    continue;
                }
                if let Some(frame) = self.grab(width, height, timestamp as u64) {
                    return Some(Ok(frame));
                }
            }
        })
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        stop_tracks(&self.stream);
        self.video.set_src_object(None);
        tracing::debug!("camera released");
    }
}

impl Drop for WebFrameStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolve on the next `requestAnimationFrame` tick with its timestamp
async fn next_animation_frame(window: &Window) -> Result<f64, ErrorCode> {
    let mut requested = Ok(0);
    let tick = Promise::new(&mut |resolve, _reject| {
        requested = window.request_animation_frame(&resolve);
    });
    requested.map_err(|_| ErrorCode::Internal)?;

    let timestamp = JsFuture::from(tick)
        .await
        .map_err(|_| ErrorCode::Internal)?;
    Ok(timestamp.as_f64().unwrap_or_default())
}
