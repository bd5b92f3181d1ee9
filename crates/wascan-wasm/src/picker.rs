//! File selection through a hidden `<input type="file">`

use crate::utils;
use futures::{channel::oneshot, future::LocalBoxFuture};
use js_sys::Uint8Array;
use std::cell::RefCell;
use wascan_core::{ErrorCode, ImageFile, ImageSource};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Event, File, HtmlInputElement};

/// Id of the hidden file input appended to `<body>`
pub const FILE_INPUT_ID: &str = "wascan-file-input";

/// Browser file dialog
///
/// `prepare` creates the hidden input once and reuses an existing one with
/// the same id. Each pick clears the previous selection so choosing the same
/// file twice still fires `change`.
#[derive(Debug, Default)]
pub struct WebImageSource {
    input: RefCell<Option<HtmlInputElement>>,
}

impl WebImageSource {
    /// Source with no input yet
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageSource for WebImageSource {
    fn prepare(&self) -> Result<(), ErrorCode> {
        if self.input.borrow().is_some() {
            return Ok(());
        }
        let input = ensure_file_input(&utils::document()?)?;
        *self.input.borrow_mut() = Some(input);
        Ok(())
    }

    fn pick_image(&self) -> LocalBoxFuture<'_, Result<Option<ImageFile>, ErrorCode>> {
        let input = self.input.borrow().clone();
        Box::pin(async move {
            let input = input.ok_or(ErrorCode::NoFileAccess)?;
            let Some(file) = choose_file(&input).await? else {
                return Ok(None);
            };
            let bytes = read_file(&file).await?;
            Ok(Some(ImageFile::new(file.name(), file.type_(), bytes)))
        })
    }
}

fn ensure_file_input(document: &Document) -> Result<HtmlInputElement, ErrorCode> {
    if let Some(existing) = document.get_element_by_id(FILE_INPUT_ID) {
        return existing
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| ErrorCode::NoFileAccess);
    }

    let input = document
        .create_element("input")
        .ok()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .ok_or(ErrorCode::NoFileAccess)?;
    input.set_type("file");
    input.set_id(FILE_INPUT_ID);
    input.set_accept("image/*");
    input
        .set_attribute("style", "display: none;")
        .map_err(|_| ErrorCode::NoFileAccess)?;

    let body = document.body().ok_or(ErrorCode::DocumentNotFound)?;
    body.append_child(&input)
        .map_err(|_| ErrorCode::NoFileAccess)?;
    tracing::debug!("file input attached");
    Ok(input)
}

/// Dialog events that settle a pick
const SETTLE_EVENTS: [&str; 2] = ["change", "cancel"];

/// Listeners on the file input, detached on drop
///
/// A superseded pick is dropped while its dialog may still fire, so the
/// callback must leave the input before the closure is freed.
struct SettleListener {
    input: HtmlInputElement,
    callback: Closure<dyn FnMut(Event)>,
}

impl SettleListener {
    fn attach(input: &HtmlInputElement, tx: oneshot::Sender<()>) -> Result<Self, ErrorCode> {
        let mut tx = Some(tx);
        let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
        });
        let listener = Self {
            input: input.clone(),
            callback,
        };
        for event in SETTLE_EVENTS {
            input
                .add_event_listener_with_callback(event, listener.callback.as_ref().unchecked_ref())
                .map_err(|_| ErrorCode::NoFileAccess)?;
        }
        Ok(listener)
    }
}

impl Drop for SettleListener {
    fn drop(&mut self) {
        for event in SETTLE_EVENTS {
            let _ = self
                .input
                .remove_event_listener_with_callback(event, self.callback.as_ref().unchecked_ref());
        }
    }
}

/// Open the dialog and wait for `change` or `cancel`
async fn choose_file(input: &HtmlInputElement) -> Result<Option<File>, ErrorCode> {
    input.set_value("");

    let (tx, rx) = oneshot::channel::<()>();
    let listener = SettleListener::attach(input, tx)?;
    input.click();

    let settled = rx.await;
    drop(listener);

    if settled.is_err() {
        return Ok(None);
    }
    Ok(input.files().and_then(|files| files.get(0)))
}

async fn read_file(file: &File) -> Result<Vec<u8>, ErrorCode> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|error| {
            tracing::warn!(error = %utils::describe_js_error(&error), "reading file failed");
            ErrorCode::Internal
        })?;
    Ok(Uint8Array::new(&buffer).to_vec())
}
