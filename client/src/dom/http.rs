use async_trait::async_trait;
use common::{ServerReply, WidgetError};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Blob, FormData, HtmlFormElement, Request, RequestInit, Response};

use crate::dom::error::{network_error, platform_error};
use crate::widget::capabilities::Transport;

/// `fetch`-based transport. Endpoints are resolved against the page URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    async fn send(&self, endpoint: &str, body: Option<&FormData>) -> Result<ServerReply, WidgetError> {
        let window = window().ok_or_else(|| WidgetError::Network("No window".to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        if let Some(body) = body {
            opts.set_body(body.as_ref());
        }

        let request = Request::new_with_str_and_init(endpoint, &opts).map_err(network_error)?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network_error)?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| WidgetError::Network("fetch resolved without a response".to_string()))?;
        log::debug!("[Http] POST {} -> {}", endpoint, resp.status());

        // error replies carry JSON too, so the status is not checked here
        let json = JsFuture::from(resp.json().map_err(network_error)?)
            .await
            .map_err(network_error)?;
        parse_reply(json)
    }
}

fn parse_reply(json: JsValue) -> Result<ServerReply, WidgetError> {
    serde_wasm_bindgen::from_value(json).map_err(|e| WidgetError::Network(e.to_string()))
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    type File = Blob;
    type Form = HtmlFormElement;

    async fn post_file(
        &self,
        endpoint: &str,
        field: &str,
        file: &Blob,
        filename: &str,
    ) -> Result<ServerReply, WidgetError> {
        let form = FormData::new().map_err(platform_error)?;
        form.append_with_blob_and_filename(field, file, filename)
            .map_err(platform_error)?;
        self.send(endpoint, Some(&form)).await
    }

    async fn post_form(&self, endpoint: &str, form: &HtmlFormElement) -> Result<ServerReply, WidgetError> {
        let data = FormData::new_with_form(form).map_err(platform_error)?;
        self.send(endpoint, Some(&data)).await
    }

    async fn post_empty(&self, endpoint: &str) -> Result<ServerReply, WidgetError> {
        self.send(endpoint, None).await
    }
}
