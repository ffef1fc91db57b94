//! 推論APIの呼び出し（fetch + FormData）
//!
//! AbortController で期限を設け、期限切れは `Error::Timeout` として返す

use gloo::timers::callback::Timeout;
use spike_detect_common::{
    parse_predict_response, BoundingBox, ClientConfig, Error, PredictRequest, FILE_FIELD,
    MODEL_FIELD,
};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, AbortSignal, Blob, BlobPropertyBag, FormData, Request, RequestInit,
    RequestMode, Response,
};

use crate::intake::js_error;

/// 推論リクエストを1回だけ送信
pub async fn predict(config: &ClientConfig, request: &PredictRequest) -> Result<Vec<BoundingBox>, Error> {
    let controller = AbortController::new().map_err(network_error)?;
    let timed_out = Rc::new(Cell::new(false));

    // 完了前にこの値が drop されるとタイマーも解除される
    let _deadline = {
        let controller = controller.clone();
        let timed_out = timed_out.clone();
        Timeout::new(deadline_millis(config.timeout_ms), move || {
            timed_out.set(true);
            controller.abort();
        })
    };

    match send(config, request, &controller.signal()).await {
        Err(_) if timed_out.get() => Err(Error::Timeout {
            timeout_ms: config.timeout_ms,
        }),
        result => result,
    }
}

async fn send(
    config: &ClientConfig,
    request: &PredictRequest,
    signal: &AbortSignal,
) -> Result<Vec<BoundingBox>, Error> {
    let form = build_form(request)?;

    // Content-Type は boundary 付きの multipart/form-data をブラウザが設定する
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);
    opts.set_signal(Some(signal));

    let fetch_request = Request::new_with_str_and_init(&config.endpoint, &opts).map_err(network_error)?;

    let window = web_sys::window().ok_or_else(|| Error::Network("window is not available".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&fetch_request))
        .await
        .map_err(network_error)?;
    let resp: Response = resp_value.dyn_into().map_err(network_error)?;

    if !resp.ok() {
        return Err(Error::HttpStatus(resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(network_error)?)
        .await
        .map_err(network_error)?;
    let body = text
        .as_string()
        .ok_or_else(|| Error::InvalidResponse("response body is not text".into()))?;

    parse_predict_response(&body)
}

fn build_form(request: &PredictRequest) -> Result<FormData, Error> {
    let form = FormData::new().map_err(network_error)?;

    let bytes = js_sys::Uint8Array::from(request.payload.as_ref());
    let parts = js_sys::Array::of1(&bytes);
    let bag = BlobPropertyBag::new();
    bag.set_type(&request.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag).map_err(network_error)?;

    form.append_with_blob_and_filename(FILE_FIELD, &blob, &request.file_name)
        .map_err(network_error)?;
    form.append_with_str(MODEL_FIELD, request.model.as_str())
        .map_err(network_error)?;

    Ok(form)
}

fn network_error(value: JsValue) -> Error {
    Error::Network(js_error(&value))
}

/// setTimeout に渡せる範囲に収める
fn deadline_millis(timeout_ms: u64) -> u32 {
    timeout_ms.min(i32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_millis_clamped() {
        assert_eq!(deadline_millis(30_000), 30_000);
        assert_eq!(deadline_millis(u64::MAX), i32::MAX as u32);
    }
}
