//! 画像ファイルの取り込み
//!
//! File → バイト列 → Data URL → <img> でデコードしてピクセルサイズを取得

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::channel::oneshot;
use spike_detect_common::{Error, ImageDimensions, ImageSelection};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlImageElement};

const FALLBACK_MIME: &str = "application/octet-stream";

/// 選択されたファイルを ImageSelection に変換
///
/// 画像としてデコードできない場合は `Error::Decode`
pub async fn read_selection(file: File) -> Result<ImageSelection, Error> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| Error::Decode(js_error(&e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let mime_type = mime_or_fallback(&file.type_());
    let preview = to_data_url(&mime_type, &bytes);
    let dimensions = decode_dimensions(&preview).await?;

    Ok(ImageSelection::new(file.name(), mime_type, bytes, dimensions, preview))
}

/// <img> に読み込ませて naturalWidth / naturalHeight を取得
async fn decode_dimensions(src: &str) -> Result<ImageDimensions, Error> {
    let image = HtmlImageElement::new().map_err(|e| Error::Decode(js_error(&e)))?;

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        }) as Box<dyn FnMut(_)>)
    };
    let onerror = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(false);
            }
        }) as Box<dyn FnMut(_)>)
    };

    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    image.set_src(src);

    let loaded = rx.await.unwrap_or(false);
    image.set_onload(None);
    image.set_onerror(None);

    if !loaded {
        return Err(Error::Decode("the file is not a decodable image".into()));
    }

    Ok(ImageDimensions::new(image.natural_width(), image.natural_height()))
}

fn mime_or_fallback(mime_type: &str) -> String {
    if mime_type.is_empty() {
        FALLBACK_MIME.to_string()
    } else {
        mime_type.to_string()
    }
}

fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

pub fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_data_url() {
        let url = to_data_url("image/png", b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_mime_fallback() {
        assert_eq!(mime_or_fallback(""), "application/octet-stream");
        assert_eq!(mime_or_fallback("image/jpeg"), "image/jpeg");
    }

    /// <img> によるデコードはブラウザ上でのみ確認できる
    #[cfg(target_arch = "wasm32")]
    mod browser {
        use super::super::*;
        use wasm_bindgen_test::*;

        wasm_bindgen_test_configure!(run_in_browser);

        // 3x2 の赤い PNG
        const PNG_3X2: &str = "iVBORw0KGgoAAAANSUhEUgAAAAMAAAACCAIAAAASFvFNAAAAEElEQVR4nGP4z8AAQQxwFgBB0gX7h/C5SAAAAABJRU5ErkJggg==";

        #[wasm_bindgen_test]
        async fn test_decode_dimensions_reads_natural_size() {
            let src = format!("data:image/png;base64,{}", PNG_3X2);
            let dimensions = decode_dimensions(&src).await.unwrap();
            assert_eq!(dimensions, ImageDimensions::new(3, 2));
        }

        #[wasm_bindgen_test]
        async fn test_decode_dimensions_rejects_non_image() {
            let src = to_data_url("image/png", b"not an image");
            let result = decode_dimensions(&src).await;
            assert!(matches!(result, Err(Error::Decode(_))));
        }
    }
}
