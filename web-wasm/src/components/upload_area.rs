//! 画像アップロードコンポーネント

use leptos::prelude::*;
use web_sys::{File, HtmlInputElement};

#[component]
pub fn UploadArea<F>(on_file_selected: F) -> impl IntoView
where
    F: Fn(File) + 'static + Clone,
{
    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        // 複数選択されても先頭の1枚だけを使う
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_file_selected(file);
        }
    };

    view! {
        <div class="form-group">
            <label for="image-file">"Upload an Image:"</label>
            <input
                type="file"
                id="image-file"
                accept="image/*"
                on:change=on_change
            />
        </div>
    }
}
