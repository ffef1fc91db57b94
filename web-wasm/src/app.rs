//! メインアプリケーションコンポーネント（Detection View）

use leptos::prelude::*;
use leptos::task::spawn_local;
use spike_detect_common::{DetectionState, Error, ModelChoice, Settlement};
use web_sys::File;

use crate::api::predict;
use crate::components::{
    header::Header,
    image_canvas::ImageCanvas,
    model_select::ModelSelect,
    predict_button::PredictButton,
    upload_area::UploadArea,
};
use crate::config::client_config;
use crate::intake;

/// 詳細はコンソールに出し、利用者には定型の通知を出す
fn report_error(err: &Error) {
    match err {
        Error::MissingInput => {}
        _ => gloo::console::error!(format!("Error predicting bounding boxes: {}", err)),
    }
    gloo::dialogs::alert(err.notice().message());
}

#[component]
pub fn App() -> impl IntoView {
    let config = client_config();
    let display_width = config.display_width;
    let scale_mode = config.scale_mode;

    // アプリケーション状態（スナップショットを丸ごと置き換える）
    let state = RwSignal::new(DetectionState::new());

    // 画像選択ハンドラ
    // デコードの完了順は選択順と限らないので、最後に選んだファイルだけを反映する
    let on_file_selected = move |file: File| {
        let (next, pick) = state.get_untracked().begin_pick();
        state.set(next);

        spawn_local(async move {
            let decoded = intake::read_selection(file).await;
            if !state.with_untracked(|s| s.is_latest_pick(pick)) {
                return;
            }
            match decoded {
                Ok(selection) => state.update(|s| {
                    if let Some(next) = s.select_picked_image(pick, selection) {
                        *s = next;
                    }
                }),
                Err(err) => report_error(&err),
            }
        });
    };

    // モデル選択ハンドラ
    let on_model_change = move |model: ModelChoice| {
        state.update(|s| *s = s.select_model(model));
    };

    // 推論ハンドラ
    let on_predict = move |_| {
        let current = state.get_untracked();
        let (next, request) = match current.begin_predict(config.max_upload_bytes) {
            Ok(started) => started,
            Err(err) => {
                report_error(&err);
                return;
            }
        };
        state.set(next);

        let config = config.clone();
        spawn_local(async move {
            let outcome = predict::predict(&config, &request).await;

            let mut settlement = Settlement::Stale;
            state.update(|s| {
                let (next, result) = s.settle(request.ticket, outcome);
                *s = next;
                settlement = result;
            });

            if let Settlement::Failed(err) = settlement {
                report_error(&err);
            }
        });
    };

    let model = Signal::derive(move || state.with(|s| s.model()));
    let is_pending = Signal::derive(move || state.with(|s| s.is_pending()));
    let preview = Memo::new(move |_| state.with(|s| s.selection().map(|sel| sel.preview.clone())));
    let overlay = Memo::new(move |_| state.with(|s| s.overlay(display_width, scale_mode)));

    view! {
        <div class="container">
            <Header />

            <UploadArea on_file_selected=on_file_selected />

            <ModelSelect model=model on_change=on_model_change />

            <PredictButton is_pending=is_pending on_predict=on_predict />

            <ImageCanvas preview=preview overlay=overlay display_width=display_width />
        </div>
    }
}
