//! 推論ボタンコンポーネント

use leptos::prelude::*;

/// 応答待ちでもボタンは押せる（押すたびに新しいリクエストになる）
#[component]
pub fn PredictButton<F>(is_pending: Signal<bool>, on_predict: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <button
            class="btn btn-primary"
            on:click=move |_| on_predict(())
        >
            {move || if is_pending.get() { "Predicting..." } else { "Predict" }}
        </button>
    }
}
