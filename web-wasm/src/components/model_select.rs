//! モデル選択コンポーネント

use leptos::prelude::*;
use spike_detect_common::ModelChoice;

#[component]
pub fn ModelSelect<F>(model: Signal<ModelChoice>, on_change: F) -> impl IntoView
where
    F: Fn(ModelChoice) + 'static + Clone,
{
    view! {
        <div class="form-group">
            <label for="model">"Select a Model:"</label>
            <select
                id="model"
                prop:value=move || model.get().as_str()
                on:change=move |ev| {
                    if let Ok(choice) = event_target_value(&ev).parse::<ModelChoice>() {
                        on_change(choice);
                    }
                }
            >
                {ModelChoice::ALL
                    .into_iter()
                    .map(|choice| {
                        view! {
                            <option
                                value=choice.as_str()
                                selected=move || model.get() == choice
                            >
                                {choice.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}
