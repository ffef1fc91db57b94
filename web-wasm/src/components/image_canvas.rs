//! 画像プレビュー + 検出枠オーバーレイ

use leptos::prelude::*;
use spike_detect_common::OverlayRect;

#[component]
pub fn ImageCanvas(
    preview: Memo<Option<String>>,
    overlay: Memo<Vec<OverlayRect>>,
    display_width: f64,
) -> impl IntoView {
    view! {
        <Show when=move || preview.with(|p| p.is_some())>
            <div class="image-canvas">
                <img
                    src=move || preview.get().unwrap_or_default()
                    alt="Uploaded"
                    style=format!("width: {}px", display_width)
                />
                // 枠はリスト内の位置で識別する。リストが変わるたびに全て描き直す
                {move || {
                    overlay
                        .get()
                        .into_iter()
                        .map(|rect| view! { <div class="overlay-box" style=overlay_style(&rect) /> })
                        .collect_view()
                }}
            </div>
        </Show>
    }
}

/// 検出枠のスタイル（塗りなし・赤2px）
pub fn overlay_style(rect: &OverlayRect) -> String {
    format!(
        "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; border: 2px solid red;",
        rect.left, rect.top, rect.width, rect.height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_style() {
        let rect = OverlayRect {
            key: 0,
            left: 5.0,
            top: 10.0,
            width: 50.0,
            height: 100.0,
        };
        assert_eq!(
            overlay_style(&rect),
            "position: absolute; left: 5px; top: 10px; width: 50px; height: 100px; border: 2px solid red;"
        );
    }

    #[test]
    fn test_overlay_style_fractional() {
        let rect = OverlayRect {
            key: 3,
            left: 12.5,
            top: 0.25,
            width: 1.0,
            height: 2.75,
        };
        let style = overlay_style(&rect);
        assert!(style.contains("left: 12.5px"));
        assert!(style.contains("top: 0.25px"));
        assert!(style.contains("height: 2.75px"));
    }
}
