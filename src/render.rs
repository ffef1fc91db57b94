//! オーバーレイ画像出力
//!
//! プレビューと同じく表示幅に縮小した画像に、検出矩形の枠（赤・2px）を描く

use crate::error::{Result, SpikeDetectError};
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use spike_detect_common::{DisplayGeometry, ImageSelection, OverlayRect};
use std::path::Path;

const OUTLINE: Rgb<u8> = Rgb([255, 0, 0]);

/// 表示サイズの画像に枠を描いて保存
pub fn render_overlay(
    selection: &ImageSelection,
    geometry: &DisplayGeometry,
    rects: &[OverlayRect],
    output: &Path,
) -> Result<()> {
    let canvas = draw_overlay(selection, geometry, rects)?;
    canvas
        .save(output)
        .map_err(|e| SpikeDetectError::Render(format!("{}: {}", output.display(), e)))?;
    Ok(())
}

pub fn draw_overlay(
    selection: &ImageSelection,
    geometry: &DisplayGeometry,
    rects: &[OverlayRect],
) -> Result<RgbImage> {
    let source = image::load_from_memory(&selection.payload)
        .map_err(|e| SpikeDetectError::Render(e.to_string()))?;

    let width = geometry.display_width.round().max(1.0) as u32;
    let height = geometry.display_height.round().max(1.0) as u32;
    let mut canvas = source
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8();

    for rect in rects {
        draw_outline(&mut canvas, rect);
    }

    Ok(canvas)
}

/// 枠を描く。ラスタ化の段階でのみキャンバス内に収め、完全に外れた枠は描かない
fn draw_outline(canvas: &mut RgbImage, rect: &OverlayRect) {
    let Some(clipped) = clip_to_canvas(canvas.width(), canvas.height(), rect) else {
        return;
    };

    draw_hollow_rect_mut(canvas, clipped, OUTLINE);

    // 2本目の枠で2px幅にする
    if clipped.width() > 2 && clipped.height() > 2 {
        let inner = Rect::at(clipped.left().saturating_add(1), clipped.top().saturating_add(1))
            .of_size(clipped.width() - 2, clipped.height() - 2);
        draw_hollow_rect_mut(canvas, inner, OUTLINE);
    }
}

/// キャンバスと重なる部分の矩形。重ならなければ None
pub fn clip_to_canvas(canvas_width: u32, canvas_height: u32, rect: &OverlayRect) -> Option<Rect> {
    let left = rect.left.max(0.0);
    let top = rect.top.max(0.0);
    let right = (rect.left + rect.width.max(0.0)).min(canvas_width as f64);
    let bottom = (rect.top + rect.height.max(0.0)).min(canvas_height as f64);

    // NaN もここで落ちる
    if !(right > left && bottom > top) {
        return None;
    }

    let x = left.round() as u32;
    let y = top.round() as u32;
    let width = ((right - left).round().max(1.0) as u32).min(canvas_width.saturating_sub(x));
    let height = ((bottom - top).round().max(1.0) as u32).min(canvas_height.saturating_sub(y));

    if width == 0 || height == 0 {
        return None;
    }

    Some(Rect::at(x as i32, y as i32).of_size(width, height))
}
