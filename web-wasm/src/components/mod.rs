pub mod header;
pub mod upload_area;
pub mod model_select;
pub mod predict_button;
pub mod image_canvas;
