use crate::gifti::GiftiImage;

pub trait VertexColor {
    fn vertex_color_rgb(&self) -> Vec<u8>;
    fn vertex_color_rgba(&self) -> Vec<u8>;
}

/// Colors of a label overlay: the first label data array, looked up in the label table. Empty for scalar overlays.
impl VertexColor for GiftiImage {
    fn vertex_color_rgb(&self) -> Vec<u8> {
        self.label_colors(false)
    }

    fn vertex_color_rgba(&self) -> Vec<u8> {
        self.label_colors(true)
    }
}
