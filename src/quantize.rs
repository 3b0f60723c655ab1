use crate::bitmap::{Bitmap, Rgb8};
use crate::state::ChannelState;

/// Clamp to `[0, 255]` and truncate towards zero.
pub fn quantize(value: f32) -> u8 {
    if value < 0.0 {
        0
    } else if value > 255.0 {
        255
    } else {
        value as u8
    }
}

pub fn quantize_cell(state: &ChannelState, i: usize) -> Rgb8 {
    let [r, g, b] = state.cell(i);
    [quantize(r), quantize(g), quantize(b)]
}

/// Overwrite every pixel of `out` with the quantized current state.
pub fn quantize_into(state: &ChannelState, out: &mut Bitmap) {
    assert_eq!(state.total_cells(), out.pixels().len());

    for (i, pixel) in out.pixels_mut().iter_mut().enumerate() {
        *pixel = quantize_cell(state, i);
    }
}
