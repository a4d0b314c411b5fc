//! Per-pixel channel packing
//!
//! Each output channel runs the same steps: load, invert (optional), pick
//! one input channel, combine. Sources are resized to the dimensions of the
//! first available source.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, Rgba32FImage};

use super::settings::Channel;

/// One prepared source feeding an output channel
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub image: &'a Rgba32FImage,
    /// Channel read from `image`
    pub channel: Channel,
    pub invert: bool,
}

/// Combine up to four layers into one RGBA image
///
/// `layers` is indexed by output channel (R, G, B, A). Returns `None` when
/// every layer is missing.
#[must_use]
pub fn pack_channels(layers: [Option<Layer<'_>>; 4]) -> Option<Rgba32FImage> {
    let (width, height) = layers.iter().flatten().next()?.image.dimensions();

    let planes = layers.map(|layer| layer.map(|l| extract(l, width, height)));

    Some(ImageBuffer::from_fn(width, height, |x, y| {
        let i = pixel_index(x, y, width);
        let mut px = [0.0; 4];
        for (output, plane) in Channel::ALL.into_iter().zip(&planes) {
            px[output.index()] = plane.as_ref().map_or(output.fill_value(), |p| p[i]);
        }
        Rgba(px)
    }))
}

/// Single channel of a layer as a row-major plane of `width * height` values
/// Offset of pixel `(x, y)` in a row-major plane
fn pixel_index(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

fn extract(layer: Layer<'_>, width: u32, height: u32) -> Vec<f32> {
    let resized;
    let image = if layer.image.dimensions() == (width, height) {
        layer.image
    } else {
        resized = imageops::resize(layer.image, width, height, FilterType::Triangle);
        &resized
    };

    let index = layer.channel.index();
    image
        .pixels()
        .map(|p| {
            let v = p.0[index];
            if layer.invert { 1.0 - v } else { v }
        })
        .collect()
}
