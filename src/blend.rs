//! Softening filters and the two compositing laws.
//!
//! Filters work on any 8-bit image whose pixel type has an `f32` twin, so the
//! same code blurs single-channel masks and three-channel color layers. Both
//! passes run in `f32` and the result is rounded once; borders replicate the
//! edge pixel.

use image::{GrayImage, Pixel, Rgb, RgbImage};
use imageproc::definitions::Image;
use imageproc::filter::separable_filter_equal;
use imageproc::map::{map_subpixels, ChannelMap, WithChannel};

use crate::error::{check_dimensions, Result};
use crate::types::Bgr;

/// OpenCV-compatible 1D Gaussian kernel. A non-positive `sigma` is derived
/// from the size.
pub fn gaussian_kernel(size: u32, sigma: f64) -> Vec<f64> {
    let size = size.max(1) as usize;
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let center = (size as f64 - 1.0) / 2.0;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Gaussian blur with an explicit square kernel size.
pub fn gaussian_blur<P>(image: &Image<P>, size: u32, sigma: f64) -> Image<P>
where
    P: Pixel<Subpixel = u8> + WithChannel<f32>,
    ChannelMap<P, f32>: WithChannel<u8, Pixel = P>,
{
    let kernel: Vec<f32> = gaussian_kernel(size, sigma).into_iter().map(|w| w as f32).collect();
    filter_rounded(image, &kernel)
}

/// Normalized box (mean) filter over exactly `size` taps per axis.
pub fn box_blur<P>(image: &Image<P>, size: u32) -> Image<P>
where
    P: Pixel<Subpixel = u8> + WithChannel<f32>,
    ChannelMap<P, f32>: WithChannel<u8, Pixel = P>,
{
    let size = size.max(1) as usize;
    filter_rounded(image, &vec![1.0 / size as f32; size])
}

fn filter_rounded<P>(image: &Image<P>, kernel: &[f32]) -> Image<P>
where
    P: Pixel<Subpixel = u8> + WithChannel<f32>,
    ChannelMap<P, f32>: WithChannel<u8, Pixel = P>,
{
    let wide = map_subpixels(image, f32::from);
    let filtered = separable_filter_equal(&wide, kernel);
    map_subpixels(&filtered, saturate_u8)
}

fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Solid `color` gated by `mask`: each channel is the bitwise AND of the mask
/// value with the color component.
pub fn colorize(mask: &GrayImage, color: Bgr) -> RgbImage {
    let Rgb([r, g, b]) = color.to_rgb();
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let m = mask.get_pixel(x, y)[0];
        Rgb([m & r, m & g, m & b])
    })
}

/// Linear blend `dst = dst * alpha + layer * beta`, rounded and saturated to
/// the 8-bit range. The weights are not normalized.
pub fn add_weighted(dst: &mut RgbImage, layer: &RgbImage, alpha: f64, beta: f64) -> Result<()> {
    check_dimensions(dst.dimensions(), layer.dimensions())?;
    for (d, &l) in dst.iter_mut().zip(layer.iter()) {
        *d = (*d as f64 * alpha + l as f64 * beta).round().clamp(0.0, 255.0) as u8;
    }
    Ok(())
}

/// Mask-gated XOR: where `gate` is nonzero the pixel becomes
/// `pixel ^ xor_color`; everywhere else it becomes `fill_color`.
pub fn gated_xor(dst: &mut RgbImage, gate: &GrayImage, xor_color: Bgr, fill_color: Bgr) -> Result<()> {
    check_dimensions(dst.dimensions(), gate.dimensions())?;
    let Rgb(xor) = xor_color.to_rgb();
    let fill = fill_color.to_rgb();
    for (pixel, g) in dst.pixels_mut().zip(gate.pixels()) {
        if g[0] != 0 {
            for (v, k) in pixel.0.iter_mut().zip(xor) {
                *v ^= k;
            }
        } else {
            *pixel = fill;
        }
    }
    Ok(())
}
