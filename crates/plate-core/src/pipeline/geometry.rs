//! Derivative geometry: output dimensions and the equivalent ffmpeg filter graphs.
//!
//! The pure functions here are what the native backend executes and what the
//! ffmpeg filter expressions compute, so both backends agree on every size.

/// Dimensions of a width-targeted primary.
///
/// Never upscales: a source narrower than `target_width` keeps its width.
/// Height follows the aspect ratio and is rounded down to an even number
/// (minimum 2).
pub fn primary_dimensions(src_width: u32, src_height: u32, target_width: u32) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (0, 0);
    }
    let width = src_width.min(target_width);
    let exact = (width as u64 * src_height as u64) / src_width as u64;
    let height = ((exact as u32) & !1).max(2);
    (width, height)
}

/// Intermediate size for a square thumbnail: the shorter side becomes `size`,
/// the longer side scales proportionally and is never shorter than `size`.
pub fn thumbnail_scale(src_width: u32, src_height: u32, size: u32) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (size, size);
    }
    let scale_long = |long: u32, short: u32| -> u32 {
        let scaled = (long as u64 * size as u64 + short as u64 / 2) / short as u64;
        (scaled as u32).max(size)
    };
    if src_width > src_height {
        (scale_long(src_width, src_height), size)
    } else {
        (size, scale_long(src_height, src_width))
    }
}

/// Top-left corner of a centred `size`×`size` crop.
pub fn centre_crop_origin(width: u32, height: u32, size: u32) -> (u32, u32) {
    (
        width.saturating_sub(size) / 2,
        height.saturating_sub(size) / 2,
    )
}

/// ffmpeg filter graph for a centre-cropped square thumbnail.
///
/// Scale and crop run in one graph; the branch on which side is shorter is
/// evaluated by ffmpeg against the real input dimensions.
pub fn thumbnail_filter(size: u32) -> String {
    format!(
        "scale=w='if(gt(iw,ih),-1,{size})':h='if(gt(iw,ih),{size},-1)':flags=lanczos,crop={size}:{size}"
    )
}

/// ffmpeg filter graph for a width-targeted primary with even height
/// (minimum 2, matching [`primary_dimensions`]).
pub fn primary_filter(width: u32) -> String {
    format!("scale=w='min({width},iw)':h='max(2,trunc(ow/a/2)*2)':flags=lanczos")
}
