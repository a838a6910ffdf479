//! Global Otsu binarization.

use marker_elements_core::GrayImage;

/// Output value for pixels above the threshold.
pub const BINARY_ON: u8 = 255;
/// Output value for pixels at or below the threshold.
pub const BINARY_OFF: u8 = 0;

pub fn histogram(data: &[u8]) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in data {
        hist[v as usize] += 1;
    }
    hist
}

/// Otsu threshold of an intensity histogram.
///
/// The returned value belongs to the lower class: pixels `> t` are "on".
/// A single-valued histogram returns that value; two occupied bins return
/// their midpoint.
pub fn otsu_threshold(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&h| h as u64).sum();
    if total == 0 {
        return 127;
    }

    let min_v = hist.iter().position(|&h| h > 0).unwrap_or(0);
    let max_v = hist.iter().rposition(|&h| h > 0).unwrap_or(255);
    if min_v == max_v {
        return min_v as u8;
    }
    let nonzero_bins = hist.iter().filter(|&&h| h > 0).count();
    if nonzero_bins <= 2 {
        return ((min_v + max_v) / 2) as u8;
    }

    let total = total as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum();

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

/// Write `src > threshold ? 255 : 0` into `out`, resizing it when needed.
pub fn threshold_binary_into(src: &GrayImage, threshold: u8, out: &mut GrayImage) {
    out.ensure_size(src.width, src.height);
    for (dst, &v) in out.data.iter_mut().zip(src.data.iter()) {
        *dst = if v > threshold { BINARY_ON } else { BINARY_OFF };
    }
}

/// Otsu-threshold `src` into `out` and return the threshold used.
pub fn binarize_otsu_into(src: &GrayImage, out: &mut GrayImage) -> u8 {
    let t = otsu_threshold(&histogram(&src.data));
    threshold_binary_into(src, t, out);
    t
}
