//! Arithmetic on fixed-size parameter vectors

/// Element-wise `a * wa + b * wb`
#[inline]
pub(super) fn scaled_add<const N: usize>(a: &[f64; N], wa: f64, b: &[f64; N], wb: f64) -> [f64; N] {
    std::array::from_fn(|j| a[j] * wa + b[j] * wb)
}

/// Mean of all vertices but the one at `skip`
pub(super) fn centroid_without<const N: usize>(vertices: &[[f64; N]], skip: usize) -> [f64; N] {
    let mut sum = [0.0; N];
    for v in vertices
        .iter()
        .enumerate()
        .filter_map(|(i, v)| (i != skip).then_some(v))
    {
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
    }
    let count = (vertices.len() - 1) as f64;
    sum.map(|s| s / count)
}
