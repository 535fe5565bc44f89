use crate::compositing::ObjectDepth;

/// Min-max rescales `values` into `range` using their own extremes.
///
/// If every value is the same the result is the midpoint of `range` for all
/// of them, so a single object always lands on the midpoint.
pub fn normalize_depths(values: &[f32], range: (f32, f32)) -> Vec<f32> {
    let (lo, hi) = range;
    let Some((min, max)) = min_max(values) else {
        return vec![];
    };

    let span = max - min;
    if span <= 0. || !span.is_finite() {
        let mid = lo + (hi - lo) / 2.;
        return vec![mid; values.len()];
    }

    values
        .iter()
        .map(|v| (lo + (v - min) / span * (hi - lo)).clamp(lo.min(hi), lo.max(hi)))
        .collect()
}

/// Normalizes the depths of the objects that are not excluded, in place.
pub fn normalize_objects(objects: &mut [ObjectDepth], range: (f32, f32)) {
    let values: Vec<f32> = objects
        .iter()
        .filter(|o| !o.excluded)
        .map(|o| o.depth)
        .collect();
    let normalized = normalize_depths(&values, range);

    for (obj, d) in objects.iter_mut().filter(|o| !o.excluded).zip(normalized) {
        obj.depth = d;
    }
}

fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
