/// Fixed-point volume, thousandths of a volume unit.
pub type Load = u64;

const FIXED_POINT_SCALE: f64 = 1000.0;

pub fn to_fixed_point(value: f64) -> Load {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }

    (value * FIXED_POINT_SCALE).round() as Load
}

pub fn from_fixed_point(load: Load) -> f64 {
    load as f64 / FIXED_POINT_SCALE
}
