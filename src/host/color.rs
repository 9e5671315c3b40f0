use rand::Rng;

/// Returns uniformly distributed integer between `min` and `max`, both inclusive
///
/// Bounds given in reverse order are swapped.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    match min <= max {
        true => rng.gen_range(min..=max),
        false => rng.gen_range(max..=min),
    }
}

/// Random color in hexadecimal notation, e.g. `#A3E12F`
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06X}", rng.gen_range(0..=0xFF_FFFFu32))
}

/// Random color in RGB notation, e.g. `rgb(123, 45, 67)`
pub fn random_rgb_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let r = random_int(rng, 0, 255);
    let g = random_int(rng, 0, 255);
    let b = random_int(rng, 0, 255);

    format!("rgb({r}, {g}, {b})")
}

/// Random color in HSL notation, e.g. `hsl(210, 100%, 50%)`
pub fn random_hsl_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let h = random_int(rng, 0, 360);
    let s = random_int(rng, 0, 100);
    let l = random_int(rng, 0, 100);

    format!("hsl({h}, {s}%, {l}%)")
}
