use pole_detector::image::GrayBuffer;

/// Two 1-px-wide vertical lines of intensity 255 on a black background.
pub fn two_vertical_lines(width: usize, height: usize, col1: usize, col2: usize) -> GrayBuffer {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(col1 < width && col2 < width, "columns must be inside the image");

    let mut img = GrayBuffer::new(width, height);
    for y in 0..height {
        img.set(col1, y, 255);
        img.set(col2, y, 255);
    }
    img
}

/// A bright vertical bar on a dim background with a deterministic ripple,
/// so gradient magnitudes vary along the boundary the way photographs do.
pub fn pole_scene(width: usize, height: usize, left: usize, right: usize) -> GrayBuffer {
    assert!(left < right && right < width, "bar must be inside the image");

    let mut img = GrayBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let base = if (left..=right).contains(&x) { 220 } else { 40 };
            let ripple = ((x * 7 + y * 13) % 5) as u8;
            img.set(x, y, base + ripple);
        }
    }
    img
}
