use pole_detector::image::GrayBuffer;
use pole_detector::{PoleDetector, PoleParams};

fn main() {
    // Demo stub: runs the detector on a synthetic pole-like scene.
    let (w, h) = (96usize, 96usize);
    let mut gray = GrayBuffer::new(w, h);
    for y in 0..h {
        for x in 40..46 {
            gray.set(x, y, 220);
        }
    }

    let detector = match PoleDetector::new(PoleParams::default()) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    match detector.process(&gray) {
        Ok(report) => println!(
            "pairs={} components={} latency_ms={:.3}",
            report.pairs.len(),
            report.components.len(),
            report.trace.timing.total_ms
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
