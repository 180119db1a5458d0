//! Connected-component labeling and shape filtering.
//!
//! A row-major scan flood-fills every unvisited foreground pixel's
//! 4-connected region with the next label, growing the bounding box as pixels
//! are discovered. The fill runs over an explicit stack: a component can span
//! the whole image, which would overflow native recursion. Labels are 8-bit;
//! a 256th component violates the labeling invariant and aborts the run.
use crate::error::{PipelineError, MAX_COMPONENTS};
use crate::image::GrayBuffer;
use log::debug;
use serde::{Deserialize, Serialize};

/// A labeled 4-connected foreground region and its bounding box.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Component {
    pub label: u8,
    pub xmin: usize,
    pub xmax: usize,
    pub ymin: usize,
    pub ymax: usize,
}

impl Component {
    #[inline]
    pub fn width(&self) -> usize {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.ymax - self.ymin
    }
}

/// Bounding-box constraints a component must meet to survive the filter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeFilterParams {
    /// Minimum bounding-box height in pixels (exclusive).
    pub min_height: usize,
    /// Maximum width/height ratio (exclusive).
    pub max_aspect: f32,
}

impl Default for ShapeFilterParams {
    fn default() -> Self {
        Self {
            min_height: 50,
            max_aspect: 0.5,
        }
    }
}

impl ShapeFilterParams {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.max_aspect > 0.0) {
            return Err(PipelineError::InvalidParameter {
                stage: "regions",
                name: "max_aspect",
                value: f64::from(self.max_aspect),
            });
        }
        Ok(())
    }

    #[inline]
    fn keeps(&self, c: &Component) -> bool {
        c.height() > self.min_height && (c.width() as f32 / c.height() as f32) < self.max_aspect
    }
}

/// Label every maximal 4-connected foreground region of `image`.
///
/// Returns the label map (0 = background) and one component record per label,
/// ordered by label.
pub fn label(image: &GrayBuffer) -> Result<(GrayBuffer, Vec<Component>), PipelineError> {
    let mut labels = GrayBuffer::new(image.w, image.h);
    let mut components: Vec<Component> = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..image.h {
        for x in 0..image.w {
            if image.get(x, y) == 0 || labels.get(x, y) != 0 {
                continue;
            }
            if components.len() == MAX_COMPONENTS {
                return Err(PipelineError::TooManyComponents);
            }
            let id = (components.len() + 1) as u8;
            let mut component = Component {
                label: id,
                xmin: x,
                xmax: x,
                ymin: y,
                ymax: y,
            };

            stack.push((x, y));
            while let Some((px, py)) = stack.pop() {
                if image.get(px, py) == 0 || labels.get(px, py) != 0 {
                    continue;
                }
                labels.set(px, py, id);
                component.xmin = component.xmin.min(px);
                component.xmax = component.xmax.max(px);
                component.ymin = component.ymin.min(py);
                component.ymax = component.ymax.max(py);

                if px + 1 < image.w {
                    stack.push((px + 1, py));
                }
                if px > 0 {
                    stack.push((px - 1, py));
                }
                if py + 1 < image.h {
                    stack.push((px, py + 1));
                }
                if py > 0 {
                    stack.push((px, py - 1));
                }
            }
            components.push(component);
        }
    }
    debug!("labeling: {} components", components.len());
    Ok((labels, components))
}

/// Keep only components matching the shape constraints. The output grid
/// holds 255 at surviving components' pixels; the registry shrinks to the
/// survivors.
pub fn filter_by_shape(
    labels: &GrayBuffer,
    components: &[Component],
    params: &ShapeFilterParams,
) -> (GrayBuffer, Vec<Component>) {
    let mut keep = [false; 256];
    let survivors: Vec<Component> = components
        .iter()
        .filter(|c| params.keeps(c))
        .copied()
        .collect();
    for c in &survivors {
        keep[c.label as usize] = true;
    }

    let mut out = GrayBuffer::new(labels.w, labels.h);
    for y in 0..labels.h {
        for x in 0..labels.w {
            if keep[labels.get(x, y) as usize] {
                out.set(x, y, 255);
            }
        }
    }
    debug!(
        "shape filter: kept {}/{} components",
        survivors.len(),
        components.len()
    );
    (out, survivors)
}
