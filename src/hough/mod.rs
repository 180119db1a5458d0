//! Hough line voting, line geometry and pole-candidate pairing.
//!
//! `space` turns a binary edge map into polar lines through an accumulator
//! restricted to a near-vertical angular window. `lines` converts polar lines
//! to slope/intercept form and owns the rounded equality and guarded
//! divisions every later comparison uses. `pairing` selects the pairs of
//! lines that bound one pole candidate and crops images to their inside.

pub mod lines;
pub mod pairing;
pub mod space;

pub use lines::{intersection, to_cartesian, CartesianLine, DisplayTag};
pub use pairing::{
    assign_display_tags, crop_to_inside_pairs, find_pairs, find_rough_pairs, LinePair,
};
pub use space::{find_lines, HoughLines, HoughParams, PolarLine};
