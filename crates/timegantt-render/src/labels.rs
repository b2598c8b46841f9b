//! Greedy avoid-overlap placement for bar labels
//!
//! Each row has a few horizontal lanes. Labels are taken left to right
//! and put in the first lane whose previous label ends before this one
//! starts; a label that fits in no lane is dropped.

use std::collections::HashMap;

/// Horizontal extent of a label, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelBox {
    pub row: usize,
    pub x: f64,
    pub width: f64,
}

/// Minimum horizontal space kept between two labels in one lane
const LABEL_SPACING: f64 = 4.0;

/// Lane for each box, in input order (`None` = not placed)
pub fn assign_lanes(boxes: &[LabelBox], max_lanes: usize) -> Vec<Option<usize>> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        boxes[a]
            .row
            .cmp(&boxes[b].row)
            .then(boxes[a].x.total_cmp(&boxes[b].x))
    });

    let mut lane_ends: HashMap<(usize, usize), f64> = HashMap::new();
    let mut lanes = vec![None; boxes.len()];
    for index in order {
        let label = boxes[index];
        let free = (0..max_lanes).find(|lane| {
            lane_ends
                .get(&(label.row, *lane))
                .map_or(true, |end| *end + LABEL_SPACING <= label.x)
        });
        if let Some(lane) = free {
            lane_ends.insert((label.row, lane), label.x + label.width);
            lanes[index] = Some(lane);
        }
    }
    lanes
}

/// Rough rendered width of `chars` characters in a proportional font
pub fn text_width(chars: usize, font_size: u32) -> f64 {
    chars as f64 * font_size as f64 * 0.6
}
