//! Label placement search.
//!
//! Each map layer owns one [`LabelPlacer`]. POIs are placed one at a time in
//! layer order; an accepted box joins the occupied list and is never moved,
//! so earlier POIs always keep their spot.
//!
//! Candidates are tried in a fixed order and the first acceptable one wins:
//!
//! 1. vertical offsets `0, +1, -1, … ±4` line heights from the dot
//! 2. horizontal offsets of `±1..=4` label widths
//! 3. the four diagonals at `1..=4` steps
//! 4. passes 1-3 again at `5..=12`
//! 5. a POI-id badge on the dot
//!
//! A dot inside a red mask zone replaces passes 1-3 with the nearest blue
//! zone's label stack.

use crate::mask::{LabelMask, DEFAULT_RED_TOLERANCE};
use crate::metrics::{text_box, wrap_label, FontMetrics};
use prefabmap_common::{boxes_overlap, LabelBox, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Multiples tried by the first three passes.
const NEAR_MULTIPLES: std::ops::RangeInclusive<i32> = 1..=4;

/// Multiples tried by the extended pass.
const EXTENDED_MULTIPLES: std::ops::RangeInclusive<i32> = 5..=12;

/// Gap between the dot's label slot and a horizontally shifted candidate.
const HORIZONTAL_GAP: i32 = 8;

/// Horizontal gap for diagonal candidates.
const DIAGONAL_GAP: i32 = 10;

/// Inset of stacked labels from a blue zone's top-left corner, and the space
/// left between stacked labels.
const BLUE_ZONE_INSET: i32 = 6;

/// Diagonal directions, clockwise from up-left.
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Padding around label text
    pub label_padding: i32,
    /// Wrap width for label text
    pub max_label_width: i32,
    /// Radius of POI dots
    pub dot_radius: i32,
    /// Red mask samples tolerated per box
    pub red_tolerance: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            label_padding: 4,
            max_label_width: 200,
            dot_radius: 4,
            red_tolerance: DEFAULT_RED_TOLERANCE,
        }
    }
}

/// Which stage of the search produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPass {
    /// Stacked vertically beside the dot
    Vertical,
    /// Shifted left or right
    Horizontal,
    /// Shifted along a diagonal
    Diagonal,
    /// Any direction at a larger distance
    Extended,
    /// Stacked in the nearest blue mask zone
    BlueZone,
    /// Placed beside the dot with no search
    Direct,
}

impl PlacementPass {
    /// Lower-case name used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Diagonal => "diagonal",
            Self::Extended => "extended",
            Self::BlueZone => "blue_zone",
            Self::Direct => "direct",
        }
    }
}

/// An accepted label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Occupied box, padding included
    pub label_box: LabelBox,
    /// Wrapped text lines
    pub lines: Vec<String>,
    /// Top-left of the first text line
    pub origin: Point,
    /// Stage that produced it
    pub pass: PlacementPass,
}

/// Result of placing one POI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// A full text label
    Label(Placement),
    /// No slot found: a badge box centered on the dot
    Badge(LabelBox),
}

/// Box of a POI-id badge drawn over `dot`.
#[must_use]
pub fn badge_box(dot: Point, badge: &str, metrics: &dyn FontMetrics, padding: i32) -> LabelBox {
    let w = metrics.text_width(badge);
    let h = metrics.line_height();
    LabelBox::new(
        dot.x - w / 2 - padding,
        dot.y - h / 2 - padding,
        dot.x + w / 2 + padding,
        dot.y + h / 2 + padding,
    )
}

/// A candidate label: its wrapped lines measured once, moved around by offset.
struct Candidate {
    origin: Point,
    label_box: LabelBox,
    text_width: i32,
}

impl Candidate {
    fn shifted(&self, dx: i32, dy: i32) -> (Point, LabelBox) {
        (
            Point::new(self.origin.x + dx, self.origin.y + dy),
            self.label_box.translate(dx, dy),
        )
    }
}

/// Per-layer placement state.
pub struct LabelPlacer<'a> {
    config: PlacementConfig,
    metrics: &'a dyn FontMetrics,
    mask: Option<&'a LabelMask>,
    blue_zones: Vec<LabelBox>,
    zone_stack_tops: Vec<Option<i32>>,
    dots: Vec<Point>,
    occupied: Vec<LabelBox>,
}

impl<'a> LabelPlacer<'a> {
    /// Creates a placer with no mask, no dots and nothing placed.
    pub fn new(metrics: &'a dyn FontMetrics, config: PlacementConfig) -> Self {
        Self {
            config,
            metrics,
            mask: None,
            blue_zones: Vec::new(),
            zone_stack_tops: Vec::new(),
            dots: Vec::new(),
            occupied: Vec::new(),
        }
    }

    /// Checks candidates against `mask`; labels for dots in red zones go to
    /// the nearest of `blue_zones`.
    #[must_use]
    pub fn with_mask(mut self, mask: &'a LabelMask, blue_zones: Vec<LabelBox>) -> Self {
        self.mask = Some(mask);
        self.zone_stack_tops = vec![None; blue_zones.len()];
        self.blue_zones = blue_zones;
        self
    }

    /// Dots labels must not cover.
    #[must_use]
    pub fn with_dots(mut self, dots: Vec<Point>) -> Self {
        self.dots = dots;
        self
    }

    /// Boxes accepted so far, in placement order.
    #[must_use]
    pub fn occupied(&self) -> &[LabelBox] {
        &self.occupied
    }

    /// Wraps `text` and measures it at the default slot beside `dot`.
    fn candidate(&self, dot: Point, text: &str) -> (Vec<String>, Candidate) {
        let pad = self.config.label_padding;
        let lines = wrap_label(text, self.metrics, self.config.max_label_width);
        let origin = Point::new(dot.x + pad, dot.y + pad + 4);
        let label_box = text_box(origin.x, origin.y, &lines, self.metrics, pad);
        let text_width = label_box.width() - 2 * pad;
        (
            lines,
            Candidate {
                origin,
                label_box,
                text_width,
            },
        )
    }

    fn covers_dot(&self, label_box: &LabelBox, own: Point, include_own: bool) -> bool {
        let r = self.config.dot_radius;
        self.dots
            .iter()
            .filter(|&&d| include_own || d != own)
            .any(|&d| boxes_overlap(label_box, &LabelBox::around(d, r, r)))
    }

    fn accepts(&self, label_box: &LabelBox, own: Point, include_own: bool) -> bool {
        !label_box.overlaps_any(&self.occupied)
            && !self.covers_dot(label_box, own, include_own)
            && self
                .mask
                .map_or(true, |m| m.is_placeable(label_box, self.config.red_tolerance))
    }

    /// Offsets of one sweep at `multiple`, tagged with the pass they belong to.
    fn offsets(&self, cand: &Candidate, multiple: i32) -> Vec<(i32, i32, PlacementPass)> {
        let line_h = self.metrics.line_height();
        let h_step = cand.text_width + HORIZONTAL_GAP;
        let d_step = (cand.text_width + DIAGONAL_GAP, line_h + 2);
        let mut out = vec![
            (0, multiple * line_h, PlacementPass::Vertical),
            (0, -multiple * line_h, PlacementPass::Vertical),
            (-multiple * h_step, 0, PlacementPass::Horizontal),
            (multiple * h_step, 0, PlacementPass::Horizontal),
        ];
        out.extend(
            DIAGONALS
                .iter()
                .map(|&(sx, sy)| (sx * multiple * d_step.0, sy * multiple * d_step.1, PlacementPass::Diagonal)),
        );
        out
    }

    /// Every candidate offset in search order.
    fn search_order(&self, cand: &Candidate) -> Vec<(i32, i32, PlacementPass)> {
        let mut order = vec![(0, 0, PlacementPass::Vertical)];
        let near: Vec<_> = NEAR_MULTIPLES.map(|m| self.offsets(cand, m)).collect();

        // Passes run one after another, each over all near multiples.
        for pass in [PlacementPass::Vertical, PlacementPass::Horizontal, PlacementPass::Diagonal] {
            for sweep in &near {
                order.extend(sweep.iter().copied().filter(|&(_, _, p)| p == pass));
            }
        }
        for m in EXTENDED_MULTIPLES {
            order.extend(
                self.offsets(cand, m)
                    .into_iter()
                    .map(|(dx, dy, _)| (dx, dy, PlacementPass::Extended)),
            );
        }
        order
    }

    /// Finds a slot for `text` near `dot`, falling back to a `badge` box.
    ///
    /// Dots inside a red mask zone try the blue-zone stack in place of
    /// passes 1-3 and fall through to the extended pass.
    pub fn place(&mut self, dot: Point, text: &str, badge: &str) -> PlacementOutcome {
        let in_red = self.mask.is_some_and(|m| m.is_red(dot));
        if in_red {
            if let Some(placement) = self.place_in_blue_zone(dot, text) {
                return PlacementOutcome::Label(placement);
            }
            trace!("No blue zone slot for {text:?}, trying the extended pass");
        }

        let (lines, cand) = self.candidate(dot, text);
        let order = self.search_order(&cand);
        let order = order.into_iter().filter(|&(_, _, pass)| !in_red || pass == PlacementPass::Extended);
        for (dx, dy, pass) in order {
            let (origin, label_box) = cand.shifted(dx, dy);
            // Vertical slots sit beside the dot and may brush its own box.
            let include_own = pass != PlacementPass::Vertical;
            if self.accepts(&label_box, dot, include_own) {
                self.occupied.push(label_box);
                return PlacementOutcome::Label(Placement {
                    label_box,
                    lines,
                    origin,
                    pass,
                });
            }
        }

        debug!("No label slot for {text:?} at ({}, {}), using badge", dot.x, dot.y);
        PlacementOutcome::Badge(badge_box(dot, badge, self.metrics, self.config.label_padding))
    }

    /// Stacks `text` in the blue zone nearest to `dot`.
    ///
    /// Distance is Manhattan between the dot and zone centers; the first zone
    /// wins ties. Labels snap to the zone's left edge and each one pushes the
    /// zone's stack top down. Returns `None` without a mask, without zones,
    /// or when the stacked slot fails the red check.
    pub fn place_in_blue_zone(&mut self, dot: Point, text: &str) -> Option<Placement> {
        let mask = self.mask?;
        let (index, zone) = self
            .blue_zones
            .iter()
            .enumerate()
            .min_by_key(|(_, zone)| zone.center().manhattan(dot))?;
        let zone = *zone;

        let pad = self.config.label_padding;
        let lines = wrap_label(text, self.metrics, self.config.max_label_width);
        let origin = Point::new(
            zone.x1 + BLUE_ZONE_INSET,
            self.zone_stack_tops[index].unwrap_or(zone.y1 + BLUE_ZONE_INSET),
        );
        let label_box = text_box(origin.x, origin.y, &lines, self.metrics, pad);
        if !mask.is_placeable_in_blue(&label_box, self.config.red_tolerance) {
            return None;
        }

        self.zone_stack_tops[index] =
            Some(origin.y + self.metrics.line_height() * lines.len() as i32 + BLUE_ZONE_INSET);
        self.occupied.push(label_box);
        Some(Placement {
            label_box,
            lines,
            origin,
            pass: PlacementPass::BlueZone,
        })
    }

    /// Places `text` in the default slot beside `dot` without any checks.
    ///
    /// Used for layers where every label must appear (streets, player
    /// starts). The box still joins the occupied list.
    pub fn place_direct(&mut self, dot: Point, text: &str) -> Placement {
        let (lines, cand) = self.candidate(dot, text);
        self.occupied.push(cand.label_box);
        Placement {
            label_box: cand.label_box,
            lines,
            origin: cand.origin,
            pass: PlacementPass::Direct,
        }
    }
}
