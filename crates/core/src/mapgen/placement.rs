//! Rejection-sampled room placement with rotation, spawn limits, and failure budgets.

use serde::{Deserialize, Serialize};

use crate::types::{Pos, Rotation};

use super::grid::{CellRect, MapBounds};
use super::room::{PlacedRoom, RoomTemplate};
use super::seed::GenRng;

/// Consecutive failed placements tolerated before the run gives up.
pub const MAX_PLACEMENT_FAILURES: u32 = 30;
/// Rejected candidate positions that make up one failed placement.
pub const ATTEMPTS_PER_PLACEMENT: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStop {
    TargetReached,
    /// `MAX_PLACEMENT_FAILURES` placements in a row found no free spot.
    FailureBudget,
    /// Every template is at its spawn limit, or there are no templates.
    TemplatesExhausted,
}

/// Outcome of one placement pass. Falling short of the target is reported, not raised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub placed: usize,
    pub target: usize,
    pub failures: u32,
    /// Instances placed per template, indexed like the template slice.
    pub spawn_counts: Vec<u32>,
    pub stop: PlacementStop,
}

impl PlacementReport {
    pub fn budget_exhausted(&self) -> bool {
        self.placed < self.target
    }
}

pub(super) struct PlacementRequest<'a> {
    pub(super) bounds: MapBounds,
    pub(super) templates: &'a [RoomTemplate],
    pub(super) target_count: usize,
    pub(super) min_spacing: i32,
}

pub(super) fn place_rooms(
    request: &PlacementRequest<'_>,
    rng: &mut GenRng,
) -> (Vec<PlacedRoom>, PlacementReport) {
    let templates = request.templates;
    let spacing = effective_spacing(request.min_spacing);
    let mut rooms: Vec<PlacedRoom> = Vec::new();
    let mut spawn_counts = vec![0_u32; templates.len()];
    let mut failures = 0_u32;

    let stop = loop {
        if rooms.len() >= request.target_count {
            break PlacementStop::TargetReached;
        }
        if failures >= MAX_PLACEMENT_FAILURES {
            break PlacementStop::FailureBudget;
        }
        let any_spawnable = templates
            .iter()
            .zip(&spawn_counts)
            .any(|(template, &count)| count < template.spawn_limit);
        if !any_spawnable {
            break PlacementStop::TemplatesExhausted;
        }

        let template_index = rng.below(templates.len());
        let template = &templates[template_index];
        if spawn_counts[template_index] >= template.spawn_limit {
            continue;
        }

        match find_free_spot(request.bounds, template, &rooms, spacing, rng) {
            Some((anchor, rotation)) => {
                log::debug!(
                    "placed room '{}' at ({}, {}) rotated {}",
                    template.name,
                    anchor.x,
                    anchor.y,
                    rotation.degrees()
                );
                rooms.push(PlacedRoom::instantiate(template_index, template, anchor, rotation));
                spawn_counts[template_index] += 1;
            }
            None => failures += 1,
        }
    };

    let report = PlacementReport {
        placed: rooms.len(),
        target: request.target_count,
        failures,
        spawn_counts,
        stop,
    };
    (rooms, report)
}

/// Rooms always keep at least one empty cell between footprints so corridors can reach walls.
pub(super) fn effective_spacing(min_spacing: i32) -> i32 {
    min_spacing.max(1)
}

fn find_free_spot(
    bounds: MapBounds,
    template: &RoomTemplate,
    rooms: &[PlacedRoom],
    spacing: i32,
    rng: &mut GenRng,
) -> Option<(Pos, Rotation)> {
    for _ in 0..ATTEMPTS_PER_PLACEMENT {
        let rotation = if template.allow_rotation {
            Rotation::ALL[rng.below(Rotation::ALL.len())]
        } else {
            Rotation::Deg0
        };
        let (width, height) = template.rotated_size(rotation);
        let Some(anchor) = sample_anchor(bounds, width, height, rng) else {
            continue;
        };

        let candidate = CellRect::centered_at(anchor, width, height).expanded(spacing);
        if rooms.iter().all(|room| !candidate.intersects(&room.footprint)) {
            return Some((anchor, rotation));
        }
    }
    None
}

/// Uniform centre cell keeping a `width x height` footprint one cell clear of the map edge.
fn sample_anchor(bounds: MapBounds, width: i32, height: i32, rng: &mut GenRng) -> Option<Pos> {
    let min_x = bounds.min_x() + 1 + width / 2;
    let max_x = bounds.max_x() - 1 - (width - width / 2);
    let min_y = bounds.min_y() + 1 + height / 2;
    let max_y = bounds.max_y() - 1 - (height - height / 2);
    if min_x > max_x || min_y > max_y {
        return None;
    }
    let x = rng.range_inclusive(min_x, max_x);
    let y = rng.range_inclusive(min_y, max_y);
    Some(Pos { y, x })
}
