//! Projection of one timeline step onto a scene.

use lacuna_scene::{GroupHandle, Scene};

use crate::timeline::{Phase, Timeline};

const BOX_SIZE: i64 = 40;
const BOX_GAP: i64 = 10;
const START_X: i64 = 50;
const START_Y: i64 = 100;
const MIN_WIDTH: i64 = 800;
const HEIGHT: i64 = 300;

const FILL: &str = "white";
const MARKED_FILL: &str = "#ffe08a";
const STROKE: &str = "#333";
const POINTER: &str = "#d9534f";

/// Redraw `scene` for `step` of `timeline`.
///
/// The root is cleared and the whole scene rebuilt every call. The scene
/// is O(n) nodes, so there is no diffing. Steps past the end draw the
/// last step.
pub fn render(scene: &mut Scene, timeline: &Timeline, step: usize) {
    let step = step.min(timeline.total_steps());
    let n = timeline.len();
    let values = timeline.snapshot(step).unwrap_or_default();
    let phase = timeline.phase(step);

    scene.clear();

    let width = MIN_WIDTH.max(2 * START_X + n as i64 * (BOX_SIZE + BOX_GAP));
    let mut root = scene
        .root_group()
        .attr("width", "100%")
        .attr("height", HEIGHT)
        .attr("viewBox", format!("0 0 {} {}", width, HEIGHT));

    draw_slots(&mut root, values, n as i64, phase);
    draw_ruler(&mut root, n);

    if let Phase::Marking { index, .. } = phase {
        draw_pointer(&mut root, index);
    }

    if step > n {
        let revealed = timeline.revealed_result(step);
        root.append_text(format!("Missing: [{}]", join(revealed)))
            .attr("class", "result")
            .attr("x", START_X)
            .attr("y", START_Y + BOX_SIZE + 60);
    }

    root.append_text(timeline.log(step).unwrap_or_default())
        .attr("class", "log")
        .attr("x", START_X)
        .attr("y", HEIGHT - 20);
}

fn slot_x(index: usize) -> i64 {
    START_X + index as i64 * (BOX_SIZE + BOX_GAP)
}

fn slot_center(index: usize) -> i64 {
    slot_x(index) + BOX_SIZE / 2
}

fn draw_slots(root: &mut GroupHandle<'_>, values: &[i64], n: i64, phase: Phase) {
    let target = match phase {
        Phase::Marking { target, .. } => Some(target),
        _ => None,
    };

    for (i, value) in values.iter().enumerate() {
        let marked = *value > n;
        let mut class = String::from("slot");
        if marked {
            class.push_str(" marked");
        }
        if target == Some(i) {
            class.push_str(" target");
        }

        let mut slot = root.append_group().attr("class", class);
        slot.append_rect()
            .attr("x", slot_x(i))
            .attr("y", START_Y)
            .attr("width", BOX_SIZE)
            .attr("height", BOX_SIZE)
            .attr("fill", if marked { MARKED_FILL } else { FILL })
            .attr("stroke", if target == Some(i) { POINTER } else { STROKE })
            .attr("stroke-width", 2);
        slot.append_text(value.to_string())
            .attr("x", slot_center(i))
            .attr("y", START_Y + BOX_SIZE / 2 + 5)
            .attr("text-anchor", "middle");
    }
}

fn draw_ruler(root: &mut GroupHandle<'_>, n: usize) {
    let mut ruler = root.append_group().attr("class", "ruler");
    for i in 0..n {
        ruler
            .append_text(i.to_string())
            .attr("x", slot_center(i))
            .attr("y", START_Y + BOX_SIZE + 20)
            .attr("text-anchor", "middle")
            .attr("font-size", 12);
    }
}

fn draw_pointer(root: &mut GroupHandle<'_>, index: usize) {
    let cx = slot_center(index);
    let tip = START_Y - 8;
    let tail = START_Y - 30;

    let mut pointer = root.append_group().attr("class", "pointer");
    pointer
        .append_path()
        .attr(
            "d",
            format!(
                "M{cx} {tail} L{cx} {tip} M{l} {head} L{cx} {tip} L{r} {head}",
                l = cx - 5,
                r = cx + 5,
                head = tip - 5,
            ),
        )
        .attr("stroke", POINTER)
        .attr("stroke-width", 2)
        .attr("fill", "none");
    pointer
        .append_text(format!("i={}", index))
        .attr("x", cx)
        .attr("y", tail - 6)
        .attr("text-anchor", "middle")
        .attr("fill", POINTER);
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
