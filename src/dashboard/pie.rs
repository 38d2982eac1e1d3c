//! Pie chart geometry and rendering for the dashboard.
//!
//! The chart shows each group's share of the total list value as a filled
//! SVG arc. Segment geometry (percentage, start/end angle) is computed as a
//! pure function so it can be tested without touching any markup.

use maud::{Markup, html};

use crate::{dashboard::aggregation::GroupSummary, html::format_currency};

/// The fill colours cycled through for pie segments and legend dots.
const CHART_COLORS: [&str; 8] = [
    "#3B82F6", // blue-500
    "#10B981", // emerald-500
    "#F59E0B", // amber-500
    "#EF4444", // red-500
    "#8B5CF6", // violet-500
    "#EC4899", // pink-500
    "#06B6D4", // cyan-500
    "#84CC16", // lime-500
];

/// The SVG coordinate space is a 200x200 view box with the pie centred in it.
const CENTER_X: f64 = 100.0;
const CENTER_Y: f64 = 100.0;
const RADIUS: f64 = 80.0;

/// One group's share of the total list value, as an angular slice.
///
/// Angles are in degrees, measured clockwise from the 12 o'clock position.
/// Segments tile the circle: each segment starts where the previous one
/// ended, the first starts at 0 and the last ends at 360.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PieSegment {
    /// The group's display name.
    pub group_name: String,
    /// The group's combined item value.
    pub value: f64,
    /// The group's share of the total, as a percentage in [0, 100].
    pub percentage: f64,
    /// Where the slice starts, in degrees from 12 o'clock.
    pub start_angle: f64,
    /// Where the slice ends, in degrees from 12 o'clock.
    pub end_angle: f64,
}

/// Converts group summaries into pie segments.
///
/// Segments are produced in the same order as `summaries` so the chart and
/// the legend line up. When `total_value` is zero (no items, or only
/// zero-price items) there is nothing to chart and the result is empty;
/// this function never divides by zero.
pub(super) fn compute_pie_segments(
    summaries: &[GroupSummary],
    total_value: f64,
) -> Vec<PieSegment> {
    if total_value <= 0.0 {
        return Vec::new();
    }

    let mut cumulative_percentage = 0.0;

    summaries
        .iter()
        .map(|summary| {
            let percentage = summary.total_value / total_value * 100.0;
            let start_angle = cumulative_percentage * 3.6;
            cumulative_percentage += percentage;
            let end_angle = cumulative_percentage * 3.6;

            PieSegment {
                group_name: summary.group_name.clone(),
                value: summary.total_value,
                percentage,
                start_angle,
                end_angle,
            }
        })
        .collect()
}

/// Converts a polar coordinate on the pie to SVG coordinates.
///
/// Subtracting 90 degrees rotates the angle reference so that 0 degrees maps
/// to the 12 o'clock position instead of 3 o'clock.
fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle_degrees: f64) -> (f64, f64) {
    let angle_rad = (angle_degrees - 90.0).to_radians();

    (cx + radius * angle_rad.cos(), cy + radius * angle_rad.sin())
}

/// Builds the SVG path for one pie slice: move to the arc's start point,
/// draw the arc to the end point (with the large-arc flag set when the slice
/// spans more than half the circle), then close back to the centre.
fn arc_path(start_angle: f64, end_angle: f64) -> String {
    let (start_x, start_y) = polar_to_cartesian(CENTER_X, CENTER_Y, RADIUS, start_angle);
    let (end_x, end_y) = polar_to_cartesian(CENTER_X, CENTER_Y, RADIUS, end_angle);
    let large_arc_flag = if end_angle - start_angle > 180.0 { 1 } else { 0 };

    format!(
        "M {start_x:.4} {start_y:.4} \
         A {RADIUS} {RADIUS} 0 {large_arc_flag} 1 {end_x:.4} {end_y:.4} \
         L {CENTER_X} {CENTER_Y} Z"
    )
}

/// Renders the pie chart with its legend.
///
/// A segment spanning the whole circle degenerates to a zero-length arc, so
/// it is drawn as a full circle instead.
pub(super) fn pie_chart_view(segments: &[PieSegment]) -> Markup {
    html! {
        div
            id="group-value-chart"
            class="flex flex-col lg:flex-row items-center justify-center gap-8 p-4
                rounded bg-white shadow-sm dark:bg-gray-800"
        {
            svg
                width="200"
                height="200"
                viewBox="0 0 200 200"
                role="img"
                aria-label="Share of total value by group"
            {
                @for (index, segment) in segments.iter().enumerate() {
                    @let color = CHART_COLORS[index % CHART_COLORS.len()];

                    @if segment.end_angle - segment.start_angle >= 360.0 - 1e-9 {
                        circle
                            cx=(CENTER_X)
                            cy=(CENTER_Y)
                            r=(RADIUS)
                            fill=(color)
                            data-segment=(segment.group_name)
                        {}
                    } @else {
                        path
                            d=(arc_path(segment.start_angle, segment.end_angle))
                            fill=(color)
                            data-segment=(segment.group_name)
                        {}
                    }
                }
            }

            div class="space-y-2"
            {
                @for (index, segment) in segments.iter().enumerate() {
                    @let color = CHART_COLORS[index % CHART_COLORS.len()];

                    div class="flex items-center gap-2 text-sm"
                    {
                        span
                            class="w-4 h-4 rounded-full inline-block"
                            style={ "background-color: " (color) }
                        {}

                        span class="text-gray-700 dark:text-gray-300" { (segment.group_name) }

                        span class="font-medium text-gray-900 dark:text-white"
                        {
                            (format_currency(segment.value))
                            " (" (format!("{:.1}", segment.percentage)) "%)"
                        }
                    }
                }
            }
        }
    }
}
