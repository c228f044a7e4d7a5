use anyhow::Result;
use planner_core::types::PIECE_PALETTE;
use planner_core::{CutResult, Project};
use std::fmt::Write;

const SCALE: f64 = 2.0;
const PAGE_MARGIN: f64 = 20.0;
const PANEL_SPACING: f64 = 40.0;

/// Renders every board of a plan as one vertically stacked SVG document.
/// Boards without a matching result (or results whose board has been removed
/// from the project) are skipped.
pub fn render_svg(project: &Project, results: &[CutResult]) -> Result<String> {
    let panels: Vec<_> = results
        .iter()
        .filter_map(|r| project.find_board(&r.board_id).map(|b| (b, r)))
        .collect();

    let max_width = panels.iter().map(|(b, _)| b.width).fold(0.0, f64::max);
    let panels_height: f64 = panels
        .iter()
        .map(|(b, _)| b.height / SCALE + PANEL_SPACING)
        .sum();

    let svg_width = max_width / SCALE + 2.0 * PAGE_MARGIN;
    let svg_height = panels_height + 2.0 * PAGE_MARGIN;

    let mut svg = String::new();
    writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(svg, r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##)?;

    let margin = project.params.margin;
    let mut y_offset = PAGE_MARGIN;

    for (board, result) in panels {
        let x = PAGE_MARGIN;
        let panel_width = board.width / SCALE;
        let panel_height = board.height / SCALE;

        writeln!(
            svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff" stroke="#333" stroke-width="2"/>"##,
            x, y_offset, panel_width, panel_height
        )?;

        writeln!(
            svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">{}</text>"##,
            x,
            y_offset - 5.0,
            xml_escape(board.label())
        )?;

        if margin > 0.0 {
            writeln!(
                svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#999" stroke-width="1" stroke-dasharray="4 3"/>"##,
                x + margin / SCALE,
                y_offset + margin / SCALE,
                panel_width - 2.0 * margin / SCALE,
                panel_height - 2.0 * margin / SCALE
            )?;
        }

        for placement in &result.placements {
            let px = x + placement.x / SCALE;
            let py = y_offset + placement.y / SCALE;
            let pw = placement.width / SCALE;
            let ph = placement.height / SCALE;

            let color = project
                .find_piece(&placement.piece_id)
                .and_then(|p| p.color.as_deref())
                .unwrap_or(PIECE_PALETTE[0]);

            writeln!(
                svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="#333" stroke-width="1"/>"##,
                px, py, pw, ph, color
            )?;

            // A rotated placement is labeled with its nominal dimensions, the
            // way the piece was specified.
            let dims = if placement.rotated {
                format!("{}×{}", placement.height, placement.width)
            } else {
                format!("{}×{}", placement.width, placement.height)
            };

            writeln!(
                svg,
                r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#333" text-anchor="middle">{}</text>"##,
                px + pw / 2.0,
                py + ph / 2.0 - 2.0,
                dims
            )?;
            writeln!(
                svg,
                r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#333" text-anchor="middle">{}</text>"##,
                px + pw / 2.0,
                py + ph / 2.0 + 10.0,
                xml_escape(&placement.piece_id)
            )?;
        }

        let mut footer = format!(
            "{}: {}×{} cm, waste {:.2}%",
            board.label(),
            board.width,
            board.height,
            result.waste_percentage
        );
        if result.truncated {
            footer.push_str(" (truncated)");
        }
        writeln!(
            svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">{}</text>"##,
            x,
            y_offset + panel_height + 15.0,
            xml_escape(&footer)
        )?;

        y_offset += panel_height + PANEL_SPACING;
    }

    writeln!(svg, "</svg>")?;

    Ok(svg)
}

pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{plan_cuts, Board, Piece};

    #[test]
    fn svg_contains_a_rect_per_placement() {
        let mut project = Project::default();
        project
            .add_board(Board {
                id: "b1".into(),
                width: 240.0,
                height: 180.0,
                name: "Sheet 1".into(),
            })
            .unwrap();
        project
            .add_piece(Piece {
                id: "p1".into(),
                width: 60.0,
                height: 45.0,
                quantity: 2,
                color: Some("#abcdef".into()),
            })
            .unwrap();

        let results = plan_cuts(&project.boards, &project.pieces, &project.params);
        let svg = render_svg(&project, &results).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert_eq!(svg.matches(r##"fill="#abcdef""##).count(), 2);
        assert!(svg.contains("Sheet 1"));
        assert!(svg.contains("waste"));
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(xml_escape("a<b>&c"), "a&lt;b&gt;&amp;c");
    }
}
