use crate::render::xml_escape;
use anyhow::Result;
use planner_core::{CutResult, PlanSummary, Project};
use std::collections::HashMap;
use std::fmt::Write;

/// Builds the standalone print view: a section per board with its piece
/// table, the run totals, and the SVG layout inline. Opening the file in a
/// browser brings up the print dialog, like the original print window.
pub fn render_html(
    project: &Project,
    results: &[CutResult],
    summary: &PlanSummary,
    svg: &str,
) -> Result<String> {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html>")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>Cut plan</title>")?;
    writeln!(html, "<style>")?;
    writeln!(
        html,
        "body {{ margin: 0; display: flex; flex-direction: column; align-items: center; font-family: Arial; }}"
    )?;
    writeln!(html, "svg {{ max-width: 100%; height: auto; margin-top: 20px; }}")?;
    writeln!(html, ".info {{ margin: 20px; width: 100%; max-width: 800px; }}")?;
    writeln!(
        html,
        "table {{ width: 100%; border-collapse: collapse; margin-top: 10px; }}"
    )?;
    writeln!(
        html,
        "th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}"
    )?;
    writeln!(html, "th {{ background-color: #f2f2f2; }}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    for result in results {
        let board = match project.find_board(&result.board_id) {
            Some(board) => board,
            None => continue,
        };

        writeln!(html, "<div class=\"info\">")?;
        writeln!(html, "<h2>Cut plan: {}</h2>", xml_escape(board.label()))?;
        writeln!(
            html,
            "<p>Dimensions: {}×{} cm</p>",
            board.width, board.height
        )?;
        write!(html, "<p>Waste: {:.2}%", result.waste_percentage)?;
        if result.truncated {
            write!(html, " (plan truncated)")?;
        }
        writeln!(html, "</p>")?;

        writeln!(html, "<h3>Pieces on this board:</h3>")?;
        writeln!(html, "<table>")?;
        writeln!(
            html,
            "<thead><tr><th>ID</th><th>Dimensions</th><th>Count</th></tr></thead>"
        )?;
        writeln!(html, "<tbody>")?;

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for placement in &result.placements {
            *counts.entry(placement.piece_id.as_str()).or_insert(0) += 1;
        }
        for piece in &project.pieces {
            if let Some(count) = counts.get(piece.id.as_str()) {
                writeln!(
                    html,
                    "<tr><td>{}</td><td>{}×{} cm</td><td>{}</td></tr>",
                    xml_escape(&piece.id),
                    piece.width,
                    piece.height,
                    count
                )?;
            }
        }

        writeln!(html, "</tbody>")?;
        writeln!(html, "</table>")?;
        writeln!(html, "</div>")?;
    }

    writeln!(html, "<div class=\"info\">")?;
    writeln!(html, "<h3>Totals</h3>")?;
    writeln!(
        html,
        "<p>{} pieces placed, {:.2} cm² used of {:.2} cm² ({:.2}% waste)</p>",
        summary.total_placements, summary.used_area, summary.total_area, summary.waste_percentage
    )?;
    for usage in &summary.piece_usage {
        if usage.shortfall() > 0 {
            writeln!(
                html,
                "<p>{}: only {} of {} placed</p>",
                xml_escape(&usage.piece_id),
                usage.placed,
                usage.requested
            )?;
        }
    }
    writeln!(html, "</div>")?;

    writeln!(html, "{}", svg.trim_start_matches("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"))?;
    writeln!(html, "<script>window.onload = function() {{ window.print(); }}</script>")?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_svg;
    use planner_core::{plan_cuts, summarize, Board, Piece};

    #[test]
    fn report_lists_boards_and_shortfalls() {
        let mut project = Project::default();
        project
            .add_board(Board {
                id: "b1".into(),
                width: 100.0,
                height: 100.0,
                name: String::new(),
            })
            .unwrap();
        project
            .add_piece(Piece {
                id: "big".into(),
                width: 60.0,
                height: 60.0,
                quantity: 2,
                color: None,
            })
            .unwrap();

        let results = plan_cuts(&project.boards, &project.pieces, &project.params);
        let summary = summarize(&project.pieces, &results);
        let svg = render_svg(&project, &results).unwrap();
        let html = render_html(&project, &results, &summary, &svg).unwrap();

        assert!(html.contains("Cut plan: b1"));
        assert!(html.contains("only 1 of 2 placed"));
        assert!(html.contains("<svg"));
        assert!(html.contains("window.print"));
    }
}
