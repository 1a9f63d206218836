use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use finch::fitness::FitnessScore;
use finch::optimizer::runner::SessionEnd;
use finch::optimizer::SessionSummary;
use finch::raster::Shape;

pub fn print_session_summary(summaries: &[SessionSummary]) {
    if summaries.is_empty() {
        println!("\nNo target was drawn.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Target").add_attribute(Attribute::Bold),
        Cell::new("Gens"),
        Cell::new("Impr"),
        Cell::new("Strokes"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Time"),
        Cell::new("Ended"),
    ]);

    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for s in summaries {
        let ended = match s.end {
            SessionEnd::Stopped => "stop",
            SessionEnd::NextImage => "next",
        };
        table.add_row(vec![
            Cell::new(&s.target_id).add_attribute(Attribute::Bold),
            Cell::new(s.generations),
            Cell::new(s.improvements),
            Cell::new(s.strokes),
            Cell::new(format!("{:.6}", s.best_score)).fg(Color::Cyan),
            Cell::new(format!("{:.1}s", s.elapsed.as_secs_f64())),
            Cell::new(ended),
        ]);
    }

    println!("\n=== 🐦 SESSION SUMMARY ===");
    println!("{}", table);
}

pub fn print_score(candidate: &str, target: &str, shape: Shape, method: &str, score: FitnessScore) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    table.add_row(vec![Cell::new("Candidate").add_attribute(Attribute::Bold), Cell::new(candidate)]);
    table.add_row(vec![Cell::new("Target").add_attribute(Attribute::Bold), Cell::new(target)]);
    table.add_row(vec![Cell::new("Shape").add_attribute(Attribute::Bold), Cell::new(shape)]);
    table.add_row(vec![Cell::new("Method").add_attribute(Attribute::Bold), Cell::new(method)]);
    table.add_row(vec![
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.6}", score)).fg(Color::Cyan),
    ]);

    println!("{}", table);
}
