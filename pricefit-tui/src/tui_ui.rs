use pricefit_core::{Tier, format_usd};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
};

use crate::theme::tier_chart_color;
use crate::tui_app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, outer[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(outer[1]);

    draw_chart(frame, app, body[0]);
    if app.show_detail {
        draw_detail(frame, app, body[1]);
    } else {
        draw_table(frame, app, body[1]);
    }

    draw_footer(frame, app, outer[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let counts = &app.report.tier_counts;
    let line = Line::from(vec![
        Span::styled(
            app.report.chart_title(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} green", counts.green),
            Style::default().fg(tier_chart_color(Tier::Green)),
        ),
        Span::raw(" / "),
        Span::styled(
            format!("{} orange", counts.orange),
            Style::default().fg(tier_chart_color(Tier::Orange)),
        ),
        Span::raw(" / "),
        Span::styled(
            format!("{} red", counts.red),
            Style::default().fg(tier_chart_color(Tier::Red)),
        ),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" pricefit "));
    frame.render_widget(header, area);
}

fn axis_labels(max: f64) -> Vec<Span<'static>> {
    [0.0, max / 2.0, max]
        .iter()
        .map(|v| Span::raw(format!("{v:.0}")))
        .collect()
}

fn draw_chart(frame: &mut Frame, app: &App, area: Rect) {
    let max = app.report.axis_max().max(1.0);
    let diagonal = [(0.0, 0.0), (max, max)];
    let per_tier: Vec<(Tier, Vec<(f64, f64)>)> = Tier::ALL
        .iter()
        .map(|&t| (t, app.report.points_for(t)))
        .collect();

    let mut datasets = vec![
        Dataset::default()
            .name("truth = guess")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&diagonal),
    ];
    for (tier, points) in &per_tier {
        datasets.push(
            Dataset::default()
                .name(tier.label())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(tier_chart_color(*tier)))
                .data(points),
        );
    }

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(" Truth vs Guess "))
        .x_axis(
            Axis::default()
                .title("Ground truth")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max])
                .labels(axis_labels(max)),
        )
        .y_axis(
            Axis::default()
                .title("Model estimate")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max])
                .labels(axis_labels(max)),
        );
    frame.render_widget(chart, area);
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .filtered
        .iter()
        .map(|&idx| {
            let r = &app.records[idx];
            let color = tier_chart_color(r.tier);
            Row::new(vec![
                Cell::from((r.index + 1).to_string()),
                Cell::from(format_usd(r.guess)),
                Cell::from(format_usd(r.truth)),
                Cell::from(format_usd(r.absolute_error)).style(Style::default().fg(color)),
                Cell::from(app.label_of(r).to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Min(10),
    ];

    let title = format!(
        " Items [{}] {}/{} ",
        app.tier_filter.label(),
        app.filtered.len(),
        app.records.len()
    );
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Guess", "Truth", "Error", "Item"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !app.filtered.is_empty() {
        state.select(Some(app.selected_row));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Detail ");
    let Some(r) = app.selected_record() else {
        frame.render_widget(Paragraph::new("No item selected").block(block), area);
        return;
    };

    let ratio = if r.truth > 0.0 {
        format!("{:.1}%", r.absolute_error / r.truth * 100.0)
    } else {
        "n/a".to_string()
    };
    let lines = vec![
        Line::from(Span::styled(
            app.label_of(r).to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Item:          {}", r.index + 1)),
        Line::from(format!("Guess:         {}", format_usd(r.guess))),
        Line::from(format!("Truth:         {}", format_usd(r.truth))),
        Line::from(format!("Abs. error:    {}", format_usd(r.absolute_error))),
        Line::from(format!("Rel. error:    {ratio}")),
        Line::from(format!("Sq. log error: {:.4}", r.squared_log_error)),
        Line::from(vec![
            Span::raw("Tier:          "),
            Span::styled(
                r.tier.label(),
                Style::default()
                    .fg(tier_chart_color(r.tier))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(frame: &mut Frame, _app: &App, area: Rect) {
    let help = Line::from(vec![
        Span::styled(" j/k", Style::default().fg(Color::Cyan)),
        Span::raw(" move  "),
        Span::styled("f", Style::default().fg(Color::Cyan)),
        Span::raw(" tier filter  "),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" detail  "),
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(help), area);
}
