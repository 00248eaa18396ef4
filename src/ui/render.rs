//! Rendering functions for the Vitae TUI. Everything in this module is a
//! pure function of the [`App`] state; no side effects, no stored state.

use crate::build::SUCCESS_MARKER;
use crate::ui::app::{App, Phase};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    // The quitting view overrides everything else once the flag is set.
    if app.should_quit {
        render_quitting(frame, app);
        return;
    }

    // Main layout: Header + Body + Footer
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, main_chunks[0]);

    match &app.phase {
        Phase::Listing => render_listing(frame, app, main_chunks[1]),
        Phase::Building { variant } => render_building(frame, app, variant, main_chunks[1]),
        Phase::Completed { result } => {
            // Branch on the stable marker embedded in the log text.
            if result.log.contains(SUCCESS_MARKER) {
                render_success(frame, app, result, main_chunks[1]);
            } else {
                render_failure(frame, app, result, main_chunks[1]);
            }
        }
    }

    render_footer(frame, app, main_chunks[2]);

    if app.show_help {
        render_help_overlay(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header_text = vec![Line::from(Span::styled(
        "  📄 Vitae - Resume Builder  ",
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::BOLD),
    ))];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent)),
    );

    frame.render_widget(header, area);
}

fn render_listing(frame: &mut Frame, app: &App, area: Rect) {
    let list_area = if app.filter_mode {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        render_filter_input(frame, app, chunks[0]);
        chunks[1]
    } else {
        area
    };

    let items: Vec<ListItem> = app
        .visible_entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == app.selected_index;
            let (name_style, desc_style) = if is_selected {
                (
                    Style::default()
                        .fg(app.theme.bg)
                        .bg(app.theme.accent)
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(app.theme.accent),
                )
            } else {
                (
                    Style::default().fg(app.theme.fg),
                    Style::default().fg(app.theme.fg_dim),
                )
            };

            let lines = vec![
                Line::from(Span::styled(format!(" {} ", entry.name), name_style)),
                Line::from(Span::styled(format!("   {}", entry.description), desc_style)),
            ];
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("📁 Variants")
            .border_style(Style::default().fg(app.theme.accent)),
    );

    frame.render_widget(list, list_area);
}

fn render_filter_input(frame: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(Line::from(vec![
        Span::styled("/", Style::default().fg(app.theme.secondary)),
        Span::styled(
            app.filter_query.clone(),
            Style::default().fg(app.theme.fg),
        ),
        Span::styled("▌", Style::default().fg(app.theme.secondary)),
    ]));
    frame.render_widget(input, area);
}

fn render_building(frame: &mut Frame, app: &App, variant: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!(" {} ", app.spinner_glyph()),
                Style::default().fg(app.theme.secondary),
            ),
            Span::raw("Building "),
            Span::styled(
                variant.to_string(),
                Style::default()
                    .fg(app.theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("..."),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Please wait while your resume is being built...",
            Style::default().fg(app.theme.fg_dim),
        )),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.secondary)),
    );

    frame.render_widget(paragraph, area);
}

fn render_success(frame: &mut Frame, app: &App, result: &crate::build::BuildResult, area: Rect) {
    let artifact_name = result
        .artifact_path
        .as_deref()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("artifact");

    let key_style = Style::default().fg(app.theme.accent);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            " 🎉 Build Complete!",
            Style::default()
                .fg(app.theme.success)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw(" 📄 "),
            Span::styled(
                artifact_name.to_string(),
                Style::default()
                    .fg(app.theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            " 📋 Path copied to clipboard",
            Style::default().fg(app.theme.fg_dim),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled("[o]", key_style),
            Span::raw(" Open • "),
            Span::styled("[c]", key_style),
            Span::raw(" Copy • "),
            Span::styled("[esc]", key_style),
            Span::raw(" Back • "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.success)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_failure(frame: &mut Frame, app: &App, result: &crate::build::BuildResult, area: Rect) {
    let mut text = vec![Line::from(Span::styled(
        " Build Failed",
        Style::default()
            .fg(app.theme.error)
            .add_modifier(Modifier::BOLD),
    ))];
    text.push(Line::from(""));
    for line in result.log.lines() {
        text.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(app.theme.fg),
        )));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        " Press esc to go back",
        Style::default().fg(app.theme.fg_dim),
    )));

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("💬 Build Log")
                .border_style(Style::default().fg(app.theme.error)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.phase {
        Phase::Listing => {
            if app.filter_mode {
                "[type] Filter  [↑↓] Navigate  [Enter] Build  [Esc] Cancel filter"
            } else {
                "Press ? for help • ↑↓ to navigate • / to filter • Enter to build • q to quit"
            }
        }
        Phase::Building { .. } => "Building... • q to quit",
        Phase::Completed { .. } => "[o] Open  [c] Copy  [esc] Back  [q] Quit  [?] Help",
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(app.theme.fg_dim))
        .block(Block::default());

    frame.render_widget(footer, area);
}

fn render_quitting(frame: &mut Frame, app: &App) {
    let text = vec![
        Line::from(Span::styled(
            "👋 Goodbye!",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Thanks for using Vitae!",
            Style::default().fg(app.theme.fg_dim),
        )),
    ];

    frame.render_widget(Paragraph::new(text), frame.area());
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 12, frame.area());

    let text = vec![
        Line::from(Span::styled(
            "Key Bindings",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("↑/k, ↓/j     navigate the list"),
        Line::from("enter/space  build the selected variant"),
        Line::from("/            filter the list"),
        Line::from("o            open the built PDF"),
        Line::from("c            copy the PDF path"),
        Line::from("esc/b        back to the list"),
        Line::from("?            toggle this help"),
        Line::from("q, ctrl-c    quit"),
    ];

    let help = Paragraph::new(text)
        .style(Style::default().fg(app.theme.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("❓ Help")
                .border_style(Style::default().fg(app.theme.accent)),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// A rect of `width` x `height` centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
