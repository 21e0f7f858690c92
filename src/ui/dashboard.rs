// ============================================================================
// Dashboard - Rendu de l'interface
// ============================================================================
// Dessine un ConverterView avec les widgets de ratatui. Aucune logique
// métier ici : les textes arrivent déjà formatés par view::project().
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Clear : efface une zone avant d'y dessiner un popup
// 4. set_cursor : place le curseur du terminal (position de saisie)
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Clear, List, ListItem, Paragraph,
    },
    Frame,
};

use crate::ui::view::{ConverterView, OutputField, PickerOption};

fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, view: &ConverterView) {
    let chunks = create_layout(frame.size(), view.banner.is_some());

    render_header(frame, view, chunks[0]);
    if let Some(banner) = &view.banner {
        render_banner(frame, banner, chunks[1]);
    }
    render_input(frame, view, chunks[2]);
    render_main_outputs(frame, view, chunks[3]);
    render_additional(frame, &view.additional, chunks[4]);
    render_footer(frame, view, chunks[5]);

    // Le popup en dernier : il recouvre le reste
    if let Some(options) = &view.picker {
        render_picker(frame, options);
    }
}

// ============================================================================
// Layout
// ============================================================================

/// header, bannière, saisie, USD/EUR, devises additionnelles, footer
fn create_layout(area: Rect, with_banner: bool) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if with_banner { 1 } else { 0 }),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area)
        .to_vec()
}

/// Rectangle centré (pourcentages de la zone parente)
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

// ============================================================================
// Header et bannière d'erreur
// ============================================================================

fn render_header(frame: &mut Frame, view: &ConverterView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", view.title))
        .title_alignment(Alignment::Center);

    let line = Line::from(Span::styled(
        view.ratio_hint.as_str(),
        Style::default().fg(Color::Gray),
    ));

    frame.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_banner(frame: &mut Frame, banner: &str, area: Rect) {
    let line = Line::from(Span::styled(
        format!("⚠ {}", banner),
        Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

// ============================================================================
// Champ de saisie
// ============================================================================

fn render_input(frame: &mut Frame, view: &ConverterView, area: Rect) {
    let focused = view.input_cursor.is_some();
    let border = if focused { Color::Green } else { Color::Cyan };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", view.input_label));

    let value = if view.input_value.is_empty() {
        Span::styled(
            view.input_placeholder.as_str(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(view.input_value.as_str(), Style::default().fg(Color::White))
    };

    let toggle = Line::from(vec![
        Span::styled("[u]", key_style(Color::Yellow)),
        Span::raw(format!(" {}", view.toggle_label)),
    ]);

    frame.render_widget(Paragraph::new(vec![Line::from(value), toggle]).block(block), area);

    // Curseur du terminal : bordure + position dans la saisie (ASCII uniquement)
    if let Some(cursor) = view.input_cursor {
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1 + cursor as u16).min(max_x);
        frame.set_cursor(x, area.y + 1);
    }
}

// ============================================================================
// Sorties USD / EUR et devises additionnelles
// ============================================================================

fn output_lines(field: &OutputField) -> Vec<Line<'_>> {
    let value = if field.value.is_empty() {
        Span::styled("-", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!("{} {}", field.icon, field.value),
            key_style(Color::Green),
        )
    };

    let rate = Span::styled(
        field.rate_line.as_deref().unwrap_or(""),
        Style::default().fg(Color::Gray),
    );

    vec![Line::from(value), Line::from(rate)]
}

fn render_main_outputs(frame: &mut Frame, view: &ConverterView, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (field, zone) in [&view.usd, &view.eur].into_iter().zip(halves.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", field.label));
        frame.render_widget(Paragraph::new(output_lines(field)).block(block), *zone);
    }
}

fn render_additional(frame: &mut Frame, fields: &[OutputField], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Other currencies ");

    if fields.is_empty() {
        let text = Line::from(Span::styled(
            "Press [a] to add a currency",
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = fields
        .iter()
        .map(|field| {
            let amount = if field.value.is_empty() {
                "-".to_string()
            } else {
                format!("{} {}", field.icon, field.value)
            };
            let line = format!(
                " {:<28} {:>20}   {}",
                field.label,
                amount,
                field.rate_line.as_deref().unwrap_or("")
            );

            let style = Style::default().fg(Color::White);
            if field.selected {
                ListItem::new(line).style(style.add_modifier(Modifier::BOLD | Modifier::REVERSED))
            } else {
                ListItem::new(line).style(style)
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Sélecteur de devise (popup)
// ============================================================================

fn render_picker(frame: &mut Frame, options: &[PickerOption]) {
    let area = centered_rect(60, 70, frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Add currency ")
        .title(
            Title::from(" [Enter] Add  [Esc] Cancel ")
                .position(Position::Bottom)
                .alignment(Alignment::Center),
        );

    // Fait défiler pour garder l'option surlignée visible
    let visible = area.height.saturating_sub(2) as usize;
    let highlighted = options.iter().position(|o| o.highlighted).unwrap_or(0);
    let skip = (highlighted + 1).saturating_sub(visible);

    let items: Vec<ListItem> = options
        .iter()
        .skip(skip)
        .map(|option| {
            let line = format!(" {:<4} {}", option.symbol, option.label);
            if option.highlighted {
                ListItem::new(line).style(key_style(Color::Yellow).add_modifier(Modifier::REVERSED))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Footer : raccourcis et statut
// ============================================================================

fn render_footer(frame: &mut Frame, view: &ConverterView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if view.confirm_quit {
        Line::from(vec![
            Span::styled("⚠  Press ", key_style(Color::Yellow)),
            Span::styled(
                "[q]",
                key_style(Color::Red).add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(" again to quit, any other key to cancel ⚠", key_style(Color::Yellow)),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style(Color::Yellow)),
            Span::raw(" Quit  "),
            Span::styled("[0-9 .]", key_style(Color::Yellow)),
            Span::raw(" Amount  "),
            Span::styled("[u/Tab]", key_style(Color::Yellow)),
            Span::raw(" Unit  "),
            Span::styled("[↑↓]", key_style(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("[a]", key_style(Color::Green)),
            Span::raw(" Add  "),
            Span::styled("[x]", key_style(Color::Red)),
            Span::raw(" Remove"),
        ])
    };

    let mut status = Vec::new();
    if let Some(loading) = &view.loading {
        status.push(Span::styled(loading.as_str(), key_style(Color::Yellow)));
        status.push(Span::raw("  "));
    }
    if let Some(last_update) = &view.last_update {
        status.push(Span::styled(last_update.as_str(), Style::default().fg(Color::Gray)));
        status.push(Span::raw("  "));
    }
    status.push(Span::styled(view.version.as_str(), Style::default().fg(Color::DarkGray)));

    frame.render_widget(
        Paragraph::new(vec![shortcuts, Line::from(status)])
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

// ============================================================================
// Tests
// ============================================================================
