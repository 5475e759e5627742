use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use autoedm_core::EmailPreview;
use crate::app::{App, FormField, TextInput};

const ACCENT: Color = Color::Indexed(63); // indigo

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [form_area, preview_area] = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Percentage(55),
    ])
    .areas(body_area);

    render_form(app, frame, form_area);
    render_preview_panel(app, frame, preview_area);
    render_footer(app, frame, footer_area);

    if app.show_copied_popup {
        render_copied_popup(frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" ✉ AutoEDM ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            " AI-Powered Personalized Email Content Generator ",
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("[{}] ", app.generator.settings().model),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if !app.has_api_key {
        spans.push(Span::styled(" no API key ", Style::default().bg(Color::Red).fg(Color::White)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![
        Span::styled(" FORM ", Style::default().bg(Color::Blue).fg(Color::White)),
        Span::raw(" "),
        Span::styled(" Tab ", key_style),
        Span::styled(" next ", label_style),
    ];

    match app.focus {
        FormField::FavoriteCategory => hints.extend(vec![
            Span::styled(" ←/→ ", key_style),
            Span::styled(" category ", label_style),
        ]),
        FormField::Generate | FormField::Copy => hints.extend(vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" press ", label_style),
        ]),
        _ => {}
    }

    hints.extend(vec![
        Span::styled(" ^G ", key_style),
        Span::styled(" generate ", label_style),
    ]);
    if app.session.result.is_complete() {
        hints.extend(vec![
            Span::styled(" ^Y ", key_style),
            Span::styled(" copy ", label_style),
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
        ]);
    }
    hints.extend(vec![
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_form(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Customer Information ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [name_area, category_area, purchase_area, button_area, message_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(inner);

    render_text_field(
        frame,
        name_area,
        " Customer Name ",
        &app.customer_name,
        "Enter customer name",
        app.focus == FormField::CustomerName,
    );
    render_category_field(app, frame, category_area);
    render_text_field(
        frame,
        purchase_area,
        " Recent Purchase (Optional) ",
        &app.recent_purchase,
        "What did they recently purchase?",
        app.focus == FormField::RecentPurchase,
    );
    render_generate_button(app, frame, button_area);
    render_messages(app, frame, message_area);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title)
}

fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &TextInput,
    placeholder: &str,
    focused: bool,
) {
    let block = field_block(title, focused);
    let inner = block.inner(area);

    let text = if input.value.is_empty() {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(input.value.clone())
    };

    // Keep the cursor visible on long values; offsets are in display columns
    let width = inner.width.max(1) as usize;
    let column = input.cursor_column();
    let offset = column.saturating_sub(width - 1);

    frame.render_widget(Paragraph::new(text).block(block).scroll((0, offset as u16)), area);

    if focused {
        let cursor_x = (column - offset).min(width - 1) as u16;
        frame.set_cursor_position((inner.x + cursor_x, inner.y));
    }
}

fn render_category_field(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FormField::FavoriteCategory;
    let block = field_block(" Favorite Shopping Category * ", focused);

    let arrow_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let selection = match app.favorite_category {
        Some(id) => {
            let category = id.descriptor();
            Span::raw(format!("{} {}", category.icon, category.title))
        }
        None => Span::styled("Select a category", Style::default().fg(Color::DarkGray)),
    };

    let line = Line::from(vec![
        Span::styled("◀ ", arrow_style),
        selection,
        Span::styled(" ▶", arrow_style),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_generate_button(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FormField::Generate;
    let enabled = app.can_generate();

    let label = if app.is_loading() {
        format!("Generating{}", ".".repeat(app.animation_frame as usize + 1))
    } else {
        "Generate Email Copy".to_string()
    };

    let style = match (enabled, focused) {
        (false, _) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default().bg(ACCENT).fg(Color::White).add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    };

    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(field_block("", focused));
    frame.render_widget(button, area);
}

fn render_messages(app: &App, frame: &mut Frame, area: Rect) {
    let mut lines = Vec::new();

    if let Some(error) = app.session.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(status) = &app.status_message {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_preview_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let preview = app.preview();

    let (content_area, copy_area) = if preview.is_some() {
        let [content, copy] = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);
        (content, Some(copy))
    } else {
        (area, None)
    };

    app.preview_area = Some(content_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Email Preview ");

    let text = match &preview {
        Some(preview) => preview_text(preview),
        None if app.is_loading() => {
            let dots = ".".repeat(app.animation_frame as usize + 1);
            Text::from(Span::styled(
                format!("Writing your email{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
        }
        None => Text::from(Span::styled(
            "Fill in the customer information and generate to see the email preview.",
            Style::default().fg(Color::DarkGray),
        )),
    };

    // Scroll limits follow the wrapped rows, not the logical lines
    let inner = block.inner(content_area);
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    app.preview_lines = paragraph.line_count(inner.width).min(u16::MAX as usize) as u16;
    app.preview_height = inner.height;
    app.preview_scroll = app.preview_scroll.min(app.max_preview_scroll());

    frame.render_widget(paragraph.block(block).scroll((app.preview_scroll, 0)), content_area);

    if let Some(copy_area) = copy_area {
        let focused = app.focus == FormField::Copy;
        let style = if focused {
            Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new("📋 Copy Email Content")
            .alignment(Alignment::Center)
            .style(style)
            .block(field_block("", focused));
        frame.render_widget(button, copy_area);
    }
}

fn preview_text(preview: &EmailPreview) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            preview.subject_line.clone(),
            Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::default(),
        Line::from(Span::styled(
            preview.hero_banner,
            Style::default().bg(Color::LightRed).fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::default(),
        Line::from(Span::styled(
            preview.greeting.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    lines.extend(preview.body.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::default());

    lines.push(
        Line::from(Span::styled(
            preview.call_to_action,
            Style::default().bg(Color::Green).fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
    );
    lines.push(
        Line::from(Span::styled(preview.fine_print, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
    );
    lines.push(Line::default());

    for card in &preview.highlights {
        let title_style = if card.is_favorite {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let mut title = vec![
            Span::raw(format!("{} ", card.category.icon)),
            Span::styled(card.category.title, title_style),
        ];
        if card.is_favorite {
            title.push(Span::raw("  "));
            title.push(Span::styled(
                autoedm_core::preview::FAVORITE_BADGE,
                Style::default().bg(Color::LightBlue).fg(Color::Black),
            ));
        }
        lines.push(Line::from(title));
        lines.push(Line::from(Span::styled(
            format!("   {}", card.category.description),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled("─".repeat(40), Style::default().fg(Color::DarkGray))).alignment(Alignment::Center));
    lines.push(
        Line::from(Span::styled(preview.footer, Style::default().fg(Color::Gray)))
            .alignment(Alignment::Center),
    );

    Text::from(lines)
}

fn render_copied_popup(frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Copied ");

    let text = Text::from(vec![
        Line::from("Email content copied to clipboard!").alignment(Alignment::Center),
        Line::from(Span::styled("Press Enter to continue", Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
    ]);

    frame.render_widget(Paragraph::new(text).block(block), popup_area);
}
