use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

use color_eyre::Result;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use tokio::{sync::mpsc, task};
use tracing::{debug, error};

use crate::{
    protocol::Flavor,
    state::{NoticeKind, Tab},
    ui::{
        AppViewModel, BodyViewModel, FormViewModel,
        cards::{CardLine, CardSegment, CardViewModel, SegmentStyle},
    },
};

#[derive(Debug)]
pub enum Event {
    Input(KeyEvent),
    Tick,
    Resize(u16, u16),
}

pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        Ok(Self { terminal })
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            error!(?err, "failed to disable raw mode");
        }

        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, LeaveAlternateScreen) {
            error!(?err, "failed to leave alternate screen");
        }

        if let Err(err) = self.terminal.show_cursor() {
            error!(?err, "failed to show cursor");
        }
    }
}

pub fn spawn_event_loop(
    tx: mpsc::UnboundedSender<Event>,
    tick_rate: Duration,
) -> task::JoinHandle<()> {
    task::spawn_blocking(move || {
        let mut last_tick = Instant::now();

        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            match event::poll(timeout) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                        if tx.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => {
                        if tx.send(Event::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(err) => {
                        error!(?err, "failed to read terminal event");
                        break;
                    }
                },
                Ok(false) => {}
                Err(err) => {
                    error!(?err, "failed to poll terminal events");
                    break;
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(Event::Tick).is_err() {
                    break;
                }
                last_tick = Instant::now();
            }
        }

        debug!("terminal event loop terminated");
    })
}

pub fn render_app(frame: &mut Frame<'_>, view_model: &AppViewModel) {
    let form_height = if view_model.form.chips.is_empty() { 5 } else { 7 };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(form_height),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    render_header(frame, layout[0], view_model);
    render_tabs(frame, layout[1], view_model.tab);
    render_form(frame, layout[2], view_model.tab, &view_model.form);
    render_body(frame, layout[3], &view_model.body);
    render_notice(frame, layout[4], view_model);
    render_footer(frame, layout[5], view_model.tab);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, view_model: &AppViewModel) {
    let flavor = match view_model.flavor {
        Flavor::Unified => "unified",
        Flavor::Legacy => "legacy",
    };

    let lines = vec![
        Line::from(Span::styled(
            "TED Suite 2.0",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                "New ways to T.E.D. ideas worth spreading",
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("  ·  {} ({})", view_model.api_base, flavor),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let header = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )
        .select(active.index());

    frame.render_widget(tabs, area);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, tab: Tab, form: &FormViewModel) {
    let title = match tab {
        Tab::Explore => "Explore a talk",
        Tab::Discover => "Pick a mood or activity…",
        Tab::Trace => "Trace a topic",
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title_style(
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    if !form.chips.is_empty() {
        let mut spans = Vec::new();
        for chip in &form.chips {
            let mut style = if chip.selected {
                Style::default().fg(Color::Black).bg(Color::LightRed)
            } else {
                Style::default().fg(Color::Gray)
            };
            if chip.under_cursor {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            spans.push(Span::styled(format!(" {} ", chip.label), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    let cursor = if form.field.focused { "█" } else { "" };
    let field = if form.field.value.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(cursor),
            Span::styled(form.field.placeholder, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(form.field.value.clone(), Style::default().fg(Color::White)),
            Span::raw(cursor),
        ])
    };
    lines.push(field);
    lines.push(Line::default());

    let trigger_style = if form.trigger.enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(
        format!("[ {} ]", form.trigger.label),
        trigger_style,
    )));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner(area));
}

fn render_body(frame: &mut Frame<'_>, area: Rect, body: &BodyViewModel) {
    match body {
        BodyViewModel::Explore {
            talk,
            why_watch,
            recommendations,
        } => {
            let talk_height = talk
                .as_ref()
                .map(|card| card.lines.len() as u16 + 2)
                .unwrap_or(0);

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(talk_height), Constraint::Min(0)])
                .split(area);

            if let Some(card) = talk {
                render_card(frame, rows[0], card);
            }

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[1]);

            render_card(frame, columns[0], why_watch);
            render_card(frame, columns[1], recommendations);
        }
        BodyViewModel::Playlist(cards) => {
            render_card_stack(frame, area, "Playlist", cards, "Your playlist will appear here...")
        }
        BodyViewModel::Timeline(cards) => {
            render_card_stack(frame, area, "Timeline", cards, "Your timeline will appear here...")
        }
    }
}

fn render_card(frame: &mut Frame<'_>, area: Rect, card: &CardViewModel) {
    let block = Block::default()
        .title(card.header.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if card.selected {
            Color::Cyan
        } else {
            Color::DarkGray
        }))
        .title_style(
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);

    let lines: Vec<Line> = card.lines.iter().map(|line| styled_line(line, false)).collect();

    // Keep the highlighted block in view.
    let scroll = card
        .lines
        .iter()
        .position(|line| line.highlighted)
        .unwrap_or(0)
        .saturating_sub(1)
        .min(u16::MAX as usize) as u16;

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, inner(area));
}

fn render_card_stack(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    cards: &[CardViewModel],
    empty_hint: &str,
) {
    let block = Block::default()
        .title(format!("{} ({})", title, cards.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title_style(
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);

    if cards.is_empty() {
        let hint = Paragraph::new(empty_hint).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner(area));
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_start = 0;

    for card in cards {
        if card.selected {
            selected_start = lines.len();
        }

        let alignment = if card.align_right {
            Alignment::Right
        } else {
            Alignment::Left
        };

        let header_style = Style::default()
            .fg(if card.selected { Color::Cyan } else { Color::LightRed })
            .add_modifier(Modifier::BOLD);
        lines.push(
            Line::from(Span::styled(format!("● {}", card.header), header_style))
                .alignment(alignment),
        );

        for line in &card.lines {
            lines.push(styled_line(line, card.selected).alignment(alignment));
        }
        lines.push(Line::default());
    }

    let scroll = selected_start.min(u16::MAX as usize) as u16;
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, inner(area));
}

fn render_notice(frame: &mut Frame<'_>, area: Rect, view_model: &AppViewModel) {
    let Some(notice) = &view_model.notice else {
        return;
    };

    let color = match notice.kind {
        NoticeKind::Error => Color::LightRed,
        NoticeKind::Info => Color::LightGreen,
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", notice.title),
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", notice.message), Style::default().fg(color)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, tab: Tab) {
    let block = Block::default()
        .borders(Borders::TOP)
        .title("Keymap")
        .style(Style::default().fg(Color::DarkGray));

    let keymap = match tab {
        Tab::Discover => concat!(
            "esc/ctrl+c quit · Tab/F1-F3 switch tab · ←/→ chip · space toggle · ",
            "↑/↓ chips/text · Enter generate · PgUp/PgDn select · ctrl+y copy"
        ),
        _ => concat!(
            "esc/ctrl+c quit · Tab/F1-F3 switch tab · type to edit · ",
            "Enter submit · PgUp/PgDn select · ctrl+y copy"
        ),
    };
    let content = Paragraph::new(keymap).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(block, area);
    frame.render_widget(content, inner_below_border(area));
}

fn styled_line(line: &CardLine, selected_card: bool) -> Line<'static> {
    let mut spans = Vec::new();
    if line.indent > 0 {
        spans.push(Span::raw("  ".repeat(line.indent)));
    }
    for segment in &line.segments {
        let mut style = style_for_segment(segment);
        if line.highlighted || selected_card {
            style = style.bg(Color::DarkGray);
        }
        spans.push(Span::styled(segment.text.clone(), style));
    }
    Line::from(spans)
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn inner_below_border(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height.saturating_sub(1),
    }
}

fn style_for_segment(segment: &CardSegment) -> Style {
    match segment.style {
        SegmentStyle::Plain => Style::default().fg(Color::Gray),
        SegmentStyle::Title => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        SegmentStyle::Speaker => Style::default().fg(Color::Gray),
        SegmentStyle::Category => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        SegmentStyle::Tag => Style::default().fg(Color::Yellow),
        SegmentStyle::Date => Style::default().fg(Color::LightMagenta),
        SegmentStyle::Link => Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::UNDERLINED),
        SegmentStyle::Muted => Style::default().fg(Color::DarkGray),
        SegmentStyle::Quote => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::ITALIC | Modifier::BOLD),
    }
}
