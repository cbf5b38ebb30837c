use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use glitchtype::session::{GameState, MeterPhase, Session, MAX_LEVEL, METER_MAX, TIMER_FULL};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn phase_color(phase: MeterPhase) -> Color {
    match phase {
        MeterPhase::Ice => Color::Cyan,
        MeterPhase::Water => Color::Blue,
        MeterPhase::Fire => Color::Red,
    }
}

fn timer_color(timer: f64) -> Color {
    if timer > 50.0 {
        Color::Green
    } else if timer > 25.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn start_hint(session: &Session, keys: &str) -> String {
    if session.loading {
        "loading...".to_string()
    } else {
        keys.to_string()
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    (value / max).clamp(0.0, 1.0)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.engine.session();
        match session.state {
            GameState::Idle => render_title(
                area,
                buf,
                Span::styled(
                    "GLITCHTYPE",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                vec![
                    format!("starting at level {}", self.engine.initial_level()),
                    start_hint(session, "(enter) start / (esc)ape"),
                ],
            ),
            GameState::Crashed => render_title(
                area,
                buf,
                Span::styled(
                    "SYSTEM CRASH",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                vec![
                    format!("score {}  level {}", session.score, session.level),
                    start_hint(session, "(enter) retry / (esc) menu"),
                ],
            ),
            GameState::Victory => render_title(
                area,
                buf,
                Span::styled(
                    "MISSION ACCOMPLISHED",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                vec![
                    format!("final score {}", session.score),
                    start_hint(session, "(enter) play again / (esc) menu"),
                ],
            ),
            GameState::Playing => self.render_playing(area, buf),
        }

        if let Some(text) = self.announcer.banner() {
            let banner_area = Rect {
                height: area.height.min(1),
                ..area
            };
            Paragraph::new(Span::styled(
                text.to_string(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(banner_area, buf);
        }
    }
}

fn render_title(area: Rect, buf: &mut Buffer, title: Span<'_>, lines: Vec<String>) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut text = vec![Line::from(title), Line::from("")];
    text.extend(lines.into_iter().map(|l| Line::from(Span::styled(l, dim))));

    let height = text.len() as u16;
    let top = area.height.saturating_sub(height) / 2;
    let inner = Rect {
        y: area.y + top,
        height: height.min(area.height.saturating_sub(top)),
        ..area
    };

    Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

impl App {
    fn render_playing(&self, area: Rect, buf: &mut Buffer) {
        let session = self.engine.session();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(1),
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(area);

        hud_line(session).render(chunks[0], buf);

        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" stability "))
            .gauge_style(Style::default().fg(phase_color(session.phase())))
            .ratio(ratio(session.glitch_meter, METER_MAX))
            .label(format!("{:.0}%", session.stability().max(0.0)))
            .render(chunks[1], buf);

        self.words_paragraph(session, chunks[2].width)
            .render(chunks[2], buf);

        if session.level_started {
            Gauge::default()
                .gauge_style(Style::default().fg(timer_color(session.word_timer)))
                .ratio(ratio(session.word_timer, TIMER_FULL))
                .label("")
                .render(chunks[3], buf);
        }

        let hint = if !session.level_started {
            Some("type to begin")
        } else if session.show_space_hint {
            Some("press space")
        } else {
            None
        };
        if let Some(hint) = hint {
            Paragraph::new(Span::styled(
                hint,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }
    }

    fn words_paragraph(&self, session: &Session, width: u16) -> Paragraph<'static> {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let done_style = Style::default().fg(Color::Green).add_modifier(Modifier::DIM);
        let typed_style = Style::default().patch(bold_style).fg(Color::Green);
        let current_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::UNDERLINED);
        let upcoming_style = Style::default().patch(bold_style).add_modifier(Modifier::DIM);

        let mut spans = Vec::new();
        for (idx, word) in session.words.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" "));
            }
            if idx < session.word_index {
                spans.push(Span::styled(word.clone(), done_style));
                continue;
            }
            let shown = self.engine.display_word(idx).unwrap_or_else(|| word.clone());
            if idx == session.word_index {
                if !session.input.is_empty() {
                    spans.push(Span::styled(session.input.clone(), typed_style));
                    spans.push(Span::raw("|"));
                }
                spans.push(Span::styled(shown, current_style));
            } else {
                spans.push(Span::styled(shown, upcoming_style));
            }
        }

        let text_width: usize = spans.iter().map(|s| s.content.width()).sum();
        let alignment = if text_width <= width as usize {
            // short prompts sit centred
            Alignment::Center
        } else {
            Alignment::Left
        };

        Paragraph::new(Line::from(spans))
            .alignment(alignment)
            .wrap(Wrap { trim: true })
    }
}

fn hud_line(session: &Session) -> Paragraph<'static> {
    let hearts = "♥".repeat(session.lives as usize);
    let mut spans = vec![
        Span::styled(
            format!("LEVEL {}/{}", session.level, MAX_LEVEL),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(format!("SCORE {}", session.score)),
        Span::raw("  "),
        Span::styled(
            format!("COMBO x{}", session.combo),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(hearts, Style::default().fg(Color::Red)),
    ];
    if session.level == MAX_LEVEL && session.rotation > 0.0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("TILT {:.0}°", session.rotation),
            Style::default().fg(Color::Magenta),
        ));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}
