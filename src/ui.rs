use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;
const STATUS_HEIGHT: u16 = 6;
const PARAMS_HEIGHT: u16 = 15;

/// Upper bound on help scroll; padded because narrow terminals wrap lines.
pub const HELP_CONTENT_LINES: u16 = 44;

/// Lines in the controls box, for scroll clamping.
pub const CONTROLS_CONTENT_LINES: u16 = 14;

const ACCENT: Color = Color::Cyan;
const FOCUSED: Color = Color::Yellow;
const TEXT: Color = Color::White;
const MUTED: Color = Color::Gray;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(title)
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        render_sidebar(frame, columns[0], app);
        render_canvas(frame, columns[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Character cells available to the canvas once borders (and the sidebar,
/// unless fullscreen) are taken out.
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    let sidebar = if fullscreen { 0 } else { SIDEBAR_WIDTH };
    (
        frame_area.width.saturating_sub(sidebar + 2),
        frame_area.height.saturating_sub(2),
    )
}

/// How many controls lines fit under the status and params boxes.
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    terminal_height.saturating_sub(STATUS_HEIGHT + PARAMS_HEIGHT + 2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Length(PARAMS_HEIGHT),
            Constraint::Min(8),
        ])
        .split(area);

    render_status_box(frame, rows[0], app);
    render_params_box(frame, rows[1], app);
    render_controls_box(frame, rows[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let maze = app.simulation.maze();

    let (state, state_color) = if app.simulation.paused {
        ("PAUSED", FOCUSED)
    } else if app.is_recording() {
        ("RECORDING", Color::Red)
    } else {
        ("RUNNING", ACCENT)
    };

    let mut lines = vec![
        Line::styled(
            format!("{} particles", app.simulation.particles().len()),
            TEXT,
        ),
        Line::styled(
            format!(
                "{}x{} cells  t={}",
                maze.cols(),
                maze.rows(),
                app.simulation.ticks()
            ),
            MUTED,
        ),
        Line::styled(state, state_color),
    ];
    if let Some(notice) = &app.notice {
        lines.push(Line::styled(notice.clone(), MUTED));
    }

    frame.render_widget(Paragraph::new(lines).block(panel(" Maze Drift ")), area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let s = &app.simulation.settings;

    let rows: [(Focus, &str, String); 13] = [
        (Focus::CellSize, "Cell", format!("{:.0}px", s.cell_size)),
        (Focus::ColorMode, "Mode", s.color_mode.name().into()),
        (Focus::ColorScheme, "Scheme", app.color_scheme.name().into()),
        (Focus::HueDrift, "Hue drift", format!("{:.2}", s.hue_drift)),
        (Focus::MaxSpeed, "Max speed", format!("{:.2}", s.max_speed)),
        (Focus::MinSpeed, "Min speed", format!("{:.2}", s.min_speed)),
        (Focus::Particles, "Particles", s.num_particles.to_string()),
        (
            Focus::ProbeDistance,
            "Probe dist",
            format!("{:.2}", s.probe_distance),
        ),
        (Focus::ProbeSamples, "Probes", s.probe_samples.to_string()),
        (Focus::SpeedScale, "Scale", format!("{:.1}", s.speed_scale)),
        (
            Focus::TicksPerFrame,
            "Ticks/frame",
            app.ticks_per_frame.to_string(),
        ),
        (Focus::Trail, "Trail", s.trail_length.to_string()),
        (Focus::WallStyle, "Walls", s.wall_style.name().into()),
    ];

    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(focus, label, value)| {
            if app.focus == focus {
                Line::styled(format!("> {}: {}", label, value), FOCUSED)
            } else {
                Line::styled(format!("  {}: {}", label, value), TEXT)
            }
        })
        .collect();

    // Keep the focused row visible when the box is shorter than the list.
    let visible = area.height.saturating_sub(2).max(1);
    let scroll = app.focus.line_index().saturating_sub(visible - 1);

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel(" Parameters "))
            .scroll((scroll, 0)),
        area,
    );
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let s = &app.simulation.settings;

    let bindings = [
        ("Space", "pause/resume".to_string()),
        ("R", "new maze".to_string()),
        ("H", "help".to_string()),
        ("1-8", "presets".to_string()),
        ("C", format!("scheme: {}", app.color_scheme.name())),
        ("M", format!("mode: {}", s.color_mode.name())),
        ("W", format!("walls: {}", s.wall_style.name())),
        ("P/O", "particles +/-".to_string()),
        ("[/]", format!("trail: {}", s.trail_length)),
        ("+/-", "ticks per frame".to_string()),
        ("X", "png snapshot".to_string()),
        ("G", "gif record".to_string()),
        ("S", "save preset".to_string()),
        ("Q", "quit".to_string()),
    ];

    let lines: Vec<Line> = bindings
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:>5}", key), Style::default().fg(FOCUSED)),
                Span::styled(format!(" {}", desc), Style::default().fg(MUTED)),
            ])
        })
        .collect();

    let scrollable = lines.len() as u16 > area.height.saturating_sub(2);
    let title = if scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel(title))
            .scroll((app.controls_scroll, 0)),
        area,
    );
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let border = panel("");
    let inner = border.inner(area);
    frame.render_widget(border, area);

    let cells =
        braille::render_to_braille(&app.simulation, inner.width, inner.height, &app.color_lut);

    let buf = frame.buffer_mut();
    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;
        if x < inner.right() && y < inner.bottom() {
            if let Some(slot) = buf.cell_mut((x, y)) {
                slot.set_char(cell.char).set_fg(cell.color);
            }
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let help_area = help_rect(area, app.fullscreen_mode);
    frame.render_widget(Clear, help_area);

    let heading = |text: &'static str| Line::styled(text, FOCUSED);
    let entry = |text: &'static str| Line::styled(text, TEXT);

    let content = vec![
        Line::raw(""),
        Line::styled("MAZE DRIFT", ACCENT),
        Line::raw(""),
        Line::raw("A perfect maze is carved for the current terminal size and particles wander its corridors forever, changing heading whenever a wall blocks the way."),
        Line::raw(""),
        heading("PRESETS (1-8):"),
        Line::raw("1=Classic, 2=Comet, 3=Swarm, 4=Fine Grid, 5=Broad Halls, 6=Ghosts, 7=Compass, 8=Slow Drift"),
        Line::raw(""),
        heading("TUNING:"),
        Line::raw(""),
        entry("M - Color Mode"),
        Line::raw("Hue (drifting rainbow), Heading (direction tint), Speed (fast runners glow)"),
        Line::raw(""),
        entry("W - Wall Style"),
        Line::raw("Solid, Dim or Hidden; hidden walls still steer the particles"),
        Line::raw(""),
        entry("Cell size"),
        Line::raw("Smaller cells mean narrower corridors; changing it carves a new maze"),
        Line::raw(""),
        entry("Probes"),
        Line::raw("Headings tested when blocked, and how far ahead each one looks"),
        Line::raw(""),
        heading("EXPORT:"),
        Line::raw("X writes a PNG snapshot, G starts/stops a looping GIF capture, S saves the current tuning as a preset"),
        Line::raw(""),
        heading("BASIC CONTROLS:"),
        Line::raw("Space=Pause, R=New maze, V=Fullscreen, Tab/Arrows=Adjust, +/-=Ticks per frame, Q=Quit"),
        Line::raw(""),
        Line::raw("Resizing the terminal carves a fresh maze and re-seeds every particle."),
        Line::raw(""),
    ];

    let scrollable = content.len() as u16 > help_area.height.saturating_sub(2);
    let title = if scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let dialog = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(FOCUSED))
        .title(title);

    frame.render_widget(
        Paragraph::new(content)
            .block(dialog)
            .wrap(Wrap { trim: true })
            .scroll((app.help_scroll, 0)),
        help_area,
    );
}

/// Dialog centered over the canvas column (over the whole frame in
/// fullscreen).
fn help_rect(area: Rect, fullscreen: bool) -> Rect {
    let left = if fullscreen { 0 } else { SIDEBAR_WIDTH };
    let span = area.width.saturating_sub(left);
    let width = span.saturating_sub(4).min(56);
    let height = area.height.saturating_sub(4).min(36);
    Rect {
        x: area.x + left + span.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
