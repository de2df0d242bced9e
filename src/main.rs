mod app;
mod braille;
mod color;
mod config;
mod export;
mod maze;
mod presets;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus};
use clap::Parser;
use color::ColorScheme;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use presets::PresetManager;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::{ColorMode, WallStyle};
use simulation::MAX_PARTICLES;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "maze-drift")]
#[command(about = "Maze-confined particle drift animation in the terminal")]
struct Args {
    /// Number of particles (1-500)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Maze cell size in simulation pixels (6-32); smaller = narrower corridors
    #[arg(long = "cell-size")]
    cell_size: Option<f32>,

    /// Trail length in past positions (0-60)
    #[arg(long)]
    trail: Option<usize>,

    /// Headings sampled when a particle is blocked (4-64)
    #[arg(long = "probe-samples")]
    probe_samples: Option<usize>,

    /// Probe distance as a fraction of the cell size (0.1-1.0)
    #[arg(long = "probe-distance")]
    probe_distance: Option<f32>,

    /// Lower bound of the per-redirect speed draw
    #[arg(long = "min-speed")]
    min_speed: Option<f32>,

    /// Upper bound of the per-redirect speed draw
    #[arg(long = "max-speed")]
    max_speed: Option<f32>,

    /// Global speed multiplier (0.1-4.0)
    #[arg(long = "speed-scale")]
    speed_scale: Option<f32>,

    /// Hue advance per tick in degrees (0-10)
    #[arg(long = "hue-drift")]
    hue_drift: Option<f32>,

    /// Simulation ticks per rendered frame (1-10)
    #[arg(long)]
    speed: Option<usize>,

    /// Color scheme (rainbow, fire, ocean, aurora, mono)
    #[arg(long = "color-scheme")]
    color_scheme: Option<String>,

    /// Color mode (hue, heading, speed)
    #[arg(long = "color-mode")]
    color_mode: Option<String>,

    /// Wall style (solid, dim, hidden)
    #[arg(long)]
    walls: Option<String>,

    /// Start from a named preset (see --list-presets)
    #[arg(long)]
    preset: Option<String>,

    /// Load a config file exported earlier
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config (preset and flags applied) to a JSON file and exit
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// List available presets and exit
    #[arg(long = "list-presets")]
    list_presets: bool,

    /// Delete a user preset by name and exit
    #[arg(long = "delete-preset")]
    delete_preset: Option<String>,
}

fn parse_color_scheme(s: &str) -> ColorScheme {
    match s.to_lowercase().as_str() {
        "fire" => ColorScheme::Fire,
        "ocean" => ColorScheme::Ocean,
        "aurora" => ColorScheme::Aurora,
        "mono" | "gray" | "grey" => ColorScheme::Mono,
        _ => ColorScheme::Rainbow,
    }
}

fn parse_color_mode(s: &str) -> ColorMode {
    match s.to_lowercase().as_str() {
        "heading" | "direction" | "dir" => ColorMode::Heading,
        "speed" => ColorMode::Speed,
        _ => ColorMode::Hue,
    }
}

fn parse_wall_style(s: &str) -> WallStyle {
    match s.to_lowercase().as_str() {
        "solid" => WallStyle::Solid,
        "hidden" | "none" => WallStyle::Hidden,
        _ => WallStyle::Dim,
    }
}

/// Explicit CLI flags win over config file and preset values
fn apply_cli_overrides(config: &mut AppConfig, args: &Args) {
    let settings = &mut config.settings;

    if let Some(v) = args.particles {
        settings.num_particles = v.clamp(1, MAX_PARTICLES);
    }
    if let Some(v) = args.cell_size {
        settings.cell_size = v.clamp(6.0, 32.0);
    }
    if let Some(v) = args.trail {
        settings.trail_length = v.clamp(0, 60);
    }
    if let Some(v) = args.probe_samples {
        settings.probe_samples = v.clamp(4, 64);
    }
    if let Some(v) = args.probe_distance {
        settings.probe_distance = v.clamp(0.1, 1.0);
    }
    if let Some(v) = args.min_speed {
        settings.min_speed = v.clamp(0.1, settings.max_speed);
    }
    if let Some(v) = args.max_speed {
        settings.max_speed = v.clamp(settings.min_speed, 8.0);
    }
    if let Some(v) = args.speed_scale {
        settings.speed_scale = v.clamp(0.1, 4.0);
    }
    if let Some(v) = args.hue_drift {
        settings.hue_drift = v.clamp(0.0, 10.0);
    }
    if let Some(v) = args.speed {
        config.ticks_per_frame = v.clamp(1, 10);
    }
    if let Some(s) = &args.color_scheme {
        config.color_scheme = parse_color_scheme(s);
    }
    if let Some(s) = &args.color_mode {
        settings.color_mode = parse_color_mode(s);
    }
    if let Some(s) = &args.walls {
        settings.wall_style = parse_wall_style(s);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.list_presets {
        let manager = PresetManager::new();
        for preset in manager.all_presets() {
            println!("{:<12} {}", preset.name, preset.description);
        }
        return Ok(());
    }

    if let Some(name) = &args.delete_preset {
        let mut manager = PresetManager::new();
        manager.delete_preset(name)?;
        println!("Deleted preset {}", name);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(name) = &args.preset {
        let manager = PresetManager::new();
        let preset = manager
            .find(name)
            .ok_or_else(|| format!("Unknown preset: {} (try --list-presets)", name))?;
        config.settings = preset.settings.clone();
        config.color_scheme = preset.color_scheme;
    }

    apply_cli_overrides(&mut config, &args);

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Size the simulation to the initial terminal
    let size = terminal.size()?;
    let frame_rect = ratatui::layout::Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
    let mut app = App::new(canvas_width, canvas_height, config);

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.regenerate(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                        KeyCode::Char('h') | KeyCode::Char('H') => app.toggle_help(),

                        // Presets on number keys
                        KeyCode::Char(c @ '1'..='9') => {
                            app.apply_preset_index(c as usize - '1' as usize);
                        }

                        // Cycling keys
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            app.cycle_color_scheme();
                            app.focus = Focus::ColorScheme;
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') => {
                            app.cycle_color_mode();
                            app.focus = Focus::ColorMode;
                        }
                        KeyCode::Char('w') | KeyCode::Char('W') => {
                            app.cycle_wall_style();
                            app.focus = Focus::WallStyle;
                        }

                        // Direct adjusters
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            app.simulation.adjust_particles(10);
                            app.focus = Focus::Particles;
                        }
                        KeyCode::Char('o') | KeyCode::Char('O') => {
                            app.simulation.adjust_particles(-10);
                            app.focus = Focus::Particles;
                        }
                        KeyCode::Char('[') => {
                            app.simulation.settings.adjust_trail_length(-5);
                            app.focus = Focus::Trail;
                        }
                        KeyCode::Char(']') => {
                            app.simulation.settings.adjust_trail_length(5);
                            app.focus = Focus::Trail;
                        }
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.increase_speed();
                            app.focus = Focus::TicksPerFrame;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.decrease_speed();
                            app.focus = Focus::TicksPerFrame;
                        }

                        // Export
                        KeyCode::Char('x') | KeyCode::Char('X') => app.snapshot(),
                        KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_recording(),
                        KeyCode::Char('s') | KeyCode::Char('S') => app.save_current_as_preset(),

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else {
                                    let term_size = terminal.size().unwrap_or_default();
                                    let visible = ui::get_controls_visible_lines(term_size.height);
                                    app.scroll_controls_down(
                                        ui::CONTROLS_CONTENT_LINES.saturating_sub(visible),
                                    );
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    // A resize is a full reset: new maze, fresh particles
                    let (canvas_width, canvas_height) = ui::get_canvas_size(
                        ratatui::layout::Rect {
                            x: 0,
                            y: 0,
                            width,
                            height,
                        },
                        app.fullscreen_mode,
                    );
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        // Run simulation tick
        app.tick();
    }
}
