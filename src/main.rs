use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use indoc::indoc;
use ratatui::layout::Rect as CellRect;
use ratatui::widgets::{Paragraph, Wrap};
use tracing::Level;

use term_dock::dock::{LayoutItem, TabWidget};
use term_dock::drivers::OutputDriver;
use term_dock::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_dock::event_loop::{ControlFlow, EventLoop, LoopEvent};
use term_dock::log_buffer::{LogHandle, set_global_log};
use term_dock::ui::{self, UiFrame};
use term_dock::{
    DockLocation, DockTarget, Docker, DockerOptions, Edge, EventType, NodeId, Panel, PanelOptions,
    PanelType, tracing_sub,
};

const NOTES_HELP: &str = indoc! {"
    Drag a tab or title to move a panel.
    Drop on a frame edge to split it, on a
    title strip to stack, outside to float.

    n  new notes panel     c  toggle bottom drawer
    s  save layout         Esc  cancel drag
    q  quit
"};

#[derive(Debug, Parser)]
#[command(name = "term-dock", about = "Docking window manager demo")]
struct Args {
    /// Restore this layout on start.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Write the layout here on exit and on `s`.
    #[arg(long)]
    save: Option<PathBuf>,
    /// JSON file with docker options.
    #[arg(long)]
    options: Option<PathBuf>,
    /// Delay in milliseconds before a drag starts re-targeting.
    #[arg(long)]
    move_delay: Option<u64>,
    /// Minimum milliseconds between layout passes.
    #[arg(long)]
    response_rate: Option<u64>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let log = LogHandle::default();
    set_global_log(log.clone());
    tracing_sub::install(Level::DEBUG);

    let mut docker = Docker::new(load_options(&args)?);
    register_panel_types(&mut docker);
    match &args.layout {
        Some(path) => docker.load_from_path(path).map_err(io::Error::other)?,
        None => default_layout(&mut docker).map_err(io::Error::other)?,
    }

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let result = run(&mut docker, &mut output, &log, args.save.as_deref());
    output.exit()?;

    if let Some(path) = &args.save {
        docker.save_to_path(path).map_err(io::Error::other)?;
    }
    result
}

fn load_options(args: &Args) -> io::Result<DockerOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            DockerOptions::from_json(&text).map_err(io::Error::other)?
        }
        None => DockerOptions::terminal(),
    };
    if let Some(ms) = args.move_delay {
        options.move_start_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = args.response_rate {
        options.response_rate = Duration::from_millis(ms);
    }
    Ok(options)
}

fn register_panel_types(docker: &mut Docker) {
    docker.register_panel_type(
        "notes",
        PanelType::new(|panel, _| {
            panel.layout_mut().add_item(LayoutItem::Text(NOTES_HELP.to_string()), 0, 0, 1, 1);
            panel.add_button("pin", "*", "Keep this panel", true);
            Box::new(())
        })
        .title("Notes"),
    );
    docker.register_panel_type(
        "tabs",
        PanelType::new(|panel, _| {
            let mut widget = TabWidget::new();
            for title in ["alpha", "beta", "gamma"] {
                widget.add_tab(title);
            }
            panel.layout_mut().add_item(LayoutItem::Tabs(widget), 0, 0, 1, 1);
            panel.layout_mut().add_item(
                LayoutItem::Text("Middle-click a tab to close it.".to_string()),
                0,
                1,
                1,
                3,
            );
            Box::new(())
        })
        .title("Tabs"),
    );
    docker.register_panel_type(
        "log",
        PanelType::new(|panel, _| {
            panel.on(EventType::Closing, |_| {
                tracing::debug!("log panel hidden; press c to bring the drawer back");
                true
            });
            Box::new(())
        })
        .title("Log")
        .limit(1)
        .persistent(),
    );
    docker.register_panel_type(
        "inspector",
        PanelType::new(|_, _| Box::new(())).title("Inspector").limit(1),
    );
}

fn default_layout(docker: &mut Docker) -> term_dock::DockResult<()> {
    let notes = docker.add_panel(
        "notes",
        DockLocation::Left,
        DockTarget::Auto,
        PanelOptions::default(),
    )?;
    let frame = docker.frame_of(notes).map(DockTarget::Frame).unwrap_or_default();
    docker.add_panel("tabs", DockLocation::Right, frame, PanelOptions::default())?;
    docker.add_panel(
        "log",
        DockLocation::Bottom,
        DockTarget::Collapsed,
        PanelOptions::default(),
    )?;
    docker.add_panel(
        "inspector",
        DockLocation::Float,
        DockTarget::Auto,
        PanelOptions::default(),
    )?;
    Ok(())
}

fn run(
    docker: &mut Docker,
    output: &mut ConsoleOutputDriver,
    log: &LogHandle,
    save: Option<&std::path::Path>,
) -> io::Result<()> {
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), Duration::from_millis(16));
    event_loop.run(|_, event| {
        match event {
            LoopEvent::Tick(now) => {
                let area = output.area()?;
                docker.resize_surface(ui::surface_rect(area));
                docker.tick(now);
                let inspector = inspector_lines(docker);
                let docker = &*docker;
                output.draw(|mut frame| {
                    ui::render_docker(&mut frame, docker, |frame, _, panel, body| {
                        render_content(frame, panel, body, log, &inspector);
                    });
                })?;
            }
            LoopEvent::Input(event) => {
                if ui::input::dispatch(docker, &event, std::time::Instant::now()) {
                    return Ok(ControlFlow::Continue);
                }
                if let Event::Key(key) = event
                    && key.kind != KeyEventKind::Release
                {
                    match key.code {
                        KeyCode::Char('q') => return Ok(ControlFlow::Quit),
                        KeyCode::Char('n') => add_notes(docker),
                        KeyCode::Char('c') => toggle_drawer(docker),
                        KeyCode::Char('s') => {
                            if let Some(path) = save
                                && let Err(err) = docker.save_to_path(path)
                            {
                                tracing::warn!(%err, path = %path.display(), "save failed");
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(ControlFlow::Continue)
    })
}

fn add_notes(docker: &mut Docker) {
    let target = ui::default_target(docker);
    let location = match target {
        DockTarget::Frame(_) => DockLocation::Stacked,
        _ => DockLocation::Right,
    };
    if let Err(err) = docker.add_panel("notes", location, target, PanelOptions::default()) {
        tracing::warn!(%err, "could not add a notes panel");
    }
}

fn toggle_drawer(docker: &mut Docker) {
    if docker.find_panels(Some("log")).is_empty()
        && let Err(err) = docker.add_panel(
            "log",
            DockLocation::Bottom,
            DockTarget::Collapsed,
            PanelOptions::default(),
        )
    {
        tracing::warn!(%err, "could not reopen the log");
        return;
    }
    if docker.is_expanded(Edge::Bottom) {
        docker.collapse(Edge::Bottom, false);
    } else {
        docker.expand(Edge::Bottom);
    }
}

fn inspector_lines(docker: &Docker) -> Vec<String> {
    let focus = docker
        .focused_frame()
        .map(|id: NodeId| id.to_string())
        .unwrap_or_else(|| "none".to_string());
    let surface = docker.surface();
    vec![
        format!("surface  {}x{}", surface.width, surface.height),
        format!("focus    {focus}"),
        format!("drag     {:?}", docker.drag_mode()),
        format!("panels   {}", docker.find_panels(None).len()),
        format!("floating {}", docker.floating_frames().len()),
    ]
}

fn render_content(
    frame: &mut UiFrame<'_>,
    panel: &Panel,
    body: CellRect,
    log: &LogHandle,
    inspector: &[String],
) {
    let lines = match panel.type_name() {
        "log" => log.tail(body.height as usize),
        "inspector" => inspector.to_vec(),
        _ => return,
    };
    frame.render_widget(
        Paragraph::new(lines.join("\n")).wrap(Wrap { trim: false }),
        body,
    );
}
