// SPDX-License-Identifier: GPL-3.0-only

//! Terminal capture screen
//!
//! Renders the live feed, the confirm/retake preview, the review modal and
//! the thumbnail strip with Unicode half-block characters, and feeds key
//! presses to the capture session.

use crate::app::{CaptureSession, ControlState, Layer, Message, PermissionState, ScreenView};
use crate::backends::camera::{CameraFrame, DevicePermission, GstCamera};
use crate::config::Config;
use crate::constants::{MAX_PHOTOS, text, timing};
use crate::storage::{FsPhotoStore, load_thumbnail};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use tracing::{error, info};

type TerminalSession = CaptureSession<DevicePermission, GstCamera, FsPhotoStore>;

/// Rows reserved for the thumbnail strip (border included)
const STRIP_HEIGHT: u16 = 7;
/// Columns per thumbnail cell
const THUMB_WIDTH: u16 = 12;
/// Decoded photos are kept at most this large
const CACHE_MAX: (u32, u32) = (640, 480);

/// Run the capture screen until the user quits
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let mut session = CaptureSession::new(
        DevicePermission::new(config.camera_path.as_ref().map(PathBuf::from)),
        GstCamera::new(&config),
        FsPhotoStore::new(config.photos_dir.clone()),
        config.default_flash,
    );

    let permission = runtime.block_on(session.ensure_permission());
    info!(
        ?permission,
        photos_dir = %session.store().photos_dir().display(),
        "Starting capture screen"
    );

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &runtime, &mut session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &tokio::runtime::Runtime,
    session: &mut TerminalSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut images = ImageCache::default();
    let mut camera_start_attempted = false;

    loop {
        // The pipeline opens the device, so it waits for permission
        if session.permission() == PermissionState::Granted && !camera_start_attempted {
            camera_start_attempted = true;
            if let Err(e) = session.camera().start() {
                error!(error = %e, "Failed to start camera");
                session.notify_camera_failure(e);
            }
        }

        let live = session.camera().latest_frame();
        terminal.draw(|f| draw(f, &session.view(), live.as_deref(), &mut images))?;

        if event::poll(timing::INPUT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || key.code == KeyCode::Char('q') {
                break;
            }

            let message = key_to_message(key.code, &session.view());
            if let Some(message) = message {
                // Capture and confirm block the loop until the camera or
                // filesystem answers
                runtime.block_on(session.update(message));
            }
        }
    }

    Ok(())
}

/// Map a key to a message, honouring disabled controls
pub fn key_to_message(code: KeyCode, view: &ScreenView<'_>) -> Option<Message> {
    if view.notice.is_some() {
        return Some(Message::DismissNotice);
    }

    let message = match code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Message::Capture,
        KeyCode::Char('f') => Message::ToggleFlash,
        KeyCode::Char('y') | KeyCode::Enter => Message::Confirm,
        KeyCode::Char('r') => Message::Retake,
        KeyCode::Char(c @ '1'..='8') => {
            let index = c as usize - '1' as usize;
            if index >= view.thumbnails.len() {
                return None;
            }
            Message::SelectSaved(index)
        }
        KeyCode::Char('d') => Message::DeleteSaved,
        KeyCode::Esc | KeyCode::Char('c') => Message::CloseReview,
        KeyCode::Char('g') => Message::RequestPermission,
        _ => return None,
    };

    view.controls.allows(&message).then_some(message)
}

/// First thumbnail shown when the strip is narrower than the photo list
pub fn strip_offset(count: usize, visible: usize, selected: Option<usize>) -> usize {
    if visible == 0 || count <= visible {
        return 0;
    }
    match selected {
        Some(index) if index < visible => 0,
        Some(index) => index + 1 - visible,
        None => count - visible,
    }
}

fn draw(
    f: &mut Frame<'_>,
    view: &ScreenView<'_>,
    live: Option<&CameraFrame>,
    images: &mut ImageCache,
) {
    let [main, strip, bar] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(STRIP_HEIGHT),
        Constraint::Length(2),
    ])
    .areas(f.area());

    match &view.layer {
        Layer::PermissionBlocked => draw_permission_prompt(f, main, &view.controls),
        Layer::LiveFeed | Layer::SavedPhotoReview { .. } => draw_live_feed(f, main, live),
        Layer::CapturePreview(pending) => {
            let buttons = [
                ("r", "Retake", view.controls.retake),
                ("y", "Confirm", view.controls.confirm),
            ];
            draw_photo_panel(f, main, "Preview", images.get(&pending.path), &buttons);
        }
    }

    let selected = match &view.layer {
        Layer::SavedPhotoReview { index, .. } => Some(*index),
        _ => None,
    };
    draw_strip(f, strip, view, selected, images);
    draw_controls_bar(f, bar, view);

    if let Layer::SavedPhotoReview { photo, .. } = &view.layer {
        let popup = centered_rect(f.area(), f.area().width * 4 / 5, f.area().height * 4 / 5);
        f.render_widget(Clear, popup);
        let buttons = [
            ("d", "Delete Photo", view.controls.delete),
            ("Esc", "Close", view.controls.close_review),
        ];
        draw_photo_panel(f, popup, text::REVIEW_TITLE, images.get(&photo.path), &buttons);
    }

    if let Some(notice) = view.notice {
        let popup = centered_rect(f.area(), 50, 7);
        f.render_widget(Clear, popup);
        let body = vec![
            Line::from(notice.body.as_str()),
            Line::from(""),
            Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
        ];
        f.render_widget(
            Paragraph::new(body)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().title(notice.title.as_str())),
            popup,
        );
    }
}

fn draw_permission_prompt(f: &mut Frame<'_>, area: Rect, controls: &ControlState) {
    let lines = vec![
        Line::from(text::PERMISSION_PROMPT),
        Line::from(""),
        hint_line(&[("g", text::GRANT_PERMISSION, controls.request_permission)]),
    ];
    let inner = centered_rect(area, area.width.min(60), 5);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

fn draw_live_feed(f: &mut Frame<'_>, area: Rect, live: Option<&CameraFrame>) {
    match live {
        Some(frame) => f.render_widget(
            HalfBlockImage::new(frame.width, frame.height, |x, y| frame.rgb_at(x, y)),
            area,
        ),
        None => {
            let placeholder = centered_rect(area, area.width, 1);
            f.render_widget(
                Paragraph::new("Waiting for camera...").alignment(Alignment::Center),
                placeholder,
            );
        }
    }
}

/// Bordered panel with an image and a row of button hints
fn draw_photo_panel(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    image: Option<&image::RgbImage>,
    buttons: &[(&str, &str, bool)],
) {
    let block = Block::bordered().title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [picture, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    match image {
        Some(img) => f.render_widget(rgb_image_widget(img), picture),
        None => f.render_widget(
            Paragraph::new("(photo unavailable)").alignment(Alignment::Center),
            centered_rect(picture, picture.width, 1),
        ),
    }

    f.render_widget(
        Paragraph::new(hint_line(buttons)).alignment(Alignment::Center),
        footer,
    );
}

fn draw_strip(
    f: &mut Frame<'_>,
    area: Rect,
    view: &ScreenView<'_>,
    selected: Option<usize>,
    images: &mut ImageCache,
) {
    let block = Block::bordered().title("Gallery");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = (inner.width / THUMB_WIDTH) as usize;
    let offset = strip_offset(view.thumbnails.len(), visible, selected);

    for (slot, (index, photo)) in view
        .thumbnails
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let cell = Rect {
            x: inner.x + slot as u16 * THUMB_WIDTH,
            y: inner.y,
            width: THUMB_WIDTH - 1,
            height: inner.height,
        };
        let [label, picture] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(cell);

        let mut style = Style::default().fg(Color::White);
        if selected == Some(index) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        f.render_widget(
            Paragraph::new(Span::styled(format!("{}", index + 1), style))
                .alignment(Alignment::Center),
            label,
        );

        if let Some(img) = images.get(&photo.path) {
            f.render_widget(rgb_image_widget(img), picture);
        }
    }
}

fn draw_controls_bar(f: &mut Frame<'_>, area: Rect, view: &ScreenView<'_>) {
    let [counter, hints] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    f.render_widget(
        Paragraph::new(view.counter.as_str()).alignment(Alignment::Center),
        counter,
    );

    let open_keys = format!("1-{}", view.thumbnails.len().clamp(1, MAX_PHOTOS));
    let controls = &view.controls;
    f.render_widget(
        Paragraph::new(hint_line(&[
            ("f", view.flash_label, controls.toggle_flash),
            ("space", "Take Picture", controls.capture),
            (
                open_keys.as_str(),
                "Open",
                controls.select_thumbnail && !view.thumbnails.is_empty(),
            ),
            ("q", "Quit", true),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::DarkGray)),
        hints,
    );
}

/// "[key] Label" hints; disabled ones are dimmed
fn hint_line<'a>(hints: &[(&'a str, &'a str, bool)]) -> Line<'a> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, label, enabled)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        let style = if *enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!("[{}] ", key), style.add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(*label, style));
    }
    Line::from(spans)
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Decoded photos keyed by path; failed decodes are remembered too
#[derive(Default)]
struct ImageCache {
    images: HashMap<PathBuf, Option<image::RgbImage>>,
}

impl ImageCache {
    fn get(&mut self, path: &Path) -> Option<&image::RgbImage> {
        self.images
            .entry(path.to_path_buf())
            .or_insert_with(|| load_thumbnail(path, CACHE_MAX.0, CACHE_MAX.1))
            .as_ref()
    }
}

fn rgb_image_widget(
    img: &image::RgbImage,
) -> HalfBlockImage<impl Fn(u32, u32) -> (u8, u8, u8) + '_> {
    let (width, height) = img.dimensions();
    HalfBlockImage::new(width, height, move |x, y| {
        let px = img.get_pixel(x.min(width - 1), y.min(height - 1));
        (px[0], px[1], px[2])
    })
}

/// Image scaled into an area using half-block characters, aspect preserved
struct HalfBlockImage<F> {
    width: u32,
    height: u32,
    sample: F,
}

impl<F: Fn(u32, u32) -> (u8, u8, u8)> HalfBlockImage<F> {
    fn new(width: u32, height: u32, sample: F) -> Self {
        Self {
            width,
            height,
            sample,
        }
    }
}

impl<F: Fn(u32, u32) -> (u8, u8, u8)> Widget for HalfBlockImage<F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.width == 0 || self.height == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Each cell shows two vertical pixels
        let aspect = self.width as f64 / self.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > aspect {
            let h = term_height;
            ((h * aspect) as u16, (h / 2.0) as u16)
        } else {
            let w = term_width;
            (w as u16, (w / aspect / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = self.width as f64 / display_width as f64;
        let y_scale = self.height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (tr, tg, tb) = (self.sample)(src_x, src_y_top);
                let (br, bg, bb) = (self.sample)(src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(tr, tg, tb));
                    cell.set_bg(Color::Rgb(br, bg, bb));
                }
            }
        }
    }
}
