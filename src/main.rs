use scrubline::cli::Args;
use scrubline::core::FreezeContext;
use scrubline::widgets::timeline::{TimelineConfig, TimelineState, render_timeline};
use scrubline::{ControlEvent, ControlEventSender, ControlOptions, TimelineControl};

use clap::Parser;
use crossbeam_channel::Receiver;
use eframe::egui;
use log::{debug, info};

/// Slice of session state worth keeping across runs.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct SavedSession {
    current_time: f64,
    interval_start: f64,
    interval_end: f64,
    snapped: bool,
}

/// Demo host application. Owns a synthetic frame sequence and plays the host
/// role of the protocol: it drains the control's events, "produces" the frame
/// for every playback request and acknowledges it on the next update.
struct ScrublineApp {
    control: TimelineControl,
    events: Receiver<ControlEvent>,
    timeline_state: TimelineState,
    timeline_config: TimelineConfig,
    /// Time of the last frame the host produced.
    displayed_time: f64,
    last_event: Option<ControlEvent>,
}

impl ScrublineApp {
    fn new(args: &Args, storage: Option<&dyn eframe::Storage>) -> Self {
        let fps = if args.fps.is_finite() && args.fps > 0.0 {
            args.fps
        } else {
            30.0
        };
        let frame_times: Vec<f64> = (0..args.frames.max(2)).map(|i| i as f64 / fps).collect();
        let video_end = frame_times.last().copied().unwrap_or(0.0);

        let (sender, events) = ControlEventSender::channel();
        let mut control = TimelineControl::new(
            ControlOptions {
                video_start: 0.0,
                video_end,
                frame_times,
            },
            sender,
        );
        // Restore the previous session's position through the host API; the
        // control clamps anything that no longer fits the sequence.
        let session: Option<SavedSession> = storage
            .and_then(|s| s.get_string(eframe::APP_KEY))
            .and_then(|json| serde_json::from_str(&json).ok());
        if let Some(session) = session {
            info!("restoring session: {session:?}");
            control.request_interval_change(session.interval_start, session.interval_end);
            control.request_time_change(session.current_time);
            if session.snapped {
                control.toggle_snap();
            }
        }
        control.set_frame_snapping(args.snap_frames);

        if args.autoplay {
            control.transport(scrubline::PlaybackRequest::PlayToggle);
        }

        let displayed_time = control.current_time();
        Self {
            control,
            events,
            timeline_state: TimelineState::default(),
            timeline_config: TimelineConfig::default(),
            displayed_time,
            last_event: None,
        }
    }

    /// Host side of the ack protocol: seek to every requested time, then
    /// report the frame ready so the control commits it.
    fn drain_events(&mut self) {
        let mut acks = 0;
        while let Ok(event) = self.events.try_recv() {
            debug!("host event: {event:?}");
            match &event {
                ControlEvent::PlaybackRequested { time, .. } => {
                    self.displayed_time = *time;
                    acks += 1;
                }
                ControlEvent::CurrentTimeChanged { time } => {
                    self.displayed_time = *time;
                }
                ControlEvent::IntervalChanged { .. } | ControlEvent::SnapChanged { .. } => {}
            }
            self.last_event = Some(event);
        }
        for _ in 0..acks {
            self.control.notify_frame_ready();
        }
    }

    fn draw_frame_panel(&self, ui: &mut egui::Ui) {
        // Stand-in for real video: a solid color derived from the time.
        let rect = ui.available_rect_before_wrap();
        let hue = (self.displayed_time * 20.0) as u8;
        ui.painter().rect_filled(
            rect,
            4.0,
            egui::Color32::from_rgb(hue, 60, 140u8.wrapping_sub(hue)),
        );
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            format!("t = {:.3} s", self.displayed_time),
            egui::FontId::monospace(24.0),
            egui::Color32::WHITE,
        );
    }
}

impl eframe::App for ScrublineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("timeline_panel")
            .resizable(false)
            .show(ctx, |ui| {
                render_timeline(
                    ui,
                    &mut self.control,
                    &self.timeline_config,
                    &mut self.timeline_state,
                );
                ui.horizontal(|ui| {
                    let frozen = self.control.is_frozen(FreezeContext::Other);
                    let label = if frozen { "Unfreeze" } else { "Freeze" };
                    if ui
                        .button(label)
                        .on_hover_text("Simulate an automation client freezing the control")
                        .clicked()
                    {
                        if frozen {
                            self.control.unfreeze(FreezeContext::Other);
                        } else {
                            self.control.freeze(FreezeContext::Other);
                        }
                    }
                    if let Some(event) = &self.last_event {
                        ui.monospace(format!("{event:?}"));
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_frame_panel(ui);
        });

        self.drain_events();
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let (interval_start, interval_end) = self.control.interval();
        let session = SavedSession {
            current_time: self.control.current_time(),
            interval_start,
            interval_end,
            snapped: self.control.is_snapped(),
        };
        if let Ok(json) = serde_json::to_string(&session) {
            storage.set_string(eframe::APP_KEY, json);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = args.log_level();
    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .clone()
            .unwrap_or_else(|| std::path::PathBuf::from("scrubline.log"));
        let file = std::fs::File::create(&log_path)?;
        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
        info!("Logging to file: {} (level: {log_level:?})", log_path.display());
    } else {
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info)
            .format_timestamp_millis()
            .init();
    }

    info!("Scrubline timeline demo starting...");
    debug!("Command-line args: {args:?}");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Scrubline v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([900.0, 520.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Scrubline",
        native_options,
        Box::new(move |cc| Ok(Box::new(ScrublineApp::new(&args, cc.storage)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))?;
    Ok(())
}
