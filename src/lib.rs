// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod config;
pub mod error;
pub mod geometry;
pub mod histogram;
pub mod pointer;
pub mod render;
pub mod rotation;
pub mod scale;
pub mod scene;
pub mod state;
pub mod surface;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use tracing::{debug, error, info, warn};

// Standard library imports
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use config::{AngleMeterConfig, Color};
pub use error::{ConfigError, ModelError, SceneError, SetupError};
pub use geometry::{Point, Rect};
pub use pointer::{ModelSource, Placement, PointerModel};
pub use state::{AngleRequest, Delivery};
pub use surface::{Surface, SurfaceHost};

use histogram::Histogram;
use render::Canvas;
use rotation::{format_angle, RotationEngine, RotationTargets};
use scale::{generate_scale, AngleRange, ScaleTick};
use scene::{Element, ElementId, Scene, Shape, Style};
use state::AngleState;

/// Gap between the dial outline and the indicator.
const INDICATOR_GAP: f64 = 3.0;
/// Gap between the dial outline and the label anchor, beyond the indicator.
const LABEL_GAP: f64 = 18.0;
/// Horizontal squeeze applied to the indicator triangle.
const INDICATOR_SQUEEZE: f64 = 0.4;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for angle updates sent from another thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleMeterCommand {
    Rotate(f64),
    RotateWithHistogram(f64),
}

/// Element handles created by the one-time layout pass.
#[derive(Debug)]
struct Layout {
    dial: ElementId,
    ticks: Vec<ScaleTick>,
    indicator: ElementId,
    label: ElementId,
    label_position: Point,
    cross_light: Option<ElementId>,
}

/// Analog angle meter bound to one drawing surface.
///
/// Angles are degrees measured clockwise from the top of the dial. Updates
/// issued before the pointer model has loaded are queued and replayed in
/// order once it attaches.
pub struct AngleMeter {
    config: AngleMeterConfig,
    center: Point,
    scene: Scene,
    state: AngleState,
    histogram: Histogram,
    layout: Option<Layout>,
    loader: Option<Receiver<Result<PointerModel, ModelError>>>,
    font: Option<Font<'static>>,
}

impl AngleMeter {
    pub fn new(config: AngleMeterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let center = config.center();
        let histogram = Histogram::new(config.histogram, center, config.radius);
        Ok(Self {
            config,
            center,
            scene: Scene::new(),
            state: AngleState::new(),
            histogram,
            layout: None,
            loader: None,
            font: None,
        })
    }

    pub fn config(&self) -> &AngleMeterConfig {
        &self.config
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn current_angle(&self) -> f64 {
        self.state.current_angle()
    }

    /// Requests waiting for the pointer model, oldest first.
    pub fn pending(&self) -> &[AngleRequest] {
        self.state.pending()
    }

    pub fn is_drawn(&self) -> bool {
        self.layout.is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn pointer(&self) -> Option<&PointerModel> {
        self.state.engine().map(RotationEngine::model)
    }

    pub fn scale_ticks(&self) -> &[ScaleTick] {
        self.layout.as_ref().map_or(&[], |layout| layout.ticks.as_slice())
    }

    pub fn dial(&self) -> Option<&Element> {
        self.layout_element(|layout| Some(layout.dial))
    }

    pub fn indicator(&self) -> Option<&Element> {
        self.layout_element(|layout| Some(layout.indicator))
    }

    pub fn label(&self) -> Option<&Element> {
        self.layout_element(|layout| Some(layout.label))
    }

    pub fn cross_light(&self) -> Option<&Element> {
        self.layout_element(|layout| layout.cross_light)
    }

    /// Histogram marks in the order they were recorded.
    pub fn histogram_marks(&self) -> impl Iterator<Item = (f64, &Element)> + '_ {
        self.histogram
            .samples()
            .zip(self.histogram.mark_ids())
            .filter_map(|(angle, id)| self.scene.get(id).map(|element| (angle, element)))
    }

    fn layout_element(&self, pick: impl Fn(&Layout) -> Option<ElementId>) -> Option<&Element> {
        let id = pick(self.layout.as_ref()?)?;
        self.scene.get(id)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Bind to the host surface named by `bind_to`, lay out every static
    /// element and start loading the pointer model in the background.
    pub fn draw(&mut self, host: &impl SurfaceHost) -> Result<(), SetupError> {
        if self.layout.is_some() {
            return Err(SetupError::AlreadyDrawn);
        }
        let surface = host
            .surface(&self.config.bind_to)
            .ok_or_else(|| SetupError::SurfaceNotFound(self.config.bind_to.clone()))?;
        let font = match &self.config.font_data {
            Some(data) => Some(Font::try_from_vec(data.clone()).ok_or(SetupError::Font)?),
            None => None,
        };

        let (want_w, want_h) = self.config.preferred_size();
        if surface.width < want_w || surface.height < want_h {
            warn!(
                surface = ?surface,
                want_w, want_h, "surface is smaller than the dial, edges will be clipped"
            );
        }

        self.scene.bind(surface);
        self.font = font;
        self.layout = Some(self.lay_out());

        let model = self.config.model();
        let placement = Placement {
            bounds: self.config.model_bounds(),
            scale_factor: model.scale_factor,
            center: self.center,
        };
        let source = ModelSource::from(model.src);
        info!(
            bind_to = %self.config.bind_to,
            model = %model.id,
            ?source,
            "angle meter drawn, loading pointer model"
        );
        self.loader = Some(pointer::spawn_load(source, placement));
        Ok(())
    }

    /// Check the background loader without blocking. Returns `Ok(true)` once
    /// the pointer model is attached. A load failure is terminal and is
    /// returned by every later call.
    pub fn poll(&mut self) -> Result<bool, SetupError> {
        self.check_failure()?;
        if self.state.is_attached() {
            return Ok(true);
        }
        let Some(loader) = &self.loader else {
            return Ok(false);
        };
        let result = match loader.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return Ok(false),
            Err(TryRecvError::Disconnected) => Err(ModelError::LoaderDisconnected),
        };
        self.loader = None;
        match result {
            Ok(model) => self.attach_model(model).map(|()| true),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Block until the background loader delivers the pointer model.
    pub fn wait_for_model(&mut self) -> Result<(), SetupError> {
        self.check_failure()?;
        if self.state.is_attached() {
            return Ok(());
        }
        let loader = self.loader.take().ok_or(SetupError::NotDrawn)?;
        match loader.recv().map_err(|_| ModelError::LoaderDisconnected) {
            Ok(Ok(model)) => self.attach_model(model),
            Ok(Err(err)) | Err(err) => Err(self.fail(err)),
        }
    }

    /// The model load error, once loading has failed.
    pub fn failure(&self) -> Option<&ModelError> {
        self.state.failure().map(|err| &**err)
    }

    fn check_failure(&self) -> Result<(), SetupError> {
        match self.state.failure() {
            Some(err) => Err(SetupError::Model(Arc::clone(err))),
            None => Ok(()),
        }
    }

    fn fail(&mut self, err: ModelError) -> SetupError {
        error!(%err, "pointer model failed to load");
        let err = Arc::new(err);
        self.state.fail(Arc::clone(&err));
        SetupError::Model(err)
    }

    /// Attach a pointer model and replay every queued request in arrival
    /// order. Any model still loading in the background is discarded.
    pub fn attach_model(&mut self, model: PointerModel) -> Result<(), SetupError> {
        let layout = self.layout.as_ref().ok_or(SetupError::NotDrawn)?;
        let engine = RotationEngine::new(
            model,
            self.center,
            RotationTargets {
                indicator: layout.indicator,
                label: layout.label,
                cross_light: layout.cross_light,
            },
            layout.label_position,
            self.state.current_angle(),
        );
        let replay = self.state.attach(engine)?;
        self.loader = None;
        info!(replayed = replay.len(), "pointer model attached");
        for request in replay {
            debug!(angle = request.angle, histogram = request.histogram, "replaying angle");
            self.record(request);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------------

    pub fn rotate(&mut self, angle: f64) {
        self.record(AngleRequest::plain(angle));
    }

    /// Rotate and leave a permanent histogram mark at `angle`.
    pub fn rotate_with_histogram(&mut self, angle: f64) {
        self.record(AngleRequest::with_histogram(angle));
    }

    pub fn apply_command(&mut self, command: AngleMeterCommand) {
        match command {
            AngleMeterCommand::Rotate(angle) => self.rotate(angle),
            AngleMeterCommand::RotateWithHistogram(angle) => self.rotate_with_histogram(angle),
        }
    }

    /// Apply every command waiting on `receiver` without blocking.
    pub fn update_with_commands(&mut self, receiver: &Receiver<AngleMeterCommand>) {
        while let Ok(command) = receiver.try_recv() {
            self.apply_command(command);
        }
    }

    fn record(&mut self, request: AngleRequest) {
        match self.state.record_angle(request, &mut self.scene) {
            // The histogram flag travels with the queued request.
            Delivery::Buffered | Delivery::Dropped => return,
            Delivery::Applied => {}
            Delivery::Failed(err) => {
                error!(angle = request.angle, %err, "rotation failed");
            }
        }
        if request.histogram {
            self.histogram.record_sample(request.angle, &mut self.scene);
        }
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    fn lay_out(&mut self) -> Layout {
        let dial = self.add_dial();
        let ticks = generate_scale(
            AngleRange::for_dial(self.config.half),
            self.center,
            self.config.radius,
            &self.config.scale,
        );
        for tick in &ticks {
            self.scene.add(Element::new(
                Shape::Line {
                    from: tick.from,
                    to: tick.to,
                    dash: None,
                },
                Style::stroke(tick.style.color, tick.style.width),
            ));
        }
        let cross_light = self
            .config
            .enable_cross_light
            .then(|| self.add_cross_light());
        let indicator = self.add_indicator();
        let (label, label_position) = self.add_label();
        debug!(
            ticks = ticks.len(),
            cross_light = cross_light.is_some(),
            "layout complete"
        );

        Layout {
            dial,
            ticks,
            indicator,
            label,
            label_position,
            cross_light,
        }
    }

    fn add_dial(&mut self) -> ElementId {
        let (c, r) = (self.center, self.config.radius);
        let shape = if self.config.half {
            Shape::Arc {
                from: Point::new(c.x - r, c.y),
                through: Point::new(c.x, c.y - r),
                to: Point::new(c.x + r, c.y),
            }
        } else {
            Shape::Circle {
                center: c,
                radius: r,
            }
        };
        let style = Style::stroke(self.config.stroke_color, 1.0).with_fill(self.config.fill_color);
        self.scene.add(Element::new(shape, style))
    }

    fn add_cross_light(&mut self) -> ElementId {
        let cfg = self.config.cross_light;
        let c = self.center;
        let half_length = self.config.radius - cfg.padding;
        let line = |from, to| {
            Element::new(
                Shape::Line {
                    from,
                    to,
                    dash: Some(cfg.dash),
                },
                Style::stroke(cfg.color, cfg.width),
            )
        };
        let vertical = line(
            Point::new(c.x, c.y - half_length),
            Point::new(c.x, c.y + half_length),
        );
        let horizontal = line(
            Point::new(c.x - half_length, c.y),
            Point::new(c.x + half_length, c.y),
        );
        self.scene.add(Element::new(
            Shape::Group(vec![vertical, horizontal]),
            Style::stroke(cfg.color, cfg.width),
        ))
    }

    /// Narrow triangle above the dial, apex pointing away from the center.
    fn add_indicator(&mut self) -> ElementId {
        let radius = self.config.indicator_radius();
        let anchor = Point::new(
            self.center.x,
            self.center.y - self.config.radius - radius - INDICATOR_GAP,
        );
        let apex = Point::new(anchor.x, anchor.y - radius);
        let mut shape = Shape::Polygon {
            points: [0.0, 120.0, 240.0]
                .into_iter()
                .map(|angle| apex.rotate(angle, anchor))
                .collect(),
            closed: true,
        };
        shape.scale(INDICATOR_SQUEEZE, 1.0, anchor);
        let style = Style::fill(self.config.indicator.color).with_opacity(self.config.indicator.opacity);
        self.scene.add(Element::new(shape, style))
    }

    fn add_label(&mut self) -> (ElementId, Point) {
        let position = Point::new(
            self.center.x,
            self.center.y - self.config.radius - self.config.indicator_radius() - LABEL_GAP,
        );
        let label = self.config.angle_label;
        let id = self.scene.add(Element::new(
            Shape::Text {
                anchor: position,
                content: format_angle(self.state.current_angle()),
                font_size: self.config.label_font_size(),
            },
            Style::fill(label.color).with_opacity(label.opacity),
        ));
        (id, position)
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Rasterize the widget into an RGBA8 frame.
    pub fn render(&self, frame: &mut [u8], width: usize, height: usize) {
        let mut canvas = Canvas::new(frame, width, height);
        canvas.clear(Color::WHITE);
        let font = self.font.as_ref();
        for element in self.scene.elements() {
            render::render_element(&mut canvas, element, font);
        }
        if let Some(pointer) = self.pointer() {
            for element in pointer.elements() {
                render::render_element(&mut canvas, element, font);
            }
        }
    }

    pub fn show(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<AngleMeterCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn run_window(
        &mut self,
        receiver: Option<Receiver<AngleMeterCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (buffer_width, buffer_height) = self.config.preferred_size();

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.bind_to)
            .with_inner_size(LogicalSize::new(buffer_width as f64, buffer_height as f64))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = Arc::new(window);

        let bind_to = self.config.bind_to.clone();
        let host = (bind_to.as_str(), Surface::new(buffer_width, buffer_height));
        self.draw(&host)?;

        let window_clone = window.clone();
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(buffer_width, buffer_height, surface_texture)?;

        let frame_duration = std::time::Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();
        let mut failure: Option<SetupError> = None;
        let failure_slot = &mut failure;
        let meter = self;

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = meter.poll() {
                            error!(%err, "closing angle meter window");
                            *failure_slot = Some(err);
                            window_target.exit();
                            return;
                        }
                        if let Some(ref receiver) = receiver {
                            meter.update_with_commands(receiver);
                        }
                        meter.render(
                            pixels.frame_mut(),
                            buffer_width as usize,
                            buffer_height as usize,
                        );
                        if let Err(err) = pixels.render() {
                            error!(%err, "frame presentation failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn host() -> (&'static str, Surface) {
        ("anglemeter", Surface::new(200, 200))
    }

    fn drawn(config: AngleMeterConfig) -> AngleMeter {
        let mut meter = AngleMeter::new(config).unwrap();
        meter.draw(&host()).unwrap();
        meter
    }

    fn polygon(element: &Element) -> Vec<Point> {
        match &element.shape {
            Shape::Polygon { points, .. } => points.clone(),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AngleMeterConfig::builder().radius(-1.0).build();
        assert!(matches!(
            AngleMeter::new(config),
            Err(ConfigError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_draw_requires_surface() {
        let config = AngleMeterConfig::builder().bind_to("elsewhere").build();
        let mut meter = AngleMeter::new(config).unwrap();
        let err = meter.draw(&host()).unwrap_err();
        assert!(matches!(err, SetupError::SurfaceNotFound(id) if id == "elsewhere"));
        assert!(!meter.is_drawn());
    }

    #[test]
    fn test_draw_twice_is_rejected() {
        let mut meter = drawn(AngleMeterConfig::default());
        assert!(matches!(meter.draw(&host()), Err(SetupError::AlreadyDrawn)));
    }

    #[test]
    fn test_bad_font_data_is_a_setup_error() {
        let config = AngleMeterConfig::builder()
            .font_data(vec![0, 1, 2, 3])
            .build();
        let mut meter = AngleMeter::new(config).unwrap();
        assert!(matches!(meter.draw(&host()), Err(SetupError::Font)));
    }

    #[test]
    fn test_layout_positions() {
        let meter = drawn(AngleMeterConfig::default());
        let c = meter.center();
        assert_abs_diff_eq!(c.x, 70.0 + 70.0 / 3.0, epsilon = 1e-9);

        let indicator = polygon(meter.indicator().unwrap());
        let ir = 70.0 / 6.0;
        let anchor_y = c.y - 70.0 - ir - 3.0;
        assert_abs_diff_eq!(indicator[0].x, c.x, epsilon = 1e-9);
        assert_abs_diff_eq!(indicator[0].y, anchor_y - ir, epsilon = 1e-9);
        // squeezed to 40% of the regular triangle's width
        let width = (indicator[1].x - indicator[2].x).abs();
        assert_abs_diff_eq!(width, 0.4 * ir * 3f64.sqrt(), epsilon = 1e-9);

        match &meter.label().unwrap().shape {
            Shape::Text {
                anchor,
                content,
                font_size,
            } => {
                assert_abs_diff_eq!(anchor.y, c.y - 70.0 - ir - 18.0, epsilon = 1e-9);
                assert_eq!(content, "0");
                assert_abs_diff_eq!(*font_size, ir, epsilon = 1e-9);
            }
            other => panic!("unexpected label {other:?}"),
        }
        assert!(meter.cross_light().is_none());
        assert!(matches!(meter.dial().unwrap().shape, Shape::Circle { .. }));
        assert_eq!(meter.scale_ticks().len(), 73);
    }

    #[test]
    fn test_half_dial_uses_arc_and_half_scale() {
        let meter = drawn(AngleMeterConfig::builder().half(true).build());
        assert!(matches!(meter.dial().unwrap().shape, Shape::Arc { .. }));
        assert_eq!(meter.scale_ticks().len(), 37);
    }

    #[test]
    fn test_cross_light_follows_pointer() {
        let mut meter = drawn(AngleMeterConfig::builder().enable_cross_light(true).build());
        meter.wait_for_model().unwrap();
        meter.rotate(90.0);
        let Shape::Group(lines) = &meter.cross_light().unwrap().shape else {
            panic!("cross light is not a group");
        };
        assert_eq!(lines.len(), 2);
        // the vertical line is now horizontal
        let Shape::Line { from, to, dash } = lines[0].shape else {
            panic!("cross light child is not a line");
        };
        assert_abs_diff_eq!(from.y, to.y, epsilon = 1e-9);
        assert_abs_diff_eq!(to.distance(from), 2.0 * (70.0 - 10.0), epsilon = 1e-9);
        assert_eq!(dash, Some([2.0, 2.0]));
    }

    #[test]
    fn test_commands_apply_in_order() {
        let mut meter = drawn(AngleMeterConfig::default());
        meter.wait_for_model().unwrap();
        let (sender, receiver) = std::sync::mpsc::channel();
        sender.send(AngleMeterCommand::Rotate(10.0)).unwrap();
        sender
            .send(AngleMeterCommand::RotateWithHistogram(20.0))
            .unwrap();
        sender.send(AngleMeterCommand::Rotate(-5.0)).unwrap();
        meter.update_with_commands(&receiver);
        assert_eq!(meter.current_angle(), -5.0);
        assert_eq!(meter.histogram_marks().count(), 1);
    }

    #[test]
    fn test_attach_before_draw_is_rejected() {
        let mut meter = AngleMeter::new(AngleMeterConfig::default()).unwrap();
        let model = PointerModel::load(
            &ModelSource::Builtin,
            &Placement {
                bounds: meter.config().model_bounds(),
                scale_factor: 0.6,
                center: meter.center(),
            },
        )
        .unwrap();
        assert!(matches!(
            meter.attach_model(model),
            Err(SetupError::NotDrawn)
        ));
        assert!(matches!(meter.wait_for_model(), Err(SetupError::NotDrawn)));
    }

    #[test]
    fn test_missing_model_asset_surfaces_on_wait() {
        let config = AngleMeterConfig::builder()
            .src("/nonexistent/pointer.toml")
            .build();
        let mut meter = drawn(config);
        meter.rotate(15.0);
        let err = meter.wait_for_model().unwrap_err();
        assert!(matches!(&err, SetupError::Model(e) if matches!(**e, ModelError::Read { .. })));
        assert!(!meter.is_attached());
        assert!(meter.pending().is_empty());
    }

    #[test]
    fn test_model_failure_is_terminal() {
        let config = AngleMeterConfig::builder()
            .src("/nonexistent/pointer.toml")
            .build();
        let mut meter = drawn(config);
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        let first = loop {
            match meter.poll() {
                Ok(false) => {
                    assert!(Instant::now() < deadline, "loader never finished");
                    std::thread::yield_now();
                }
                Ok(true) => panic!("missing asset attached a model"),
                Err(err) => break err,
            }
        };
        assert!(matches!(first, SetupError::Model(_)));

        // every later call keeps reporting the same failure
        assert!(matches!(meter.poll(), Err(SetupError::Model(_))));
        assert!(matches!(
            meter.wait_for_model(),
            Err(SetupError::Model(e)) if matches!(*e, ModelError::Read { .. })
        ));
        assert!(matches!(meter.failure(), Some(ModelError::Read { .. })));

        for angle in 0..100 {
            meter.rotate_with_histogram(angle as f64);
        }
        assert!(meter.pending().is_empty());
        assert_eq!(meter.histogram_marks().count(), 0);
        assert_eq!(meter.current_angle(), 0.0);
    }

    #[test]
    fn test_render_draws_dial_and_pointer() {
        let mut meter = drawn(AngleMeterConfig::default());
        meter.wait_for_model().unwrap();
        let (w, h) = meter.config().preferred_size();
        let mut frame = vec![0u8; (w * h * 4) as usize];
        meter.render(&mut frame, w as usize, h as usize);

        let pixel = |x: f64, y: f64| {
            let idx = (y.round() as usize * w as usize + x.round() as usize) * 4;
            [frame[idx], frame[idx + 1], frame[idx + 2]]
        };
        let c = meter.center();
        // pointer hub at the center is dark
        assert_eq!(pixel(c.x, c.y), [0x20, 0x20, 0x20]);
        // outside the dial stays background
        assert_eq!(pixel(1.0, 1.0), [0xff, 0xff, 0xff]);
    }
}
