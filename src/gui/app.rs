use crate::config::{self, Config, Overrides};
use crate::events::AppEvent;
use crate::gui::carousel::{self, Stage, TickSource};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::launch;
use coverflow::{Carousel, Click, Navigation, Point, RunId, Size, TickOutcome, TileId};
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppInit {
    pub stage: Stage,
    pub config: Config,
    pub config_path: PathBuf,
    pub overrides: Overrides,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub stage: Rc<RefCell<Stage>>,
    pub config_path: PathBuf,
    pub overrides: Overrides,
    /// Bumped whenever the stage is rebuilt. Messages from an older stage are
    /// dropped.
    pub epoch: u64,
    pub loading: bool,
    pub show_bar: bool,
    pub drawing_area: gtk::DrawingArea,
    pub slider: gtk::Scale,
}

#[derive(Debug)]
pub enum AppMsg {
    Previous,
    Next,
    First,
    Last,
    GoTo(usize),
    Activate,
    Click(Point),
    Resize(i32, i32),
    Tick(u64, RunId),
    ImageLoaded(u64, TileId, Option<Pixbuf>),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Previous => AppMsg::Previous,
            AppEvent::Next => AppMsg::Next,
            AppEvent::First => AppMsg::First,
            AppEvent::Last => AppMsg::Last,
            AppEvent::GoTo(i) => AppMsg::GoTo(i),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            add_controller = gtk::EventControllerKey {
                set_propagation_phase: gtk::PropagationPhase::Capture,
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match window::key_message(key) {
                        Some(msg) => {
                            sender.input(msg);
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                gtk::Overlay {
                    set_vexpand: true,

                    #[name = "drawing_area"]
                    gtk::DrawingArea {
                        set_hexpand: true,
                        set_vexpand: true,

                        connect_resize[sender] => move |_, width, height| {
                            sender.input(AppMsg::Resize(width, height));
                        },

                        add_controller = gtk::GestureClick {
                            set_button: gtk::gdk::BUTTON_PRIMARY,
                            connect_released[sender] => move |_, _, x, y| {
                                sender.input(AppMsg::Click(Point::new(x, y)));
                            }
                        }
                    },

                    add_overlay = &gtk::Spinner {
                        set_halign: gtk::Align::Center,
                        set_valign: gtk::Align::Center,
                        #[watch]
                        set_spinning: model.loading,
                        #[watch]
                        set_visible: model.loading,
                    },
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,
                    add_css_class: "coverlist-bar",
                    #[watch]
                    set_visible: model.show_bar,

                    gtk::Button {
                        set_icon_name: "go-previous-symbolic",
                        set_tooltip_text: Some("Previous"),
                        connect_clicked => AppMsg::Previous,
                    },

                    #[name = "slider"]
                    gtk::Scale {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_hexpand: true,
                        set_draw_value: false,
                        set_digits: 0,
                        // Only user interaction emits change-value; set_value does not.
                        connect_change_value[sender] => move |_, _, value| {
                            sender.input(AppMsg::GoTo(value.round().max(0.0) as usize));
                            glib::Propagation::Proceed
                        },
                    },

                    gtk::Button {
                        set_icon_name: "go-next-symbolic",
                        set_tooltip_text: Some("Next"),
                        connect_clicked => AppMsg::Next,
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            stage,
            config,
            config_path,
            overrides,
            events,
        } = init;

        theme::load_css();
        window::init_window(&root, &config.window);

        let model = AppModel {
            show_bar: stage.carousel.len() > 1,
            loading: !stage.carousel.images_ready(),
            stage: Rc::new(RefCell::new(stage)),
            config_path,
            overrides,
            epoch: 0,
            drawing_area: gtk::DrawingArea::default(),
            slider: gtk::Scale::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.slider = widgets.slider.clone();

        let stage_draw = model.stage.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = carousel::draw(cr, &stage_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn_local(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.sync_slider();
        model.load_images(&sender);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Previous => self.navigate(Carousel::go_to_previous, &sender),
            AppMsg::Next => self.navigate(Carousel::go_to_next, &sender),
            AppMsg::First => self.navigate(Carousel::go_to_first, &sender),
            AppMsg::Last => self.navigate(Carousel::go_to_last, &sender),
            AppMsg::GoTo(index) => self.navigate(|c| c.go_to_index(index), &sender),
            AppMsg::Activate => {
                let selected = self.stage.borrow().carousel.selected();
                if let Some(index) = selected {
                    self.activate(TileId::from(index));
                }
            }
            AppMsg::Click(point) => {
                let click = self.stage.borrow_mut().carousel.click(point);
                match click {
                    Click::Miss => {}
                    Click::Activate(id) => self.activate(id),
                    Click::Navigate(nav) => self.apply(nav, &sender),
                }
            }
            AppMsg::Resize(width, height) => {
                let container = Size::new(width as f64, height as f64);
                if self.stage.borrow_mut().carousel.resize(container) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Tick(epoch, run) => {
                if epoch != self.epoch {
                    return;
                }
                let outcome = self.stage.borrow_mut().carousel.tick(run);
                if let TickOutcome::Running { redraw: true } | TickOutcome::Finished { redraw: true } =
                    outcome
                {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ImageLoaded(epoch, id, pixbuf) => {
                if epoch != self.epoch {
                    return;
                }
                if self.stage.borrow_mut().set_image(id, pixbuf.as_ref()) {
                    log::info!("All covers loaded");
                    self.loading = false;
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => self.reload(&sender),
        }
    }
}

impl AppModel {
    fn navigate(
        &mut self,
        go: impl FnOnce(&mut Carousel<TickSource>) -> Navigation,
        sender: &ComponentSender<Self>,
    ) {
        let nav = go(&mut self.stage.borrow_mut().carousel);
        self.apply(nav, sender);
    }

    fn apply(&mut self, nav: Navigation, sender: &ComponentSender<Self>) {
        if nav == Navigation::Ignored {
            return;
        }
        if let Some(run) = nav.run() {
            self.arm_timer(run, sender);
        }
        self.sync_slider();
        self.drawing_area.queue_draw();
    }

    fn arm_timer(&self, run: RunId, sender: &ComponentSender<Self>) {
        let interval = self.stage.borrow().carousel.settings().animation.interval;
        let (sender, epoch) = (sender.clone(), self.epoch);

        // The carousel removes the source when the run ends or is replaced.
        let source = glib::timeout_add_local(interval, move || {
            sender.input(AppMsg::Tick(epoch, run));
            glib::ControlFlow::Continue
        });
        self.stage
            .borrow_mut()
            .carousel
            .attach_timer(run, TickSource(source));
    }

    fn sync_slider(&self) {
        let stage = self.stage.borrow();
        let carousel = &stage.carousel;
        let Some(selected) = carousel.selected() else {
            return;
        };

        self.slider
            .set_range(0.0, carousel.len().saturating_sub(1) as f64);
        self.slider.set_increments(1.0, 1.0);
        self.slider.set_value(selected as f64);
        if let Some(element) = carousel.element(TileId::from(selected)) {
            self.slider
                .update_property(&[gtk::accessible::Property::ValueText(element.title.as_str())]);
        }
    }

    fn load_images(&self, sender: &ComponentSender<Self>) {
        let thumbs: Vec<_> = self
            .stage
            .borrow()
            .carousel
            .elements()
            .iter()
            .enumerate()
            .map(|(i, e)| (TileId::from(i), e.thumb.as_deref().map(config::expand_home)))
            .collect();

        for (id, thumb) in thumbs {
            let (sender, epoch) = (sender.clone(), self.epoch);
            glib::idle_add_local_once(move || {
                let pixbuf = thumb.and_then(|path| match Pixbuf::from_file(&path) {
                    Ok(pixbuf) => Some(pixbuf),
                    Err(e) => {
                        log::warn!("Failed to load thumbnail {}: {}", path.display(), e);
                        None
                    }
                });
                sender.input(AppMsg::ImageLoaded(epoch, id, pixbuf));
            });
        }
    }

    fn activate(&self, id: TileId) {
        let stage = self.stage.borrow();
        if let Some(element) = stage.carousel.element(id)
            && let Err(e) = launch::open_url(&element.url)
        {
            log::error!("Failed to open '{}': {}", element.url, e);
        }
    }

    fn reload(&mut self, sender: &ComponentSender<Self>) {
        let mut config = match config::load_or_default(&self.config_path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };
        self.overrides.apply(&mut config);

        let container = Size::new(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
        );
        let stage = match Stage::new(&config, container) {
            Ok(stage) => stage,
            Err(e) => {
                log::error!("Failed to rebuild carousel: {}", e);
                return;
            }
        };

        self.stage.borrow_mut().carousel.stop();
        self.epoch += 1;
        self.show_bar = stage.carousel.len() > 1;
        self.loading = !stage.carousel.images_ready();
        *self.stage.borrow_mut() = stage;

        self.sync_slider();
        self.load_images(sender);
        self.drawing_area.queue_draw();
        log::info!("Configuration reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_map_to_messages() {
        assert!(matches!(AppMsg::from(AppEvent::Next), AppMsg::Next));
        assert!(matches!(AppMsg::from(AppEvent::Previous), AppMsg::Previous));
        assert!(matches!(AppMsg::from(AppEvent::GoTo(3)), AppMsg::GoTo(3)));
        assert!(matches!(
            AppMsg::from(AppEvent::ConfigReload),
            AppMsg::ConfigReload
        ));
    }
}
