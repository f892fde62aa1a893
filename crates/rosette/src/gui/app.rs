use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::bridge::GtkScheduler;
use crate::gui::host;
use crate::gui::menu::{self, Animator, IconCache};
use crate::gui::theme::{self, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use rosette_core::{Hooks, ListenerRegistry, Point, PointerEvent, RadialMenu, Task};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

/// Every menu attached to the page, with the per-menu animation state the
/// draw function needs.
pub struct Deck {
    pub menus: Vec<RadialMenu>,
    animators: Vec<Animator>,
    icons: IconCache,
}

impl Deck {
    fn new(menus: Vec<RadialMenu>, icons: IconCache) -> Self {
        let animators = menus.iter().map(|_| Animator::new()).collect();
        Self {
            menus,
            animators,
            icons,
        }
    }

    fn draw(&mut self, cr: &cairo::Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let now = Instant::now();
        for (menu, animator) in self.menus.iter().zip(self.animators.iter_mut()) {
            menu::draw(cr, menu.scene(), colors, animator, &mut self.icons, now)?;
        }
        Ok(())
    }

    fn is_animating(&self, now: Instant) -> bool {
        self.animators.iter().any(|a| a.is_animating(now))
    }

    /// The first menu whose selector accepts the target opens; the others close.
    fn context_menu(&mut self, event: &PointerEvent) {
        let consumer = self.menus.iter_mut().position(|m| m.handle(event));
        for (i, menu) in self.menus.iter_mut().enumerate() {
            if Some(i) != consumer && menu.is_open() {
                menu.close();
            }
        }
    }

    fn broadcast(&mut self, event: &PointerEvent) {
        for menu in &mut self.menus {
            menu.handle(event);
        }
    }

    fn close_all(&mut self) {
        for menu in self.menus.iter_mut().filter(|m| m.is_open()) {
            menu.close();
        }
    }

    /// Applies a reloaded config to the existing menus when it has one entry
    /// per menu. Returns false when the deck has to be rebuilt instead.
    fn reconfigure(&mut self, config: &Config) -> bool {
        if config.menus.len() != self.menus.len() {
            return false;
        }
        for (menu, menu_config) in self.menus.iter_mut().zip(&config.menus) {
            if let Err(e) = menu.reconfigure(menu_config.clone()) {
                log::error!("Failed to reconfigure menu: {}", e);
                return false;
            }
        }
        true
    }
}

pub struct AppModel {
    deck: Rc<RefCell<Deck>>,
    listeners: ListenerRegistry,
    drawing_area: gtk::DrawingArea,
    config_path: PathBuf,
    generation: u64,
    sender: relm4::Sender<AppMsg>,
}

#[derive(Debug)]
pub enum AppMsg {
    Pointer(PointerEvent),
    Escape,
    Run {
        generation: u64,
        index: usize,
        task: Task,
    },
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

pub struct AppInit {
    pub config: Config,
    pub config_path: PathBuf,
    pub rx: async_channel::Receiver<AppEvent>,
}

fn build_menus(
    config: &Config,
    generation: u64,
    listeners: &ListenerRegistry,
    drawing_area: &gtk::DrawingArea,
    sender: &relm4::Sender<AppMsg>,
) -> Vec<RadialMenu> {
    let mut menus = Vec::with_capacity(config.menus.len());

    for menu_config in &config.menus {
        // tasks are routed back by position in the deck
        let index = menus.len();
        let hooks = Hooks::new()
            .on_select(|item| println!("{}", item.name))
            .on_open(move |_| log::debug!("Menu {} opened", index))
            .on_close(move |_| log::debug!("Menu {} closed", index));
        let scheduler = GtkScheduler::new(generation, index, drawing_area.clone(), sender.clone());

        match RadialMenu::new(menu_config.clone(), hooks, listeners.clone(), scheduler) {
            Ok(mut menu) => {
                menu.init();
                menus.push(menu);
            }
            Err(e) => log::error!("Skipping menu: {}", e),
        }
    }
    menus
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Rosette"),
            set_default_size: (760, 520),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Escape);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[local_ref]
                page -> gtk::Box {},
                add_overlay: &drawing_area,

                add_controller = gtk::GestureClick {
                    set_button: 0,
                    set_propagation_phase: gtk::PropagationPhase::Capture,
                    connect_pressed[sender] => move |gesture, _, x, y| {
                        if gesture.current_button() != gtk::gdk::BUTTON_SECONDARY {
                            return;
                        }
                        let target = gesture
                            .widget()
                            .map(|w| host::target_chain(&w, x, y))
                            .unwrap_or_default();
                        sender.input(AppMsg::Pointer(PointerEvent::ContextMenu {
                            position: Point::new(x, y),
                            target,
                        }));
                    },
                    connect_released[sender] => move |gesture, _, x, y| {
                        if gesture.current_button() == gtk::gdk::BUTTON_PRIMARY {
                            sender.input(AppMsg::Pointer(PointerEvent::Click {
                                position: Point::new(x, y),
                            }));
                        }
                    }
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::Pointer(PointerEvent::Move {
                            position: Point::new(x, y),
                        }));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::Pointer(PointerEvent::Leave));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            config_path,
            rx,
        } = init;

        theme::load_css();

        let page = host::build_page();
        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_hexpand(true);
        drawing_area.set_vexpand(true);
        drawing_area.set_can_target(false);
        drawing_area.add_css_class("rosette-drawing-area");

        let listeners = ListenerRegistry::new();
        let input = sender.input_sender().clone();
        let menus = build_menus(&config, 0, &listeners, &drawing_area, &input);
        let icons = IconCache::new(config_path.parent().map(PathBuf::from));
        let deck = Rc::new(RefCell::new(Deck::new(menus, icons)));

        let model = AppModel {
            deck: deck.clone(),
            listeners,
            drawing_area: drawing_area.clone(),
            config_path,
            generation: 0,
            sender: input,
        };

        let widgets = view_output!();

        let deck_draw = deck.clone();
        drawing_area.set_draw_func(move |area, cr, _, _| {
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) = deck_draw.borrow_mut().draw(cr, &colors) {
                log::error!("Drawing error: {}", e);
            }
        });

        // keep redrawing while a transition is running
        let deck_tick = deck;
        drawing_area.add_tick_callback(move |area, _| {
            if deck_tick.borrow().is_animating(Instant::now()) {
                area.queue_draw();
            }
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Pointer(event) => {
                if !self.listeners.is_listening(event.kind()) {
                    return;
                }
                let mut deck = self.deck.borrow_mut();
                match event {
                    PointerEvent::ContextMenu { .. } => deck.context_menu(&event),
                    _ => deck.broadcast(&event),
                }
            }
            AppMsg::Escape => self.deck.borrow_mut().close_all(),
            AppMsg::Run {
                generation,
                index,
                task,
            } => {
                if generation != self.generation {
                    log::debug!("Dropping {:?} from a replaced menu", task);
                    return;
                }
                if let Some(menu) = self.deck.borrow_mut().menus.get_mut(index) {
                    menu.run(task);
                }
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    // images may have changed on disk either way
                    let icons = IconCache::new(self.config_path.parent().map(PathBuf::from));
                    let in_place = self.deck.borrow_mut().reconfigure(&new_config);

                    if in_place {
                        self.deck.borrow_mut().icons = icons;
                    } else {
                        self.generation += 1;
                        let menus = build_menus(
                            &new_config,
                            self.generation,
                            &self.listeners,
                            &self.drawing_area,
                            &self.sender,
                        );
                        // old menus drop here and release their listeners
                        *self.deck.borrow_mut() = Deck::new(menus, icons);
                    }
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
        self.drawing_area.queue_draw();
    }
}
